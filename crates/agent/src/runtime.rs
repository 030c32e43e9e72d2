use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use dokan_core::commerce::{DeliveryFees, DeliveryZones, PricingCalculator};
use dokan_core::config::AppConfig;
use dokan_core::domain::contact::ContactId;
use dokan_core::domain::order::{OrderId, OrderRecord, OrderStatus};
use dokan_core::errors::ApplicationError;
use dokan_core::lexicon::Lexicons;
use dokan_core::ports::{FaqLookup, OrderLog, ProductLookup, SalutationStore};

use crate::composer::ResponseComposer;
use crate::router::{Intent, IntentRouter, Routed};
use crate::salutation::SalutationResolver;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub body: String,
    pub sender_id: String,
    pub correlation_id: String,
}

impl InboundMessage {
    pub fn new(sender_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sender_id: sender_id.into(),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutboundReply {
    pub text: String,
    pub intent: &'static str,
}

/// External collaborators the runtime talks to. The order log is optional;
/// without it submitted orders are only summarized back to the customer.
#[derive(Clone)]
pub struct Collaborators {
    pub salutations: Arc<dyn SalutationStore>,
    pub products: Arc<dyn ProductLookup>,
    pub faq: Arc<dyn FaqLookup>,
    pub orders: Option<Arc<dyn OrderLog>>,
}

#[derive(Clone, Debug)]
pub struct AssistantSettings {
    pub shop_name: String,
    pub currency_symbol: String,
    pub fees: DeliveryFees,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            shop_name: "STYLO".to_string(),
            currency_symbol: "৳".to_string(),
            fees: DeliveryFees::default(),
        }
    }
}

impl AssistantSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            shop_name: config.assistant.shop_name.clone(),
            currency_symbol: config.assistant.currency_symbol.clone(),
            fees: config.delivery.fees(),
        }
    }
}

pub struct AgentRuntime {
    resolver: SalutationResolver,
    router: IntentRouter,
    composer: ResponseComposer,
    orders: Option<Arc<dyn OrderLog>>,
}

impl AgentRuntime {
    pub fn new(collaborators: Collaborators, lexicons: Lexicons, settings: AssistantSettings) -> Self {
        let lexicons = Arc::new(lexicons);
        let pricing =
            PricingCalculator::new(settings.fees, DeliveryZones::new(lexicons.inside_zone.clone()));
        let composer = ResponseComposer::new(
            settings.shop_name,
            settings.currency_symbol,
            lexicons.labels.clone(),
            settings.fees,
        );

        Self {
            resolver: SalutationResolver::new(collaborators.salutations.clone(), lexicons.clone()),
            router: IntentRouter::new(
                collaborators.salutations,
                collaborators.products,
                collaborators.faq,
                lexicons,
                pricing,
            ),
            composer,
            orders: collaborators.orders,
        }
    }

    pub async fn handle_message(
        &self,
        message: &InboundMessage,
    ) -> Result<OutboundReply, ApplicationError> {
        let contact_id = ContactId::new(message.sender_id.as_str());

        let routed = self.route(&contact_id, message).await.map_err(|error| {
            warn!(
                event_name = "agent.message.failed",
                correlation_id = %message.correlation_id,
                contact_id = %contact_id,
                error = %error,
                "failed to route inbound message"
            );
            error
        })?;

        if let Intent::OrderSubmitted { draft, unit_price, breakdown } = &routed.intent {
            if let Some(orders) = &self.orders {
                let record = OrderRecord {
                    id: OrderId(format!("ORD-{}", Uuid::new_v4().simple())),
                    contact_id: contact_id.clone(),
                    draft: draft.clone(),
                    unit_price: *unit_price,
                    breakdown: *breakdown,
                    status: OrderStatus::Pending,
                    created_at: Utc::now(),
                };
                let order_id = record.id.0.clone();
                orders.append(record).await?;
                info!(
                    event_name = "agent.order.recorded",
                    correlation_id = %message.correlation_id,
                    contact_id = %contact_id,
                    order_id = %order_id,
                    priced = breakdown.is_some(),
                    "recorded submitted order"
                );
            }
        }

        let intent = routed.intent.kind();
        info!(
            event_name = "agent.message.routed",
            correlation_id = %message.correlation_id,
            contact_id = %contact_id,
            intent = intent,
            "routed inbound message"
        );

        Ok(OutboundReply { text: self.composer.compose(&routed), intent })
    }

    async fn route(
        &self,
        contact_id: &ContactId,
        message: &InboundMessage,
    ) -> Result<Routed, ApplicationError> {
        let resolution = self.resolver.resolve(contact_id, &message.body).await?;
        self.router.route(contact_id, &message.body, resolution).await
    }
}
