//! Fixed-priority intent routing. The first matching rule wins and `Fallback`
//! closes the chain, so every message maps to exactly one intent:
//!
//! 1. honorific unknown and none declared: ask for one
//! 2. honorific declared: persist and acknowledge
//! 3. showroom question, ignoring keywords that only appear as order labels
//! 4. order keyword without a name label: send the order format
//! 5. name, phone and code labels present: price and summarize the order
//! 6. tracking keyword
//! 7. product code token: catalog lookup
//! 8. FAQ keyword
//! 9. greeting, then profanity, then gratitude
//! 10. fallback

use std::sync::Arc;

use dokan_core::commerce::{
    LabeledFields, OrderField, OrderFieldExtractor, PriceBreakdown, PricingCalculator,
    ProductCodePattern,
};
use dokan_core::domain::contact::{ContactId, Salutation};
use dokan_core::domain::order::OrderDraft;
use dokan_core::domain::product::{Product, ProductCode};
use dokan_core::errors::ApplicationError;
use dokan_core::lexicon::{Lexicons, NormalizedText};
use dokan_core::ports::{FaqLookup, ProductLookup, SalutationStore};

use crate::salutation::Resolution;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmallTalkCategory {
    Greeting,
    Deescalation,
    Thanks,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    AskSalutation,
    ConfirmSalutation { chosen: Salutation },
    ShowroomInfo,
    OrderInstructions,
    OrderSubmitted {
        draft: OrderDraft,
        unit_price: Option<u64>,
        /// Absent when the product code could not be resolved.
        breakdown: Option<PriceBreakdown>,
    },
    ProductInfo { product: Product },
    ProductNotFound { code: ProductCode },
    TrackingRequest,
    FaqAnswer { answer: String },
    SmallTalk { category: SmallTalkCategory },
    Fallback,
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AskSalutation => "ask_salutation",
            Self::ConfirmSalutation { .. } => "confirm_salutation",
            Self::ShowroomInfo => "showroom_info",
            Self::OrderInstructions => "order_instructions",
            Self::OrderSubmitted { .. } => "order_submitted",
            Self::ProductInfo { .. } => "product_info",
            Self::ProductNotFound { .. } => "product_not_found",
            Self::TrackingRequest => "tracking_request",
            Self::FaqAnswer { .. } => "faq_answer",
            Self::SmallTalk { .. } => "small_talk",
            Self::Fallback => "fallback",
        }
    }
}

/// The selected intent plus the honorific the reply should use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routed {
    pub intent: Intent,
    pub salutation: Option<Salutation>,
}

pub struct IntentRouter {
    salutations: Arc<dyn SalutationStore>,
    products: Arc<dyn ProductLookup>,
    faq: Arc<dyn FaqLookup>,
    lexicons: Arc<Lexicons>,
    extractor: OrderFieldExtractor,
    pricing: PricingCalculator,
    code_pattern: ProductCodePattern,
}

impl IntentRouter {
    pub fn new(
        salutations: Arc<dyn SalutationStore>,
        products: Arc<dyn ProductLookup>,
        faq: Arc<dyn FaqLookup>,
        lexicons: Arc<Lexicons>,
        pricing: PricingCalculator,
    ) -> Self {
        let extractor = OrderFieldExtractor::new(pricing.zones().clone());
        let code_pattern = ProductCodePattern::new(&lexicons.product_code_prefixes);
        Self { salutations, products, faq, lexicons, extractor, pricing, code_pattern }
    }

    pub async fn route(
        &self,
        contact_id: &ContactId,
        text: &str,
        resolution: Resolution,
    ) -> Result<Routed, ApplicationError> {
        let normalized = NormalizedText::new(text);
        let declared = self.lexicons.declared_salutation(&normalized);
        let routed = |intent| Ok(Routed { intent, salutation: resolution.salutation });

        if resolution.must_ask && declared.is_none() {
            return routed(Intent::AskSalutation);
        }

        if let Some(chosen) = declared {
            self.salutations.upsert(contact_id, chosen).await?;
            return Ok(Routed {
                intent: Intent::ConfirmSalutation { chosen },
                salutation: Some(chosen),
            });
        }

        let labels = LabeledFields::scan(text);

        let unlabeled = NormalizedText::new(&labels.unlabeled_text());
        if self.lexicons.showroom.matches(&unlabeled) {
            return routed(Intent::ShowroomInfo);
        }

        if self.lexicons.order_start.matches(&normalized) && !labels.has(OrderField::Name) {
            return routed(Intent::OrderInstructions);
        }

        if [OrderField::Name, OrderField::Phone, OrderField::Code]
            .into_iter()
            .all(|field| labels.has(field))
        {
            return routed(self.submit_order(&labels).await?);
        }

        if self.lexicons.tracking.matches(&normalized) {
            return routed(Intent::TrackingRequest);
        }

        if let Some(code) = self.code_pattern.find_code(text) {
            let intent = match self.products.find(&code).await? {
                Some(product) => Intent::ProductInfo { product },
                None => Intent::ProductNotFound { code },
            };
            return routed(intent);
        }

        if let Some(answer) = self.faq.match_text(text).await? {
            return routed(Intent::FaqAnswer { answer });
        }

        let category = if self.lexicons.greeting.matches(&normalized) {
            Some(SmallTalkCategory::Greeting)
        } else if self.lexicons.profanity.matches(&normalized) {
            Some(SmallTalkCategory::Deescalation)
        } else if self.lexicons.gratitude.matches(&normalized) {
            Some(SmallTalkCategory::Thanks)
        } else {
            None
        };
        if let Some(category) = category {
            return routed(Intent::SmallTalk { category });
        }

        routed(Intent::Fallback)
    }

    async fn submit_order(&self, labels: &LabeledFields<'_>) -> Result<Intent, ApplicationError> {
        let draft = self.extractor.extract_from(labels);
        let code = ProductCode::new(&draft.product_code);

        let product = if code.is_empty() { None } else { self.products.find(&code).await? };
        let unit_price = product.map(|product| product.price);
        let breakdown = self.pricing.compute_total(unit_price, draft.quantity, &draft.address);

        Ok(Intent::OrderSubmitted { draft, unit_price, breakdown })
    }
}
