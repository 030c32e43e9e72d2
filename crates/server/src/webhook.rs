//! Inbound message endpoints.
//!
//! `POST /webhook/message` accepts the form-encoded payload a messaging
//! gateway posts (`Body`, `From`). `POST /api/v1/messages` accepts the same
//! message as JSON. Both answer with the reply text and the routed intent.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use dokan_agent::runtime::{AgentRuntime, InboundMessage};
use dokan_core::errors::InterfaceError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

pub const WEBHOOK_TOKEN_HEADER: &str = "x-webhook-token";

#[derive(Clone)]
pub struct WebhookState {
    runtime: Arc<AgentRuntime>,
    token: Option<SecretString>,
}

impl WebhookState {
    pub fn new(runtime: Arc<AgentRuntime>, token: Option<SecretString>) -> Self {
        Self { runtime, token }
    }
}

#[derive(Debug, Deserialize)]
pub struct GatewayForm {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub body: String,
    pub sender_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub reply: String,
    pub intent: &'static str,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    correlation_id: String,
}

pub struct ApiError(InterfaceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.user_message(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook/message", post(gateway_message))
        .route("/api/v1/messages", post(json_message))
        .with_state(state)
}

async fn gateway_message(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    Form(form): Form<GatewayForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    reply(&state, &headers, form.from, form.body).await
}

async fn json_message(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    reply(&state, &headers, request.sender_id, request.body).await
}

async fn reply(
    state: &WebhookState,
    headers: &HeaderMap,
    sender_id: String,
    body: String,
) -> Result<Json<MessageResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    authorize(state.token.as_ref(), headers, &correlation_id)?;

    if sender_id.trim().is_empty() {
        return Err(ApiError(InterfaceError::BadRequest {
            message: "sender id is required".to_string(),
            correlation_id,
        }));
    }

    let message = InboundMessage::new(sender_id.trim(), body).with_correlation_id(&correlation_id);
    let outbound = state
        .runtime
        .handle_message(&message)
        .await
        .map_err(|error| ApiError(error.into_interface(&correlation_id)))?;

    Ok(Json(MessageResponse { reply: outbound.text, intent: outbound.intent, correlation_id }))
}

fn authorize(
    expected: Option<&SecretString>,
    headers: &HeaderMap,
    correlation_id: &str,
) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let provided = headers.get(WEBHOOK_TOKEN_HEADER).and_then(|value| value.to_str().ok());
    if provided == Some(expected.expose_secret()) {
        return Ok(());
    }

    warn!(
        event_name = "server.webhook.unauthorized",
        correlation_id = %correlation_id,
        header_present = provided.is_some(),
        "rejected message without a valid webhook token"
    );
    Err(ApiError(InterfaceError::Unauthorized {
        message: "webhook token mismatch".to_string(),
        correlation_id: correlation_id.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use dokan_agent::runtime::{AgentRuntime, AssistantSettings, Collaborators};
    use dokan_core::domain::contact::{ContactId, Salutation};
    use dokan_core::errors::ApplicationError;
    use dokan_core::lexicon::Lexicons;
    use dokan_core::ports::SalutationStore;
    use dokan_db::repositories::{FaqRepository, ProductRepository};
    use dokan_db::{
        DemoDataset, InMemoryContactRepository, InMemoryFaqRepository, InMemoryOrderRepository,
        InMemoryProductRepository,
    };
    use secrecy::SecretString;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{router, WebhookState, WEBHOOK_TOKEN_HEADER};

    async fn seeded_runtime() -> Arc<AgentRuntime> {
        let products = InMemoryProductRepository::default();
        for product in DemoDataset::products() {
            products.save(product).await.expect("save product");
        }
        let faq = InMemoryFaqRepository::default();
        for entry in DemoDataset::faq_entries() {
            faq.save(entry).await.expect("save faq");
        }

        runtime_with(Arc::new(InMemoryContactRepository::default()), products, faq)
    }

    fn runtime_with(
        salutations: Arc<dyn SalutationStore>,
        products: InMemoryProductRepository,
        faq: InMemoryFaqRepository,
    ) -> Arc<AgentRuntime> {
        Arc::new(AgentRuntime::new(
            Collaborators {
                salutations,
                products: Arc::new(products),
                faq: Arc::new(faq),
                orders: Some(Arc::new(InMemoryOrderRepository::default())),
            },
            Lexicons::default(),
            AssistantSettings::default(),
        ))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    fn json_request(payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/messages")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn unknown_sender_is_asked_for_a_salutation() {
        let app = router(WebhookState::new(seeded_runtime().await, None));

        let (status, body) =
            send(app, json_request(serde_json::json!({"sender_id": "c-1", "body": "hello"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "ask_salutation");
        assert!(body["reply"].as_str().unwrap_or_default().contains("সম্বোধন"));
    }

    #[tokio::test]
    async fn gateway_form_payload_is_routed() {
        let app = router(WebhookState::new(seeded_runtime().await, None));
        let request = Request::builder()
            .method("POST")
            .uri("/webhook/message")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("Body=DR-1050+price+bhai&From=whatsapp%3A%2B8801711000000"))
            .expect("request");

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "product_info");
        assert!(body["reply"].as_str().unwrap_or_default().contains("DR-1050"));
    }

    #[tokio::test]
    async fn missing_sender_is_a_bad_request() {
        let app = router(WebhookState::new(seeded_runtime().await, None));

        let (status, body) =
            send(app, json_request(serde_json::json!({"sender_id": "  ", "body": "hi"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["correlation_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn configured_token_is_enforced() {
        let state = WebhookState::new(
            seeded_runtime().await,
            Some(SecretString::from("hook-secret".to_string())),
        );

        let (status, body) = send(
            router(state.clone()),
            json_request(serde_json::json!({"sender_id": "c-2", "body": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "The request is missing valid webhook credentials.");

        let mut request = json_request(serde_json::json!({"sender_id": "c-2", "body": "hello"}));
        request
            .headers_mut()
            .insert(WEBHOOK_TOKEN_HEADER, "hook-secret".parse().expect("header value"));
        let (status, _) = send(router(state), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    struct UnavailableStore;

    #[async_trait]
    impl SalutationStore for UnavailableStore {
        async fn get(&self, _contact: &ContactId) -> Result<Option<Salutation>, ApplicationError> {
            Err(ApplicationError::Persistence("database is locked".to_string()))
        }

        async fn upsert(
            &self,
            _contact: &ContactId,
            _salutation: Salutation,
        ) -> Result<(), ApplicationError> {
            Err(ApplicationError::Persistence("database is locked".to_string()))
        }
    }

    #[tokio::test]
    async fn storage_failure_maps_to_service_unavailable() {
        let runtime = runtime_with(
            Arc::new(UnavailableStore),
            InMemoryProductRepository::default(),
            InMemoryFaqRepository::default(),
        );
        let app = router(WebhookState::new(runtime, None));

        let (status, body) =
            send(app, json_request(serde_json::json!({"sender_id": "c-3", "body": "hi"}))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "The service is temporarily unavailable. Please retry shortly.");
    }
}
