use std::sync::Arc;

use dokan_agent::runtime::{AgentRuntime, AssistantSettings, Collaborators, InboundMessage};
use dokan_core::lexicon::Lexicons;
use dokan_db::{SqlContactRepository, SqlFaqRepository, SqlOrderRepository, SqlProductRepository};
use serde_json::json;

use crate::commands::{build_runtime, load_config, open_pool, CommandResult, Failure};

/// Runs one message through the assistant against the configured database,
/// exactly as the webhook would. Salutations and orders are persisted.
pub fn run(sender_id: &str, text: &str) -> CommandResult {
    if sender_id.trim().is_empty() {
        return CommandResult::failure("reply", "invalid_input", "sender id must not be empty", 7);
    }

    let config = match load_config("reply") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let lexicons = match &config.assistant.lexicon_path {
        Some(path) => match Lexicons::load(path) {
            Ok(lexicons) => lexicons,
            Err(error) => {
                return CommandResult::failure(
                    "reply",
                    "config_validation",
                    format!("lexicon issue: {error}"),
                    2,
                )
            }
        },
        None => Lexicons::default(),
    };
    let runtime = match build_runtime("reply") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let message = InboundMessage::new(sender_id.trim(), text);
    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let agent = AgentRuntime::new(
            Collaborators {
                salutations: Arc::new(SqlContactRepository::new(pool.clone())),
                products: Arc::new(SqlProductRepository::new(pool.clone())),
                faq: Arc::new(SqlFaqRepository::new(pool.clone())),
                orders: Some(Arc::new(SqlOrderRepository::new(pool.clone()))),
            },
            lexicons,
            AssistantSettings::from_config(&config),
        );
        let outbound: Result<_, Failure> = agent
            .handle_message(&message)
            .await
            .map_err(|error| ("reply_failed", error.to_string(), 5u8));
        pool.close().await;
        outbound
    });

    match result {
        Ok(outbound) => CommandResult::success_with_data(
            "reply",
            outbound.text,
            Some(json!({
                "intent": outbound.intent,
                "sender_id": message.sender_id,
                "correlation_id": message.correlation_id,
            })),
        ),
        Err(failure) => CommandResult::from_failure("reply", failure),
    }
}
