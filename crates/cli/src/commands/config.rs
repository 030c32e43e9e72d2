use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dokan_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let webhook_token = config
        .server
        .webhook_token
        .as_ref()
        .map(|token| redact_token(token.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    let lexicon_path = config
        .assistant
        .lexicon_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<built-in>".to_string());

    let fields = vec![
        row("database.url", config.database.url.clone(), &["DOKAN_DATABASE_URL"]),
        row(
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["DOKAN_DATABASE_MAX_CONNECTIONS"],
        ),
        row(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["DOKAN_DATABASE_TIMEOUT_SECS"],
        ),
        row("server.bind_address", config.server.bind_address.clone(), &["DOKAN_SERVER_BIND_ADDRESS"]),
        row("server.port", config.server.port.to_string(), &["DOKAN_SERVER_PORT"]),
        row(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["DOKAN_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        row("server.webhook_token", webhook_token, &["DOKAN_SERVER_WEBHOOK_TOKEN"]),
        row(
            "delivery.inside_fee",
            config.delivery.inside_fee.to_string(),
            &["DOKAN_DELIVERY_INSIDE_FEE"],
        ),
        row(
            "delivery.outside_fee",
            config.delivery.outside_fee.to_string(),
            &["DOKAN_DELIVERY_OUTSIDE_FEE"],
        ),
        row("assistant.shop_name", config.assistant.shop_name.clone(), &["DOKAN_ASSISTANT_SHOP_NAME"]),
        row(
            "assistant.currency_symbol",
            config.assistant.currency_symbol.clone(),
            &["DOKAN_ASSISTANT_CURRENCY_SYMBOL"],
        ),
        row("assistant.lexicon_path", lexicon_path, &["DOKAN_ASSISTANT_LEXICON_PATH"]),
        row("logging.level", config.logging.level.clone(), &["DOKAN_LOGGING_LEVEL", "DOKAN_LOG_LEVEL"]),
        row(
            "logging.format",
            format!("{:?}", config.logging.format).to_lowercase(),
            &["DOKAN_LOGGING_FORMAT", "DOKAN_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(
        fields
            .into_iter()
            .map(|(key, value, env_keys)| render_line(key, &value, source(key, env_keys))),
    );
    lines.join("\n")
}

type Row = (&'static str, String, &'static [&'static str]);

fn row(key: &'static str, value: String, env_keys: &'static [&'static str]) -> Row {
    (key, value, env_keys)
}

fn detect_config_path() -> Option<PathBuf> {
    ["dokan.toml", "config/dokan.toml"].into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps at most the first four characters of a token.
fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }
    let visible: String = trimmed.chars().take(4).collect();
    if visible.chars().count() == trimmed.chars().count() {
        return "<redacted>".to_string();
    }
    format!("{visible}***")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, redact_token};

    #[test]
    fn redaction_never_reveals_short_tokens() {
        assert_eq!(redact_token("   "), "<empty>");
        assert_eq!(redact_token("abcd"), "<redacted>");
        assert_eq!(redact_token("hook-secret"), "hook***");
    }

    #[test]
    fn dotted_paths_resolve_against_nested_tables() {
        let doc: Value = "[delivery]\ninside_fee = 60\n".parse().expect("toml");
        assert!(contains_path(&doc, "delivery.inside_fee"));
        assert!(!contains_path(&doc, "delivery.outside_fee"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
