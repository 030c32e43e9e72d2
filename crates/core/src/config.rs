use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commerce::pricing::{DeliveryFees, DEFAULT_INSIDE_FEE, DEFAULT_OUTSIDE_FEE};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub delivery: DeliveryConfig,
    pub assistant: AssistantConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    /// Shared secret expected in the `x-webhook-token` header, when set.
    pub webhook_token: Option<SecretString>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub inside_fee: u64,
    pub outside_fee: u64,
}

impl DeliveryConfig {
    pub fn fees(&self) -> DeliveryFees {
        DeliveryFees { inside: self.inside_fee, outside: self.outside_fee }
    }
}

#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub shop_name: String,
    pub currency_symbol: String,
    pub lexicon_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub shop_name: Option<String>,
    pub lexicon_path: Option<PathBuf>,
    pub webhook_token: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://dokan.db?mode=rwc".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 10000,
                graceful_shutdown_secs: 15,
                webhook_token: None,
            },
            delivery: DeliveryConfig {
                inside_fee: DEFAULT_INSIDE_FEE,
                outside_fee: DEFAULT_OUTSIDE_FEE,
            },
            assistant: AssistantConfig {
                shop_name: "STYLO".to_string(),
                currency_symbol: "৳".to_string(),
                lexicon_path: None,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("dokan.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(webhook_token_value) = server.webhook_token {
                self.server.webhook_token = Some(secret_value(webhook_token_value));
            }
        }

        if let Some(delivery) = patch.delivery {
            if let Some(inside_fee) = delivery.inside_fee {
                self.delivery.inside_fee = inside_fee;
            }
            if let Some(outside_fee) = delivery.outside_fee {
                self.delivery.outside_fee = outside_fee;
            }
        }

        if let Some(assistant) = patch.assistant {
            if let Some(shop_name) = assistant.shop_name {
                self.assistant.shop_name = shop_name;
            }
            if let Some(currency_symbol) = assistant.currency_symbol {
                self.assistant.currency_symbol = currency_symbol;
            }
            if let Some(lexicon_path) = assistant.lexicon_path {
                self.assistant.lexicon_path = Some(lexicon_path);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DOKAN_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("DOKAN_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_u32("DOKAN_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("DOKAN_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("DOKAN_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("DOKAN_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("DOKAN_SERVER_PORT") {
            self.server.port = parse_u16("DOKAN_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("DOKAN_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("DOKAN_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("DOKAN_SERVER_WEBHOOK_TOKEN") {
            self.server.webhook_token = Some(secret_value(value));
        }

        if let Some(value) = read_env("DOKAN_DELIVERY_INSIDE_FEE") {
            self.delivery.inside_fee = parse_u64("DOKAN_DELIVERY_INSIDE_FEE", &value)?;
        }
        if let Some(value) = read_env("DOKAN_DELIVERY_OUTSIDE_FEE") {
            self.delivery.outside_fee = parse_u64("DOKAN_DELIVERY_OUTSIDE_FEE", &value)?;
        }

        if let Some(value) = read_env("DOKAN_ASSISTANT_SHOP_NAME") {
            self.assistant.shop_name = value;
        }
        if let Some(value) = read_env("DOKAN_ASSISTANT_CURRENCY_SYMBOL") {
            self.assistant.currency_symbol = value;
        }
        if let Some(value) = read_env("DOKAN_ASSISTANT_LEXICON_PATH") {
            self.assistant.lexicon_path = Some(PathBuf::from(value));
        }

        let log_level = read_env("DOKAN_LOGGING_LEVEL").or_else(|| read_env("DOKAN_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("DOKAN_LOGGING_FORMAT").or_else(|| read_env("DOKAN_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(shop_name) = overrides.shop_name {
            self.assistant.shop_name = shop_name;
        }
        if let Some(lexicon_path) = overrides.lexicon_path {
            self.assistant.lexicon_path = Some(lexicon_path);
        }
        if let Some(webhook_token) = overrides.webhook_token {
            self.server.webhook_token = Some(secret_value(webhook_token));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_server(&self.server)?;
        validate_assistant(&self.assistant)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("dokan.toml"), PathBuf::from("config/dokan.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    if let Some(token) = &server.webhook_token {
        let token = token.expose_secret();
        if token.trim().is_empty() || token.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "server.webhook_token must be a non-empty value without whitespace".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_assistant(assistant: &AssistantConfig) -> Result<(), ConfigError> {
    if assistant.shop_name.trim().is_empty() {
        return Err(ConfigError::Validation("assistant.shop_name must not be empty".to_string()));
    }

    if assistant.currency_symbol.trim().is_empty() {
        return Err(ConfigError::Validation(
            "assistant.currency_symbol must not be empty".to_string(),
        ));
    }

    if let Some(path) = &assistant.lexicon_path {
        if !path.exists() {
            return Err(ConfigError::Validation(format!(
                "assistant.lexicon_path `{}` does not exist",
                path.display()
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    server: Option<ServerPatch>,
    delivery: Option<DeliveryPatch>,
    assistant: Option<AssistantPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    webhook_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DeliveryPatch {
    inside_fee: Option<u64>,
    outside_fee: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AssistantPatch {
    shop_name: Option<String>,
    currency_symbol: Option<String>,
    lexicon_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.delivery.inside_fee == 70, "default inside fee should be 70")?;
        ensure(config.delivery.outside_fee == 150, "default outside fee should be 150")?;
        ensure(config.server.webhook_token.is_none(), "webhook token should be unset")?;
        ensure(config.assistant.lexicon_path.is_none(), "lexicon path should be unset")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_DOKAN_WEBHOOK_TOKEN", "token-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("dokan.toml");
            fs::write(
                &path,
                r#"
[server]
webhook_token = "${TEST_DOKAN_WEBHOOK_TOKEN}"

[delivery]
inside_fee = 60
outside_fee = 130

[assistant]
shop_name = "Rongdhonu"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config
                    .server
                    .webhook_token
                    .as_ref()
                    .is_some_and(|token| token.expose_secret() == "token-from-env"),
                "webhook token should be loaded from environment",
            )?;
            ensure(config.delivery.fees().inside == 60, "inside fee should come from file")?;
            ensure(config.delivery.fees().outside == 130, "outside fee should come from file")?;
            ensure(config.assistant.shop_name == "Rongdhonu", "shop name should come from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_DOKAN_WEBHOOK_TOKEN"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("DOKAN_LOG_LEVEL", "warn");
        env::set_var("DOKAN_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["DOKAN_LOG_LEVEL", "DOKAN_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("DOKAN_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("DOKAN_DELIVERY_OUTSIDE_FEE", "180");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("dokan.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[delivery]
outside_fee = 160

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.delivery.outside_fee == 180, "env outside fee should win over file")?;
            Ok(())
        })();

        clear_vars(&["DOKAN_DATABASE_URL", "DOKAN_DELIVERY_OUTSIDE_FEE"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("DOKAN_DATABASE_URL", "postgres://localhost/dokan");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("database.url")
            );
            ensure(has_message, "validation failure should mention database.url")
        })();

        clear_vars(&["DOKAN_DATABASE_URL"]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("DOKAN_DELIVERY_INSIDE_FEE", "seventy");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, .. }) => {
                ensure(key == "DOKAN_DELIVERY_INSIDE_FEE", "error should name the env key")
            }
            _ => Err("expected invalid env override error".to_string()),
        };

        clear_vars(&["DOKAN_DELIVERY_INSIDE_FEE"]);
        result
    }

    #[test]
    fn missing_lexicon_file_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                lexicon_path: Some("/nonexistent/dokan-lexicon.toml".into()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::Validation(ref message)) if message.contains("lexicon_path")),
            "missing lexicon file should be reported",
        )
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("DOKAN_SERVER_WEBHOOK_TOKEN", "super-secret-webhook-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(
                !debug.contains("super-secret-webhook-value"),
                "debug output should not contain the webhook token",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&["DOKAN_SERVER_WEBHOOK_TOKEN"]);
        result
    }
}
