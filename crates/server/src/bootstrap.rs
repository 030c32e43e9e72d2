use std::sync::Arc;

use dokan_agent::runtime::{AgentRuntime, AssistantSettings, Collaborators};
use dokan_core::config::{AppConfig, ConfigError, LoadOptions};
use dokan_core::lexicon::{LexiconError, Lexicons};
use dokan_db::{
    connect_with_config, migrations, DbPool, SqlContactRepository, SqlFaqRepository,
    SqlOrderRepository, SqlProductRepository,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub agent_runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let lexicons = match &config.assistant.lexicon_path {
        Some(path) => Lexicons::load(path)?,
        None => Lexicons::default(),
    };
    info!(
        event_name = "system.bootstrap.lexicons_loaded",
        correlation_id = "bootstrap",
        custom = config.assistant.lexicon_path.is_some(),
        "keyword lexicons loaded"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let collaborators = Collaborators {
        salutations: Arc::new(SqlContactRepository::new(db_pool.clone())),
        products: Arc::new(SqlProductRepository::new(db_pool.clone())),
        faq: Arc::new(SqlFaqRepository::new(db_pool.clone())),
        orders: Some(Arc::new(SqlOrderRepository::new(db_pool.clone()))),
    };
    let agent_runtime = Arc::new(AgentRuntime::new(
        collaborators,
        lexicons,
        AssistantSettings::from_config(&config),
    ));

    Ok(Application { config, db_pool, agent_runtime })
}
