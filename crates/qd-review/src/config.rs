//! Environment-driven settings and database startup.

use anyhow::Context;
use qd_db::PgCardStore;
use serde::Deserialize;

/// Deployment environment, selects the logging format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Pretty logs, debug level
    #[default]
    Development,
    /// JSON logs, info level
    Production,
}

impl Environment {
    /// Whether this is the development environment.
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Settings read from the environment
#[derive(Clone, Debug, Deserialize)]
pub struct ReviewConfig {
    /// Connection string of the card database
    pub database_url: String,
    /// Upper bound of the connection pool
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    /// Read from `APP_ENV`
    #[serde(default, rename = "app_env")]
    pub env: Environment,
    /// How many inactive cards one "add to deck" action activates
    #[serde(default = "default_deck_batch_size")]
    pub deck_batch_size: usize,
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_deck_batch_size() -> usize {
    3
}

impl ReviewConfig {
    /// Load the configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Connect to the card database, creating and migrating it when needed.
    pub async fn connect(&self) -> anyhow::Result<PgCardStore> {
        let pool = qd_db::create_pool(&self.database_url, self.database_max_connections)
            .await
            .context("failed to create card database pool")?;
        qd_db::ensure_db_and_migrate(&self.database_url, &pool).await?;

        tracing::info!(
            "Card store ready (max {} connections)",
            self.database_max_connections
        );
        Ok(PgCardStore::new(pool))
    }
}
