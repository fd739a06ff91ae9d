//! Log subscriber setup for applications embedding the review core.
//!
//! The core itself only emits `tracing` events; installing a subscriber is
//! left to the caller through [`init_tracing`].

use tracing_subscriber::{
    EnvFilter, Layer,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::{Environment, ReviewConfig};

/// Directives applied when `RUST_LOG` is not set.
pub const fn default_directives(env: Environment) -> &'static str {
    match env {
        Environment::Development => "warn,qd_review=debug,qd_db=debug,sqlx=warn",
        Environment::Production => "warn,qd_review=info,qd_db=info,sqlx=error",
    }
}

fn env_filter(env: Environment) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(env)))
}

/// Install the global subscriber for `config.env`.
///
/// Development logs are pretty-printed with source locations, production
/// logs are flattened JSON lines. `RUST_LOG` overrides
/// [`default_directives`], e.g. `RUST_LOG=qd_review=trace`.
///
/// # Errors
///
/// Fails when a global subscriber has already been installed.
pub fn init_tracing(config: &ReviewConfig) -> Result<(), TryInitError> {
    let filter = env_filter(config.env);
    let registry = tracing_subscriber::registry();

    match config.env {
        Environment::Development => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .with_filter(filter),
            )
            .try_init()?,
        Environment::Production => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_filter(filter),
            )
            .try_init()?,
    }

    tracing::info!(environment = ?config.env, "Logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(env: Environment) -> ReviewConfig {
        ReviewConfig {
            database_url: "postgres://localhost/quiz".to_string(),
            database_max_connections: 1,
            env,
            deck_batch_size: 3,
        }
    }

    #[test]
    fn test_default_directives_parse() {
        for env in [Environment::Development, Environment::Production] {
            assert!(EnvFilter::try_new(default_directives(env)).is_ok());
        }
    }

    #[test]
    fn test_init_tracing_only_once() {
        let config = config(Environment::Production);

        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_err());
    }
}
