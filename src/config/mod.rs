//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `VOCAB_CYCLE` prefix
//! and `__` to separate nested values.
//!
//! # Example
//!
//! ```no_run
//! use vocab_cycle::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod catalog;
mod cycle;
mod database;
mod error;
mod practice;
mod server;

pub use catalog::CatalogConfig;
pub use cycle::CycleConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use practice::PracticeConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

use crate::application::EngineSettings;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; state is kept in memory when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Cycle defaults and entry retention policy
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Practice-set limits
    #[serde(default)]
    pub practice: PracticeConfig,

    /// Vocabulary catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `VOCAB_CYCLE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `VOCAB_CYCLE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `VOCAB_CYCLE__DATABASE__URL=...` -> `database.url = ...`
    /// - `VOCAB_CYCLE__CYCLE__RETAIN_LEARNED_ENTRIES=false`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VOCAB_CYCLE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.cycle.validate()?;
        self.practice.validate()?;
        self.catalog.validate()?;
        Ok(())
    }

    /// Handler settings derived from the cycle and practice sections
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            default_duration_days: self.cycle.default_duration_days,
            policy: self.cycle.policy(),
            max_question_count: self.practice.max_question_count,
        }
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "VOCAB_CYCLE__SERVER__PORT",
        "VOCAB_CYCLE__SERVER__ENVIRONMENT",
        "VOCAB_CYCLE__SERVER__LOG_FORMAT",
        "VOCAB_CYCLE__DATABASE__URL",
        "VOCAB_CYCLE__CYCLE__RETAIN_LEARNED_ENTRIES",
        "VOCAB_CYCLE__CYCLE__DEFAULT_DURATION_DAYS",
        "VOCAB_CYCLE__PRACTICE__MAX_QUESTION_COUNT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        clear_env();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert!(config.database.is_none());
        assert_eq!(config.cycle.default_duration_days, 7);
        assert_eq!(config.practice.max_question_count, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_values_are_read() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("VOCAB_CYCLE__SERVER__PORT", "9000"),
            ("VOCAB_CYCLE__SERVER__LOG_FORMAT", "json"),
            ("VOCAB_CYCLE__DATABASE__URL", "postgres://localhost/vocab"),
            ("VOCAB_CYCLE__CYCLE__RETAIN_LEARNED_ENTRIES", "false"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(
            config.database.as_ref().unwrap().url.expose_secret(),
            "postgres://localhost/vocab"
        );
        assert!(!config.cycle.retain_learned_entries);
    }

    #[test]
    fn test_engine_settings_follow_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("VOCAB_CYCLE__CYCLE__DEFAULT_DURATION_DAYS", "14"),
            ("VOCAB_CYCLE__PRACTICE__MAX_QUESTION_COUNT", "20"),
        ])
        .unwrap();

        let settings = config.engine_settings();
        assert_eq!(settings.default_duration_days, 14);
        assert_eq!(settings.max_question_count, 20);
        assert!(settings.policy.retain_learned_entries);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("VOCAB_CYCLE__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_validate_rejects_bad_cycle_length() {
        let config = AppConfig {
            cycle: CycleConfig {
                default_duration_days: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCycleDuration));
    }
}
