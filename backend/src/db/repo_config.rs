//! Configuration file support.
//!
//! Reads `shoplytics.toml`:
//!
//! ```toml
//! [repository]
//! type = "local"            # or "postgres"
//!
//! [postgres]
//! database_url = "postgres://..."
//! max_connections = 10
//!
//! [analytics]
//! tenant_id = "tenant_demo"
//! forecast_alpha = 0.4
//! forecast_horizon = 30
//! ```
//!
//! Every section except `[repository]` is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::algorithms::forecast::{
    ForecastParams, DEFAULT_ALPHA, DEFAULT_BAND_WINDOW, DEFAULT_HORIZON,
};
use crate::db::PostgresConfig;
use crate::models::{TenantId, DEMO_TENANT};

pub const CONFIG_FILE_NAME: &str = "shoplytics.toml";

/// Application configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Postgres connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

/// Dashboard and analytics knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Tenant served by this instance.
    pub tenant_id: String,
    pub forecast_alpha: f64,
    pub forecast_horizon: usize,
    /// Days of daily revenue fed to the forecaster.
    pub forecast_history_days: i64,
    /// Trailing days used for the confidence band.
    pub band_window: usize,
    /// Synthetic sessions per day used for the conversion KPI.
    pub sessions_per_day: u32,
    /// Load the demo dataset at startup.
    pub seed_demo: bool,
    pub demo_seed: u64,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            tenant_id: DEMO_TENANT.to_string(),
            forecast_alpha: DEFAULT_ALPHA,
            forecast_horizon: DEFAULT_HORIZON,
            forecast_history_days: 90,
            band_window: DEFAULT_BAND_WINDOW,
            sessions_per_day: 1000,
            seed_demo: false,
            demo_seed: crate::db::seed::DEFAULT_SEED,
        }
    }
}

impl AnalyticsSettings {
    /// Overlay `SHOPLYTICS_TENANT`, `FORECAST_ALPHA`, `FORECAST_HORIZON` and
    /// `SHOPLYTICS_SEED_DEMO` on top of the current values.
    ///
    /// Unparseable values are logged and ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(tenant) = std::env::var("SHOPLYTICS_TENANT") {
            if !tenant.trim().is_empty() {
                self.tenant_id = tenant.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var("FORECAST_ALPHA") {
            match raw.parse() {
                Ok(alpha) => self.forecast_alpha = alpha,
                Err(_) => log::warn!("Ignoring invalid FORECAST_ALPHA={}", raw),
            }
        }
        if let Ok(raw) = std::env::var("FORECAST_HORIZON") {
            match raw.parse() {
                Ok(horizon) => self.forecast_horizon = horizon,
                Err(_) => log::warn!("Ignoring invalid FORECAST_HORIZON={}", raw),
            }
        }
        if let Ok(raw) = std::env::var("SHOPLYTICS_SEED_DEMO") {
            self.seed_demo = matches!(raw.trim(), "1" | "true" | "yes");
        }
        self
    }

    pub fn tenant(&self) -> TenantId {
        TenantId::new(self.tenant_id.clone())
    }

    pub fn forecast_params(&self) -> ForecastParams {
        ForecastParams {
            alpha: self.forecast_alpha,
            horizon: self.forecast_horizon,
            band_window: self.band_window,
        }
    }

    /// Reject settings the services cannot run with.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.tenant_id.trim().is_empty() {
            return Err(RepositoryError::configuration("analytics.tenant_id is empty"));
        }
        if self.forecast_history_days < 1 {
            return Err(RepositoryError::configuration(
                "analytics.forecast_history_days must be at least 1",
            ));
        }
        self.forecast_params()
            .validate()
            .map_err(|e| RepositoryError::configuration(format!("analytics: {}", e)))
    }
}

impl RepositoryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `shoplytics.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })
    }

    /// Convert to PostgresConfig if this is a Postgres configuration.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        if self.repository_type()? != RepositoryType::Postgres {
            return Ok(None);
        }

        if self.postgres.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres repository requires 'postgres.database_url' setting",
            ));
        }

        Ok(Some(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
            max_retries: self.postgres.max_retries,
            retry_delay_ms: self.postgres.retry_delay_ms,
        }))
    }

    /// Convert to PostgresConfig when the feature is disabled.
    #[cfg(not(feature = "postgres-repo"))]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        if self.repository_type()? == RepositoryType::Postgres {
            return Err(RepositoryError::configuration(
                "Postgres repository feature not enabled",
            ));
        }

        Ok(None)
    }
}
