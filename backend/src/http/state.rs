//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repo_config::AnalyticsSettings;
use crate::db::repository::FullRepository;
use crate::models::TenantId;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Tenant and analytics knobs every request is served with
    pub settings: Arc<AnalyticsSettings>,
}

impl AppState {
    /// Create a new application state with default analytics settings.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_settings(repository, AnalyticsSettings::default())
    }

    pub fn with_settings(repository: Arc<dyn FullRepository>, settings: AnalyticsSettings) -> Self {
        Self {
            repository,
            settings: Arc::new(settings),
        }
    }

    pub fn tenant(&self) -> TenantId {
        self.settings.tenant()
    }
}
