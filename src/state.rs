use std::sync::Arc;

use crate::backend::{Backend, BackendError, SupabaseBackend};
use crate::config::AppConfig;

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    /// State wired to the Supabase project named in the configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, BackendError> {
        let backend = SupabaseBackend::new(&config.backend)?;
        Ok(Self::new(config, Arc::new(backend)))
    }
}
