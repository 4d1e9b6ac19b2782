use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{HistorySource, IdentityService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub history: Arc<dyn HistorySource>,
    pub identities: Arc<dyn IdentityService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        history: Arc<dyn HistorySource>,
        identities: Arc<dyn IdentityService>,
    ) -> Self {
        Self {
            config,
            history,
            identities,
        }
    }
}
