//! Shared application state for all routes. Immutable after startup.

use crate::access::AllowList;
use crate::config::AppConfig;
use crate::store::RiddleStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RiddleStore>,
    pub allow_list: Arc<AllowList>,
    /// Prefix for link hrefs; None derives it from the Host header.
    pub base_url: Option<Arc<str>>,
}

impl AppState {
    pub fn new(store: Arc<dyn RiddleStore>, config: &AppConfig) -> Self {
        AppState {
            store,
            allow_list: Arc::new(AllowList::new(config.allowed_ips.iter().cloned())),
            base_url: config.base_url().map(Arc::from),
        }
    }
}
