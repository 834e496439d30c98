use std::sync::Arc;

use crate::dashboard::Dashboard;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub default_queue: String,
}

impl AppState {
    pub fn new(dashboard: Dashboard, default_queue: String) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            default_queue,
        }
    }
}
