use std::sync::Arc;

use crate::libs::TableManager;

/// Shared handler state. Cloned per request; the manager itself is stateless.
#[derive(Clone)]
pub struct AppState {
    manager: Arc<TableManager>,
}

impl AppState {
    pub fn new(manager: TableManager) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    pub fn manager(&self) -> &TableManager {
        &self.manager
    }
}
