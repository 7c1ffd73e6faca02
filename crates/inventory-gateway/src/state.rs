use std::sync::Arc;

use inventory_core::ProductRepository;

#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &dyn ProductRepository {
        self.repository.as_ref()
    }
}
