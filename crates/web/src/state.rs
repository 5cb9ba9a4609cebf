use std::sync::Arc;

use storage::ProfileStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ProfileStore>,
}

impl AppState {
    pub fn new(store: impl ProfileStore + 'static) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn ProfileStore {
        self.store.as_ref()
    }
}
