use std::sync::Arc;

use crate::database::Database;
use crate::repositories::memory::MemoryStore;
use crate::repositories::{TaskDetailsRepository, TaskRepository, UserRepository};

/// Everything a handler needs, built once by the composition root.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskRepository>,
    pub details: Arc<dyn TaskDetailsRepository>,
    pub users: Arc<dyn UserRepository>,
    /// Present only for the Postgres backend; used by the health check.
    pub database: Option<Arc<Database>>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn postgres(database: Arc<Database>, bcrypt_cost: u32) -> Self {
        AppState {
            tasks: database.clone(),
            details: database.clone(),
            users: database.clone(),
            database: Some(database),
            bcrypt_cost,
        }
    }

    pub fn in_memory(bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        AppState {
            tasks: store.clone(),
            details: store.clone(),
            users: store,
            database: None,
            bcrypt_cost,
        }
    }

    pub fn storage_name(&self) -> &'static str {
        if self.database.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}
