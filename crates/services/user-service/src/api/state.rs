//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::Database;
use crate::repository::Persistence;
use crate::service::{UserManager, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub users: Arc<dyn UserService>,
    /// Database handle (health checks)
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the sea-orm unit of work and user service on top of `database`.
    pub fn from_database(database: Arc<Database>) -> Self {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        let users = Arc::new(UserManager::new(uow));

        Self { users, database }
    }
}

