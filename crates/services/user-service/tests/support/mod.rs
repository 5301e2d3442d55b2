//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use common::DatabaseConfig;
use user_service_lib::infra::Database;
use user_service_lib::repository::{Persistence, UserStore};
use user_service_lib::service::UserManager;

/// Fresh in-memory SQLite database with all migrations applied.
pub async fn setup_db() -> Arc<Database> {
    let db = Database::connect(&DatabaseConfig::in_memory_sqlite())
        .await
        .expect("in-memory sqlite should connect");
    Arc::new(db)
}

/// Repository bound directly to the pool.
pub async fn setup_store() -> UserStore {
    let db = setup_db().await;
    UserStore::new(db.get_connection())
}

/// Service backed by the sea-orm unit of work.
pub async fn setup_service() -> UserManager {
    let db = setup_db().await;
    UserManager::new(Arc::new(Persistence::new(db.get_connection())))
}
