//! Unit of Work pattern implementation.
//!
//! SOLID (SRP): Manages transaction lifecycle and repository access.
//!
//! Reads go straight through [`UnitOfWork::users`]. Every check-then-write
//! sequence runs on the repository handed out by a [`TransactionScope`], so the
//! pre-check and the write commit or roll back together.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;

use super::error::RepoResult;
use super::user_repository::{UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// User repository bound to the connection pool (no transaction)
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Open a transaction. Dropping the scope without committing rolls it back.
    async fn begin(&self) -> RepoResult<Box<dyn TransactionScope>>;
}

/// An open transaction with repository access.
#[async_trait]
pub trait TransactionScope: Send + Sync {
    /// User repository whose statements run inside this transaction
    fn users(&self) -> &dyn UserRepository;

    async fn commit(self: Box<Self>) -> RepoResult<()>;

    async fn rollback(self: Box<Self>) -> RepoResult<()>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn begin(&self) -> RepoResult<Box<dyn TransactionScope>> {
        // Isolation is left at the backend default; the unique index is the
        // final arbiter for concurrent writers.
        let txn = self.db.begin().await?;
        Ok(Box::new(SeaTransaction {
            users: UserStore::new(txn),
        }))
    }
}

/// Transaction scope backed by a SeaORM `DatabaseTransaction`.
struct SeaTransaction {
    users: UserStore<DatabaseTransaction>,
}

#[async_trait]
impl TransactionScope for SeaTransaction {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.users.into_inner().commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        self.users.into_inner().rollback().await?;
        Ok(())
    }
}
