//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//!
//! The username pre-check is a fast path. The unique index decides races, and
//! both paths surface the same `DuplicateUsername` error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt, Page, PageRequest};
use domain::{require_non_blank, User, Username, MAX_PAGE_OFFSET};

use crate::repository::{RepoError, RepoResult, UnitOfWork, UserRepository};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new username
    async fn create_user(&self, username: &str) -> AppResult<User>;

    async fn get_user_by_id(&self, id: &str) -> AppResult<User>;

    async fn get_user_by_username(&self, username: &str) -> AppResult<User>;

    /// True iff no user currently holds `username`
    async fn is_username_available(&self, username: &str) -> AppResult<bool>;

    /// Newest users first
    async fn list_users(&self, page: PageRequest) -> AppResult<Page<User>>;

    async fn update_username(&self, id: &str, new_username: &str) -> AppResult<User>;

    /// Returns `false` when there was nothing to delete
    async fn delete_user(&self, id: &str) -> AppResult<bool>;

    /// Users created within `[start, end]`, oldest first
    async fn users_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<User>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager {
    uow: Arc<dyn UnitOfWork>,
}

impl UserManager {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    /// Run `op` inside one transaction: commit on success, roll back on error.
    async fn atomically<T, F>(&self, op: F) -> AppResult<T>
    where
        T: Send,
        F: for<'a> FnOnce(&'a dyn UserRepository) -> BoxFuture<'a, RepoResult<T>> + Send,
    {
        let tx = self
            .uow
            .begin()
            .await
            .map_err(|e| storage_failure("begin transaction", e))?;

        match op(tx.users()).await {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| storage_failure("commit transaction", e))?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e.into())
            }
        }
    }
}

/// Wrap a repository error raised outside a business rule (begin/commit).
fn storage_failure(context: &str, err: RepoError) -> AppError {
    match err {
        RepoError::StorageFailure(source) => AppError::operation_failed(context, source),
        other => other.into(),
    }
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    let raw = require_non_blank("User id", raw)?;
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::invalid_input(format!("'{}' is not a valid user id", raw)))
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, username: &str) -> AppResult<User> {
        let username = Username::parse(username)?;

        let user = self
            .atomically(move |users| {
                Box::pin(async move {
                    if users.exists_by_username(username.as_str()).await? {
                        return Err(RepoError::DuplicateUsername(username.into_inner()));
                    }
                    users.create(username.as_str()).await
                })
            })
            .await
            .inspect_err(|e| {
                if let AppError::DuplicateUsername(name) = e {
                    tracing::warn!(username = %name, "Rejected duplicate username");
                }
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &str) -> AppResult<User> {
        let id = parse_id(id)?;

        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<User> {
        let username = require_non_blank("Username", username)?;

        self.uow
            .users()
            .find_by_username(username)
            .await?
            .ok_or_not_found()
    }

    async fn is_username_available(&self, username: &str) -> AppResult<bool> {
        let username = require_non_blank("Username", username)?;

        let taken = self.uow.users().exists_by_username(username).await?;
        Ok(!taken)
    }

    async fn list_users(&self, page: PageRequest) -> AppResult<Page<User>> {
        if page.limit == 0 {
            return Err(AppError::invalid_input("Limit must be at least 1"));
        }
        if page.offset > MAX_PAGE_OFFSET {
            return Err(AppError::invalid_input(format!(
                "Offset must not exceed {}",
                MAX_PAGE_OFFSET
            )));
        }
        let limit = page.capped_limit();

        let users = self.uow.users();
        let total = users.count().await?;
        let data = users.find_all(page.offset, limit).await?;

        Ok(Page::new(data, page.offset, limit, total))
    }

    async fn update_username(&self, id: &str, new_username: &str) -> AppResult<User> {
        let id = parse_id(id)?;
        let new_username = Username::parse(new_username)?;

        let user = self
            .atomically(move |users| {
                Box::pin(async move {
                    if let Some(holder) = users.find_by_username(new_username.as_str()).await? {
                        if holder.id != id {
                            return Err(RepoError::DuplicateUsername(new_username.into_inner()));
                        }
                    }

                    if !users.update_username(id, new_username.as_str()).await? {
                        return Ok(None);
                    }
                    users.find_by_id(id).await
                })
            })
            .await?
            .ok_or_not_found()?;

        tracing::info!(user_id = %user.id, username = %user.username, "Username updated");
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> AppResult<bool> {
        let id = parse_id(id)?;

        let deleted = self.uow.users().delete_by_id(id).await?;
        if deleted {
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(deleted)
    }

    async fn users_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<User>> {
        if start > end {
            return Err(AppError::invalid_input("Range start must not be after its end"));
        }

        Ok(self.uow.users().find_created_between(start, end).await?)
    }
}
