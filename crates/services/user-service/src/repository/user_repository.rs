//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::error::{RepoError, RepoResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Absence is never an error here: lookups return `None`, mutations report
/// whether a row was touched.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with a fresh id and the current timestamp
    async fn create(&self, username: &str) -> RepoResult<User>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Newest first; ties on `created_at` are ordered by id
    async fn find_all(&self, offset: u64, limit: u64) -> RepoResult<Vec<User>>;

    async fn count(&self) -> RepoResult<u64>;

    /// Rename a user. Returns `false` when no row has this id.
    async fn update_username(&self, id: Uuid, new_username: &str) -> RepoResult<bool>;

    /// Returns `false` when no row has this id.
    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool>;

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool>;

    /// Users created within `[start, end]`, oldest first
    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<User>>;
}

/// SeaORM implementation of UserRepository.
///
/// Generic over the connection so the same queries run on the pool or
/// inside a `DatabaseTransaction`.
pub struct UserStore<C = DatabaseConnection> {
    conn: C,
}

impl<C> UserStore<C> {
    /// Create new repository instance
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Give back the underlying connection (used to commit a transaction)
    pub fn into_inner(self) -> C {
        self.conn
    }
}

#[async_trait]
impl<C> UserRepository for UserStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn create(&self, username: &str) -> RepoResult<User> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            created_at: Set(Utc::now()),
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .map_err(|e| RepoError::classify_write(e, username))?;

        Ok(User::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.conn).await?;

        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_all(&self, offset: u64, limit: u64) -> RepoResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> RepoResult<u64> {
        let total = UserEntity::find().count(&self.conn).await?;
        Ok(total)
    }

    async fn update_username(&self, id: Uuid, new_username: &str) -> RepoResult<bool> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::Username, Expr::value(new_username.to_string()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .map_err(|e| RepoError::classify_write(e, new_username))?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool> {
        let result = UserEntity::delete_by_id(id).exec(&self.conn).await?;

        Ok(result.rows_affected > 0)
    }

    async fn exists_by_username(&self, username: &str) -> RepoResult<bool> {
        let matches = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.conn)
            .await?;

        Ok(matches > 0)
    }

    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::CreatedAt.between(start, end))
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
