//! User service tests against a real schema (in-memory SQLite).

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use common::{AppError, PageRequest};
use domain::{User, MAX_PAGE_OFFSET};
use user_service_lib::repository::{
    RepoResult, TransactionScope, UnitOfWork, UserRepository, UserStore,
};
use user_service_lib::service::{UserManager, UserService};

use support::{setup_db, setup_service};

/// Store whose username pre-checks never see existing rows, as when a
/// concurrent writer commits between the check and the insert.
struct StalePrecheck(UserStore);

#[async_trait]
impl UserRepository for StalePrecheck {
    async fn create(&self, username: &str) -> RepoResult<User> {
        self.0.create(username).await
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        self.0.find_by_id(id).await
    }

    async fn find_by_username(&self, _username: &str) -> RepoResult<Option<User>> {
        Ok(None)
    }

    async fn find_all(&self, offset: u64, limit: u64) -> RepoResult<Vec<User>> {
        self.0.find_all(offset, limit).await
    }

    async fn count(&self) -> RepoResult<u64> {
        self.0.count().await
    }

    async fn update_username(&self, id: Uuid, new_username: &str) -> RepoResult<bool> {
        self.0.update_username(id, new_username).await
    }

    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool> {
        self.0.delete_by_id(id).await
    }

    async fn exists_by_username(&self, _username: &str) -> RepoResult<bool> {
        Ok(false)
    }

    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<User>> {
        self.0.find_created_between(start, end).await
    }
}

/// Unit of work handing out the stale store; its scopes run in autocommit.
struct StaleUnitOfWork(Arc<StalePrecheck>);

struct StaleScope(Arc<StalePrecheck>);

#[async_trait]
impl UnitOfWork for StaleUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.0.clone()
    }

    async fn begin(&self) -> RepoResult<Box<dyn TransactionScope>> {
        Ok(Box::new(StaleScope(self.0.clone())))
    }
}

#[async_trait]
impl TransactionScope for StaleScope {
    fn users(&self) -> &dyn UserRepository {
        self.0.as_ref()
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        Ok(())
    }
}

async fn stale_service() -> UserManager {
    let db = setup_db().await;
    let store = StalePrecheck(UserStore::new(db.get_connection()));
    UserManager::new(Arc::new(StaleUnitOfWork(Arc::new(store))))
}

#[tokio::test]
async fn test_create_then_lookup_round_trip() {
    let service = setup_service().await;
    let before = Utc::now();

    let created = service.create_user("alice").await.unwrap();
    let by_id = service.get_user_by_id(&created.id.to_string()).await.unwrap();
    let by_name = service.get_user_by_username("alice").await.unwrap();

    assert_eq!(by_id, created);
    assert_eq!(by_name, created);
    assert!((created.created_at - before).num_seconds().abs() <= 5);
}

#[tokio::test]
async fn test_duplicate_create_keeps_single_row() {
    let service = setup_service().await;
    let first = service.create_user("bob").await.unwrap();

    let err = service.create_user("bob").await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateUsername(ref name) if name == "bob"));
    let page = service.list_users(PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].id, first.id);
}

#[tokio::test]
async fn test_concurrent_duplicate_create_serializes_to_one_winner() {
    // One pooled connection: the second transaction starts after the first
    // commits and is turned away by the pre-check
    let service = setup_service().await;

    let (a, b) = tokio::join!(service.create_user("carol"), service.create_user("carol"));

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(AppError::DuplicateUsername(_)))));
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let service = setup_service().await;

    let err = service
        .get_user_by_id(&Uuid::new_v4().to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UserNotFound));
}

#[tokio::test]
async fn test_availability_tracks_current_state() {
    let service = setup_service().await;

    assert!(service.is_username_available("dave").await.unwrap());

    let dave = service.create_user("dave").await.unwrap();
    assert!(!service.is_username_available("dave").await.unwrap());

    assert!(service.delete_user(&dave.id.to_string()).await.unwrap());
    assert!(service.is_username_available("dave").await.unwrap());
}

#[tokio::test]
async fn test_pagination_splits_five_users_three_and_two() {
    let service = setup_service().await;
    for name in ["p_one", "p_two", "p_three", "p_four", "p_five"] {
        service.create_user(name).await.unwrap();
    }

    let first = service.list_users(PageRequest::new(0, 3)).await.unwrap();
    let second = service.list_users(PageRequest::new(3, 3)).await.unwrap();

    assert_eq!(first.data.len(), 3);
    assert_eq!(second.data.len(), 2);
    assert_eq!(first.total, 5);
    assert!(first.has_more());
    assert!(!second.has_more());
    assert!(first
        .data
        .iter()
        .all(|a| second.data.iter().all(|b| a.id != b.id)));
}

#[tokio::test]
async fn test_rename_collision_leaves_both_users_unchanged() {
    let service = setup_service().await;
    let erin = service.create_user("erin").await.unwrap();
    let frank = service.create_user("frank").await.unwrap();

    let err = service
        .update_username(&erin.id.to_string(), "frank")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateUsername(_)));
    assert_eq!(
        service.get_user_by_id(&erin.id.to_string()).await.unwrap().username,
        "erin"
    );
    assert_eq!(
        service.get_user_by_id(&frank.id.to_string()).await.unwrap().username,
        "frank"
    );
}

#[tokio::test]
async fn test_rename_frees_old_name() {
    let service = setup_service().await;
    let grace = service.create_user("grace").await.unwrap();

    let renamed = service
        .update_username(&grace.id.to_string(), "grace_h")
        .await
        .unwrap();

    assert_eq!(renamed.id, grace.id);
    assert_eq!(renamed.username, "grace_h");
    assert_eq!(renamed.created_at, grace.created_at);
    assert!(service.is_username_available("grace").await.unwrap());
}

#[tokio::test]
async fn test_rename_unknown_user_is_not_found() {
    let service = setup_service().await;

    let err = service
        .update_username(&Uuid::new_v4().to_string(), "heidi")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UserNotFound));
}

#[tokio::test]
async fn test_double_delete_returns_false() {
    let service = setup_service().await;
    let ivan = service.create_user("ivan").await.unwrap();
    let id = ivan.id.to_string();

    assert!(service.delete_user(&id).await.unwrap());
    assert!(!service.delete_user(&id).await.unwrap());
    assert!(matches!(
        service.get_user_by_id(&id).await,
        Err(AppError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_users_created_between_window() {
    let service = setup_service().await;
    let start = Utc::now() - Duration::seconds(1);
    service.create_user("judy").await.unwrap();
    service.create_user("kim").await.unwrap();
    let end = Utc::now() + Duration::seconds(1);

    let users = service.users_created_between(start, end).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username, "judy");
    assert!(matches!(
        service.users_created_between(end, start).await,
        Err(AppError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_storage() {
    let service = setup_service().await;

    assert!(matches!(service.create_user("").await, Err(AppError::InvalidInput(_))));
    assert!(matches!(service.create_user("no spaces").await, Err(AppError::InvalidInput(_))));
    assert!(matches!(service.get_user_by_id("").await, Err(AppError::InvalidInput(_))));
    assert!(matches!(service.get_user_by_username("  ").await, Err(AppError::InvalidInput(_))));

    let page = service.list_users(PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_lost_race_on_create_is_reported_as_duplicate() {
    let service = stale_service().await;
    service.create_user("lena").await.unwrap();

    let err = service.create_user("lena").await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateUsername(ref name) if name == "lena"));
    let page = service.list_users(PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn test_lost_race_on_rename_leaves_rows_unchanged() {
    let service = stale_service().await;
    let mia = service.create_user("mia").await.unwrap();
    service.create_user("noah").await.unwrap();

    let err = service
        .update_username(&mia.id.to_string(), "noah")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateUsername(ref name) if name == "noah"));
    assert_eq!(
        service.get_user_by_id(&mia.id.to_string()).await.unwrap().username,
        "mia"
    );
}

#[tokio::test]
async fn test_list_users_offset_bounds_against_store() {
    let service = setup_service().await;
    service.create_user("olga").await.unwrap();

    assert!(matches!(
        service.list_users(PageRequest::new(u64::MAX, 3)).await,
        Err(AppError::InvalidInput(_))
    ));

    let far = service
        .list_users(PageRequest::new(MAX_PAGE_OFFSET, 3))
        .await
        .unwrap();
    assert!(far.data.is_empty());
    assert_eq!(far.total, 1);
}
