//! User handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppError, AppResult, Page, PageRequest};
use domain::{UserResponse, DEFAULT_PAGE_SIZE};

use crate::api::extractors::{ApiQuery, ValidatedJson};
use crate::api::AppState;

/// User registration request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Desired username (letters, digits, `_` and `-`)
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    #[schema(example = "jane_doe")]
    pub username: String,
}

/// Rename request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUsernameRequest {
    /// New username
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    #[schema(example = "jane_d")]
    pub username: String,
}

/// Pagination query for listing users
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Rows to skip (default 0)
    #[serde(default)]
    pub offset: u64,
    /// Page size (default 20, capped at 100)
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl From<ListUsersQuery> for PageRequest {
    fn from(query: ListUsersQuery) -> Self {
        PageRequest::new(query.offset, query.limit)
    }
}

/// Inclusive creation-time window
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreatedBetweenQuery {
    /// RFC 3339 lower bound
    pub start: DateTime<Utc>,
    /// RFC 3339 upper bound
    pub end: DateTime<Utc>,
}

/// One page of users, newest first
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
    pub offset: u64,
    pub limit: u64,
    /// Total number of users
    pub total: u64,
}

impl From<Page<UserResponse>> for UserListResponse {
    fn from(page: Page<UserResponse>) -> Self {
        Self {
            data: page.data,
            offset: page.offset,
            limit: page.limit,
            total: page.total,
        }
    }
}

/// Username availability
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub username: String,
    pub available: bool,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/created", get(users_created_between))
        .route("/by-username/:username", get(get_user_by_username))
        .route("/by-username/:username/available", get(check_username))
        .route("/:id", get(get_user).put(update_username).delete(delete_user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid username"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.users.create_user(&payload.username).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 400, description = "Invalid pagination parameters")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> AppResult<Json<UserListResponse>> {
    let page = state.users.list_users(query.into()).await?;
    Ok(Json(page.map(UserResponse::from).into()))
}

/// Users created within a time window, oldest first
#[utoipa::path(
    get,
    path = "/users/created",
    tag = "Users",
    params(CreatedBetweenQuery),
    responses(
        (status = 200, description = "Users in the window", body = Vec<UserResponse>),
        (status = 400, description = "Malformed or inverted range")
    )
)]
pub async fn users_created_between(
    State(state): State<AppState>,
    ApiQuery(range): ApiQuery<CreatedBetweenQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state
        .users
        .users_created_between(range.start, range.end)
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user_by_id(&id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Rename a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUsernameRequest,
    responses(
        (status = 200, description = "User renamed", body = UserResponse),
        (status = 400, description = "Malformed id or username"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn update_username(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUsernameRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.update_username(&id, &payload.username).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.users.delete_user(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::UserNotFound)
    }
}

/// Get user by username
#[utoipa::path(
    get,
    path = "/users/by-username/{username}",
    tag = "Users",
    params(
        ("username" = String, Path, description = "Exact username")
    ),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user_by_username(&username).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Check whether a username is free
#[utoipa::path(
    get,
    path = "/users/by-username/{username}/available",
    tag = "Users",
    params(
        ("username" = String, Path, description = "Username to check")
    ),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
        (status = 400, description = "Blank username")
    )
)]
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<AvailabilityResponse>> {
    let available = state.users.is_username_available(&username).await?;
    Ok(Json(AvailabilityResponse {
        username,
        available,
    }))
}
