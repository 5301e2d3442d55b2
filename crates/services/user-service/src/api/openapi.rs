//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::api::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::api::handlers::user_handler::{
    AvailabilityResponse, CreateUserRequest, UpdateUsernameRequest, UserListResponse,
};
use domain::UserResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::user_handler::create_user,
        crate::api::handlers::user_handler::list_users,
        crate::api::handlers::user_handler::users_created_between,
        crate::api::handlers::user_handler::get_user,
        crate::api::handlers::user_handler::update_username,
        crate::api::handlers::user_handler::delete_user,
        crate::api::handlers::user_handler::get_user_by_username,
        crate::api::handlers::user_handler::check_username,
        crate::api::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            UserResponse,
            CreateUserRequest,
            UpdateUsernameRequest,
            UserListResponse,
            AvailabilityResponse,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Users", description = "Username registry endpoints"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;
