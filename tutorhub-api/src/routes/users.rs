/// User account endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Create user (admin)
/// - `GET /v1/users` - List users (admin)
/// - `GET /v1/users/:id` - Get user (admin)
/// - `POST /v1/users/:id/promote` - Promote user (any authenticated caller;
///   the caller's role bounds what may be granted)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tutorhub_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::user::{Role, User},
    services::users::NewUser,
};
use uuid::Uuid;
use validator::Validate;

use super::{validate_request, ListQuery, ListResponse};

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// admin, business, teacher or student
    pub role: String,

    pub status: Option<i32>,
}

/// Promote user request
#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    /// Role to grant
    pub role: String,
}

/// Creates a user account
///
/// # Errors
///
/// - `409 Conflict`: Email already in use
/// - `422 Unprocessable Entity`: Invalid email, role, status or short password
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    require_role(&auth, Role::Admin)?;
    validate_request(&req)?;

    let user = state
        .services
        .users
        .create_user(NewUser {
            name: req.name,
            email: req.email,
            phone: req.phone,
            password: req.password,
            role: req.role,
            status: req.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<User>>> {
    require_role(&auth, Role::Admin)?;

    let page = query.page();
    let (users, total) = state.services.users.list_users(page).await?;

    Ok(Json(ListResponse::new(users, total, page)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    require_role(&auth, Role::Admin)?;

    Ok(Json(state.services.users.get_user(id).await?))
}

/// Raises a user's role
///
/// # Errors
///
/// - `403 Forbidden`: Caller's role is below the requested role
/// - `404 Not Found`: User does not exist
/// - `422 Unprocessable Entity`: Unknown role, demotion, or unchanged role
pub async fn promote_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<PromoteRequest>,
) -> ApiResult<Json<User>> {
    let user = state
        .services
        .users
        .promote_user(id, &req.role, auth.role)
        .await?;

    Ok(Json(user))
}
