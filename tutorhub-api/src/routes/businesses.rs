/// Business endpoints (admin only)
///
/// # Endpoints
///
/// - `POST /v1/businesses` - Provision business and its user
/// - `GET /v1/businesses` - List businesses
/// - `GET /v1/businesses/:id` - Get business
/// - `PUT /v1/businesses/:id` - Update business (mirrored fields reach the user)
/// - `DELETE /v1/businesses/:id` - Delete business and its user
/// - `PATCH /v1/businesses/:id/status` - Change status of business and user
/// - `PUT /v1/businesses/:id/package` - Assign package
/// - `DELETE /v1/businesses/:id/package` - Remove package
/// - `POST /v1/businesses/bulk/status` - Bulk status change
/// - `POST /v1/businesses/bulk/package` - Bulk package assignment

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tutorhub_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::{business::Business, user::Role},
    services::businesses::{BusinessChanges, NewBusiness},
};
use uuid::Uuid;
use validator::Validate;

use super::{deserialize_some, validate_request, ListQuery, ListResponse, StatusRequest};

/// Create business request
///
/// ```json
/// {
///   "owner_name": "Grace Hopper",
///   "name": "ABC Tutors",
///   "email": "abc@example.com",
///   "phone": "555-0100",
///   "location": "Springfield",
///   "password": "correct horse battery",
///   "package_id": null
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBusinessRequest {
    #[validate(length(min = 1, max = 255, message = "Owner name must be 1-255 characters"))]
    pub owner_name: String,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Slug seed; defaults to the name
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub package_id: Option<Uuid>,
}

/// Update business request; every field optional, `"package_id": null` clears it
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Owner name must be 1-255 characters"))]
    pub owner_name: Option<String>,

    #[validate(length(max = 255, message = "Location must be at most 255 characters"))]
    pub location: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    /// Empty keeps the current password
    pub password: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub package_id: Option<Option<Uuid>>,

    pub status: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AssignPackageRequest {
    pub package_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<Uuid>,
    pub status: i32,
}

#[derive(Debug, Deserialize)]
pub struct BulkPackageRequest {
    pub ids: Vec<Uuid>,
    pub package_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Businesses changed, duplicates counted once
    pub updated: u64,
}

/// Provisions a business together with its backing user
///
/// # Errors
///
/// - `404 Not Found`: `package_id` does not exist
/// - `409 Conflict`: Email or name already in use
/// - `422 Unprocessable Entity`: Invalid fields or empty slug seed
pub async fn create_business(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBusinessRequest>,
) -> ApiResult<(StatusCode, Json<Business>)> {
    require_role(&auth, Role::Admin)?;
    validate_request(&req)?;

    let business = state
        .services
        .businesses
        .create(NewBusiness {
            owner_name: req.owner_name,
            name: req.name,
            slug: req.slug,
            email: req.email,
            phone: req.phone,
            location: req.location,
            password: req.password,
            package_id: req.package_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(business)))
}

pub async fn list_businesses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Business>>> {
    require_role(&auth, Role::Admin)?;

    let page = query.page();
    let (businesses, total) = state.services.businesses.list(page).await?;

    Ok(Json(ListResponse::new(businesses, total, page)))
}

pub async fn get_business(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Business>> {
    require_role(&auth, Role::Admin)?;

    Ok(Json(state.services.businesses.get(id).await?))
}

/// Updates a business; email, phone, password and status are mirrored onto its user
pub async fn update_business(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBusinessRequest>,
) -> ApiResult<Json<Business>> {
    require_role(&auth, Role::Admin)?;
    validate_request(&req)?;

    let business = state
        .services
        .businesses
        .update(
            id,
            BusinessChanges {
                name: req.name,
                slug: req.slug,
                owner_name: req.owner_name,
                location: req.location,
                email: req.email,
                phone: req.phone,
                password: req.password,
                package_id: req.package_id,
                status: req.status,
            },
        )
        .await?;

    Ok(Json(business))
}

pub async fn delete_business(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth, Role::Admin)?;

    state.services.businesses.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Json<Business>> {
    require_role(&auth, Role::Admin)?;

    let business = state
        .services
        .businesses
        .change_status(id, req.status)
        .await?;

    Ok(Json(business))
}

pub async fn assign_package(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignPackageRequest>,
) -> ApiResult<Json<Business>> {
    require_role(&auth, Role::Admin)?;

    let business = state
        .services
        .businesses
        .assign_package(id, req.package_id)
        .await?;

    Ok(Json(business))
}

pub async fn remove_package(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Business>> {
    require_role(&auth, Role::Admin)?;

    Ok(Json(state.services.businesses.remove_package(id).await?))
}

/// Sets the status of every listed business and its user
///
/// # Errors
///
/// - `404 Not Found`: Any id is unknown; nothing is changed
/// - `422 Unprocessable Entity`: Empty id list or invalid status
pub async fn bulk_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkStatusRequest>,
) -> ApiResult<Json<BulkResponse>> {
    require_role(&auth, Role::Admin)?;

    let updated = state
        .services
        .businesses
        .bulk_update_status(&req.ids, req.status)
        .await?;

    Ok(Json(BulkResponse { updated }))
}

pub async fn bulk_package(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<BulkPackageRequest>,
) -> ApiResult<Json<BulkResponse>> {
    require_role(&auth, Role::Admin)?;

    let updated = state
        .services
        .businesses
        .bulk_assign_package(&req.ids, req.package_id)
        .await?;

    Ok(Json(BulkResponse { updated }))
}
