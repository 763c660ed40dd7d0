/// Package endpoints (admin only)
///
/// - `POST /v1/packages`
/// - `GET /v1/packages`
/// - `GET /v1/packages/:id`
/// - `PUT /v1/packages/:id`
/// - `DELETE /v1/packages/:id`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tutorhub_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::{package::Package, user::Role},
    services::packages::{NewPackage, PackageChanges},
};
use uuid::Uuid;
use validator::Validate;

use super::{deserialize_some, validate_request, ListQuery, ListResponse};

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePackageRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    #[validate(range(min = 1, message = "Validation period must be at least one day"))]
    pub validation_period_days: i64,

    pub description: Option<String>,

    pub status: Option<i32>,
}

/// Partial update; `"description": null` clears the description
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePackageRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    #[validate(range(min = 1, message = "Validation period must be at least one day"))]
    pub validation_period_days: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,

    pub status: Option<i32>,
}

pub async fn create_package(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePackageRequest>,
) -> ApiResult<(StatusCode, Json<Package>)> {
    require_role(&auth, Role::Admin)?;
    validate_request(&req)?;

    let package = state
        .services
        .packages
        .create(NewPackage {
            name: req.name,
            price: req.price,
            validation_period_days: req.validation_period_days,
            description: req.description,
            status: req.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(package)))
}

pub async fn list_packages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ListResponse<Package>>> {
    require_role(&auth, Role::Admin)?;

    let page = query.page();
    let (packages, total) = state.services.packages.list(page).await?;

    Ok(Json(ListResponse::new(packages, total, page)))
}

pub async fn get_package(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Package>> {
    require_role(&auth, Role::Admin)?;

    Ok(Json(state.services.packages.get(id).await?))
}

pub async fn update_package(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePackageRequest>,
) -> ApiResult<Json<Package>> {
    require_role(&auth, Role::Admin)?;
    validate_request(&req)?;

    let package = state
        .services
        .packages
        .update(
            id,
            PackageChanges {
                name: req.name,
                price: req.price,
                validation_period_days: req.validation_period_days,
                description: req.description,
                status: req.status,
            },
        )
        .await?;

    Ok(Json(package))
}

/// # Errors
///
/// - `409 Conflict`: A business is still subscribed to the package
pub async fn delete_package(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth, Role::Admin)?;

    state.services.packages.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
