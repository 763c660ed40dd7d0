/// Teacher profile endpoints (business or admin)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tutorhub_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::{teacher::Teacher, user::Role},
    services::teachers::{NewTeacher, TeacherChanges},
};
use uuid::Uuid;
use validator::Validate;

use super::{deserialize_some, validate_request, ListResponse, ProfileQuery, StatusRequest};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTeacherRequest {
    pub user_id: Uuid,

    pub business_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subject: String,

    #[validate(length(max = 255, message = "Qualification must be at most 255 characters"))]
    pub qualification: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Experience must not be negative"))]
    pub experience_years: i64,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "Salary must not be negative"))]
    pub salary: f64,

    pub status: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTeacherRequest {
    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subject: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub qualification: Option<Option<String>>,

    #[validate(range(min = 0, message = "Experience must not be negative"))]
    pub experience_years: Option<i64>,

    #[validate(range(min = 0.0, message = "Salary must not be negative"))]
    pub salary: Option<f64>,

    pub status: Option<i32>,
}

/// Links an existing user to a business as a teacher
///
/// # Errors
///
/// - `404 Not Found`: User or business does not exist
/// - `409 Conflict`: User already backs a teacher profile
pub async fn create_teacher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTeacherRequest>,
) -> ApiResult<(StatusCode, Json<Teacher>)> {
    require_role(&auth, Role::Business)?;
    validate_request(&req)?;

    let teacher = state
        .services
        .teachers
        .create(NewTeacher {
            user_id: req.user_id,
            business_id: req.business_id,
            subject: req.subject,
            qualification: req.qualification,
            experience_years: req.experience_years,
            salary: req.salary,
            status: req.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(teacher)))
}

pub async fn list_teachers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<ListResponse<Teacher>>> {
    require_role(&auth, Role::Business)?;

    let page = query.page();
    let (teachers, total) = state
        .services
        .teachers
        .list(query.business_id, page)
        .await?;

    Ok(Json(ListResponse::new(teachers, total, page)))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Teacher>> {
    require_role(&auth, Role::Business)?;

    Ok(Json(state.services.teachers.get(id).await?))
}

pub async fn update_teacher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeacherRequest>,
) -> ApiResult<Json<Teacher>> {
    require_role(&auth, Role::Business)?;
    validate_request(&req)?;

    let teacher = state
        .services
        .teachers
        .update(
            id,
            TeacherChanges {
                subject: req.subject,
                qualification: req.qualification,
                experience_years: req.experience_years,
                salary: req.salary,
                status: req.status,
            },
        )
        .await?;

    Ok(Json(teacher))
}

pub async fn change_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Json<Teacher>> {
    require_role(&auth, Role::Business)?;

    Ok(Json(
        state.services.teachers.change_status(id, req.status).await?,
    ))
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth, Role::Business)?;

    state.services.teachers.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
