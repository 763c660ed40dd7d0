/// Student profile endpoints (business or admin)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tutorhub_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::{student::Student, user::Role},
    services::students::{NewStudent, StudentChanges},
};
use uuid::Uuid;
use validator::Validate;

use super::{deserialize_some, validate_request, ListResponse, ProfileQuery, StatusRequest};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    pub user_id: Uuid,

    pub business_id: Uuid,

    #[validate(length(max = 64, message = "Grade level must be at most 64 characters"))]
    pub grade_level: Option<String>,

    #[validate(length(max = 255, message = "Guardian name must be at most 255 characters"))]
    pub guardian_name: Option<String>,

    #[validate(length(max = 32, message = "Guardian phone must be at most 32 characters"))]
    pub guardian_phone: Option<String>,

    pub status: Option<i32>,
}

/// Partial update; `null` clears an optional field
#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub grade_level: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub guardian_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub guardian_phone: Option<Option<String>>,

    pub status: Option<i32>,
}

/// Links an existing user to a business as a student
///
/// # Errors
///
/// - `404 Not Found`: User or business does not exist
/// - `409 Conflict`: User already backs a student profile
pub async fn create_student(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateStudentRequest>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    require_role(&auth, Role::Business)?;
    validate_request(&req)?;

    let student = state
        .services
        .students
        .create(NewStudent {
            user_id: req.user_id,
            business_id: req.business_id,
            grade_level: req.grade_level,
            guardian_name: req.guardian_name,
            guardian_phone: req.guardian_phone,
            status: req.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn list_students(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<ListResponse<Student>>> {
    require_role(&auth, Role::Business)?;

    let page = query.page();
    let (students, total) = state
        .services
        .students
        .list(query.business_id, page)
        .await?;

    Ok(Json(ListResponse::new(students, total, page)))
}

pub async fn get_student(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Student>> {
    require_role(&auth, Role::Business)?;

    Ok(Json(state.services.students.get(id).await?))
}

pub async fn update_student(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStudentRequest>,
) -> ApiResult<Json<Student>> {
    require_role(&auth, Role::Business)?;

    let student = state
        .services
        .students
        .update(
            id,
            StudentChanges {
                grade_level: req.grade_level,
                guardian_name: req.guardian_name,
                guardian_phone: req.guardian_phone,
                status: req.status,
            },
        )
        .await?;

    Ok(Json(student))
}

pub async fn change_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Json<Student>> {
    require_role(&auth, Role::Business)?;

    Ok(Json(
        state.services.students.change_status(id, req.status).await?,
    ))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth, Role::Business)?;

    state.services.students.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
