/// Teacher profiles
///
/// A teacher links an existing user to a business. A user backs at most one
/// teacher row; that rule is per table, so the same user may also back a
/// student row.

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{require_non_negative, require_text, status_or_active, Page};
use crate::error::{DomainError, DomainResult};
use crate::models::business::Business;
use crate::models::teacher::{CreateTeacher, Teacher, UpdateTeacher};
use crate::models::user::User;
use crate::models::AccountStatus;

/// Input for creating a teacher profile
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub subject: String,
    pub qualification: Option<String>,
    pub experience_years: i64,
    pub salary: f64,
    pub status: Option<i32>,
}

/// Requested teacher changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherChanges {
    pub subject: Option<String>,
    pub qualification: Option<Option<String>>,
    pub experience_years: Option<i64>,
    pub salary: Option<f64>,
    pub status: Option<i32>,
}

fn require_experience(years: i64) -> DomainResult<()> {
    if years < 0 {
        return Err(DomainError::validation(
            "experience_years",
            "must not be negative",
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct TeacherService {
    pool: SqlitePool,
}

impl TeacherService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Links a user to a business as a teacher
    ///
    /// # Errors
    ///
    /// - Validation for a blank subject, negative salary or experience, bad status
    /// - NotFound if the user or business does not exist
    /// - Conflict if the user already backs a teacher profile
    pub async fn create(&self, input: NewTeacher) -> DomainResult<Teacher> {
        require_text("subject", &input.subject)?;
        require_non_negative("salary", input.salary)?;
        require_experience(input.experience_years)?;
        let status = status_or_active(input.status)?;

        if User::find_by_id(&self.pool, input.user_id).await?.is_none() {
            return Err(DomainError::not_found("user", input.user_id));
        }
        if !Business::exists(&self.pool, input.business_id).await? {
            return Err(DomainError::not_found("business", input.business_id));
        }
        if Teacher::exists_for_user(&self.pool, input.user_id).await? {
            debug!(user_id = %input.user_id, "User already backs a teacher");
            return Err(DomainError::conflict("user already backs a teacher profile"));
        }

        let teacher = Teacher::create(
            &self.pool,
            CreateTeacher {
                user_id: input.user_id,
                business_id: input.business_id,
                subject: input.subject,
                qualification: input.qualification,
                experience_years: input.experience_years,
                salary: input.salary,
                status,
            },
        )
        .await?;

        info!(
            teacher_id = %teacher.id,
            user_id = %teacher.user_id,
            business_id = %teacher.business_id,
            "Teacher created"
        );
        Ok(teacher)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Teacher> {
        Teacher::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("teacher", id))
    }

    /// Lists teachers, optionally for one business, with the total count
    pub async fn list(
        &self,
        business_id: Option<Uuid>,
        page: Page,
    ) -> DomainResult<(Vec<Teacher>, i64)> {
        let teachers = Teacher::list(&self.pool, business_id, page.limit, page.offset).await?;
        let total = Teacher::count(&self.pool, business_id).await?;
        Ok((teachers, total))
    }

    pub async fn update(&self, id: Uuid, changes: TeacherChanges) -> DomainResult<Teacher> {
        if changes == TeacherChanges::default() {
            return Err(DomainError::validation("update", "no changes supplied"));
        }

        if let Some(subject) = changes.subject.as_deref() {
            require_text("subject", subject)?;
        }
        if let Some(salary) = changes.salary {
            require_non_negative("salary", salary)?;
        }
        if let Some(years) = changes.experience_years {
            require_experience(years)?;
        }
        let status = changes.status.map(AccountStatus::try_from).transpose()?;

        let teacher = Teacher::update(
            &self.pool,
            id,
            UpdateTeacher {
                subject: changes.subject,
                qualification: changes.qualification,
                experience_years: changes.experience_years,
                salary: changes.salary,
                status,
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("teacher", id))?;

        info!(teacher_id = %id, "Teacher updated");
        Ok(teacher)
    }

    pub async fn change_status(&self, id: Uuid, status: i32) -> DomainResult<Teacher> {
        self.update(
            id,
            TeacherChanges {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Deletes the profile; the user account stays
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !Teacher::delete(&self.pool, id).await? {
            return Err(DomainError::not_found("teacher", id));
        }

        info!(teacher_id = %id, "Teacher deleted");
        Ok(())
    }
}
