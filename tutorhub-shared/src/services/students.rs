/// Student profiles

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{status_or_active, Page};
use crate::error::{DomainError, DomainResult};
use crate::models::business::Business;
use crate::models::student::{CreateStudent, Student, UpdateStudent};
use crate::models::user::User;
use crate::models::AccountStatus;

/// Input for creating a student profile
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub grade_level: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: Option<i32>,
}

/// Requested student changes; `Some(None)` clears a field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentChanges {
    pub grade_level: Option<Option<String>>,
    pub guardian_name: Option<Option<String>>,
    pub guardian_phone: Option<Option<String>>,
    pub status: Option<i32>,
}

#[derive(Clone)]
pub struct StudentService {
    pool: SqlitePool,
}

impl StudentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Links a user to a business as a student
    ///
    /// # Errors
    ///
    /// - Validation for a bad status
    /// - NotFound if the user or business does not exist
    /// - Conflict if the user already backs a student profile
    pub async fn create(&self, input: NewStudent) -> DomainResult<Student> {
        let status = status_or_active(input.status)?;

        if User::find_by_id(&self.pool, input.user_id).await?.is_none() {
            return Err(DomainError::not_found("user", input.user_id));
        }
        if !Business::exists(&self.pool, input.business_id).await? {
            return Err(DomainError::not_found("business", input.business_id));
        }
        if Student::exists_for_user(&self.pool, input.user_id).await? {
            debug!(user_id = %input.user_id, "User already backs a student");
            return Err(DomainError::conflict("user already backs a student profile"));
        }

        let student = Student::create(
            &self.pool,
            CreateStudent {
                user_id: input.user_id,
                business_id: input.business_id,
                grade_level: input.grade_level,
                guardian_name: input.guardian_name,
                guardian_phone: input.guardian_phone,
                status,
            },
        )
        .await?;

        info!(
            student_id = %student.id,
            user_id = %student.user_id,
            business_id = %student.business_id,
            "Student created"
        );
        Ok(student)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Student> {
        Student::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("student", id))
    }

    pub async fn list(
        &self,
        business_id: Option<Uuid>,
        page: Page,
    ) -> DomainResult<(Vec<Student>, i64)> {
        let students = Student::list(&self.pool, business_id, page.limit, page.offset).await?;
        let total = Student::count(&self.pool, business_id).await?;
        Ok((students, total))
    }

    pub async fn update(&self, id: Uuid, changes: StudentChanges) -> DomainResult<Student> {
        if changes == StudentChanges::default() {
            return Err(DomainError::validation("update", "no changes supplied"));
        }

        let status = changes.status.map(AccountStatus::try_from).transpose()?;

        let student = Student::update(
            &self.pool,
            id,
            UpdateStudent {
                grade_level: changes.grade_level,
                guardian_name: changes.guardian_name,
                guardian_phone: changes.guardian_phone,
                status,
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("student", id))?;

        info!(student_id = %id, "Student updated");
        Ok(student)
    }

    pub async fn change_status(&self, id: Uuid, status: i32) -> DomainResult<Student> {
        self.update(
            id,
            StudentChanges {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !Student::delete(&self.pool, id).await? {
            return Err(DomainError::not_found("student", id));
        }

        info!(student_id = %id, "Student deleted");
        Ok(())
    }
}
