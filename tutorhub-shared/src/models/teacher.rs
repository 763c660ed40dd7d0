/// Teacher profile model and database operations
///
/// A teacher links a pre-existing user to a business. No user fields are
/// duplicated here, so writes touch this table only.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teachers (
///     id BLOB PRIMARY KEY NOT NULL,
///     user_id BLOB NOT NULL UNIQUE REFERENCES users (id) ON DELETE CASCADE,
///     business_id BLOB NOT NULL REFERENCES businesses (id) ON DELETE CASCADE,
///     subject TEXT NOT NULL,
///     qualification TEXT,
///     experience_years INTEGER NOT NULL DEFAULT 0 CHECK (experience_years >= 0),
///     salary REAL NOT NULL DEFAULT 0 CHECK (salary >= 0),
///     status INTEGER NOT NULL DEFAULT 1 CHECK (status IN (0, 1)),
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite};
use uuid::Uuid;

use super::AccountStatus;

const TEACHER_COLUMNS: &str = "id, user_id, business_id, subject, qualification, \
     experience_years, salary, status, created_at, updated_at";

/// Teacher profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Teacher {
    pub id: Uuid,

    /// Backing user (unique within this table)
    pub user_id: Uuid,

    /// Employing business
    pub business_id: Uuid,

    pub subject: String,

    pub qualification: Option<String>,

    pub experience_years: i64,

    pub salary: f64,

    pub status: AccountStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a teacher profile
#[derive(Debug, Clone)]
pub struct CreateTeacher {
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub subject: String,
    pub qualification: Option<String>,
    pub experience_years: i64,
    pub salary: f64,
    pub status: AccountStatus,
}

/// Input for updating a teacher profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTeacher {
    pub subject: Option<String>,
    pub qualification: Option<Option<String>>,
    pub experience_years: Option<i64>,
    pub salary: Option<f64>,
    pub status: Option<AccountStatus>,
}

impl UpdateTeacher {
    pub fn is_empty(&self) -> bool {
        self == &UpdateTeacher::default()
    }
}

impl Teacher {
    /// Creates a teacher profile
    ///
    /// # Errors
    ///
    /// Returns a unique violation if the user already backs a teacher
    pub async fn create<'e, E>(executor: E, data: CreateTeacher) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO teachers (id, user_id, business_id, subject, qualification, \
             experience_years, salary, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) \
             RETURNING {}",
            TEACHER_COLUMNS
        );

        sqlx::query_as::<_, Teacher>(&query)
            .bind(Uuid::new_v4())
            .bind(data.user_id)
            .bind(data.business_id)
            .bind(data.subject)
            .bind(data.qualification)
            .bind(data.experience_years)
            .bind(data.salary)
            .bind(data.status)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    /// Finds a teacher by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {} FROM teachers WHERE id = $1", TEACHER_COLUMNS);

        sqlx::query_as::<_, Teacher>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Checks whether a user already backs a teacher profile
    pub async fn exists_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM teachers WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    /// Updates a teacher profile; only non-None fields are written
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateTeacher,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE teachers SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(subject) = data.subject {
            query.push(", subject = ").push_bind(subject);
        }
        if let Some(qualification) = data.qualification {
            query.push(", qualification = ").push_bind(qualification);
        }
        if let Some(years) = data.experience_years {
            query.push(", experience_years = ").push_bind(years);
        }
        if let Some(salary) = data.salary {
            query.push(", salary = ").push_bind(salary);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(TEACHER_COLUMNS);

        query.build_query_as::<Teacher>().fetch_optional(executor).await
    }

    /// Deletes a teacher profile; the backing user is left in place
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists teachers, optionally restricted to one business
    pub async fn list<'e, E>(
        executor: E,
        business_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {} FROM teachers WHERE ($1 IS NULL OR business_id = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            TEACHER_COLUMNS
        );

        sqlx::query_as::<_, Teacher>(&query)
            .bind(business_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Counts teachers, optionally restricted to one business
    pub async fn count<'e, E>(executor: E, business_id: Option<Uuid>) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE ($1 IS NULL OR business_id = $1)")
            .bind(business_id)
            .fetch_one(executor)
            .await
    }
}
