/// Student profile model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE students (
///     id BLOB PRIMARY KEY NOT NULL,
///     user_id BLOB NOT NULL UNIQUE REFERENCES users (id) ON DELETE CASCADE,
///     business_id BLOB NOT NULL REFERENCES businesses (id) ON DELETE CASCADE,
///     grade_level TEXT,
///     guardian_name TEXT,
///     guardian_phone TEXT,
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

const STUDENT_COLUMNS: &str = "id, user_id, business_id, grade_level, guardian_name, \
     guardian_phone, status, created_at, updated_at";

/// Student profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub grade_level: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub user_id: Uuid,
    pub business_id: Uuid,
    pub grade_level: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub status: AccountStatus,
}

/// Column changes for a student; `Some(None)` clears a nullable column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStudent {
    pub grade_level: Option<Option<String>>,
    pub guardian_name: Option<Option<String>>,
    pub guardian_phone: Option<Option<String>>,
    pub status: Option<AccountStatus>,
}

impl UpdateStudent {
    pub fn is_empty(&self) -> bool {
        self == &UpdateStudent::default()
    }
}

impl Student {
    pub async fn create<'e, E>(executor: E, data: CreateStudent) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO students (id, user_id, business_id, grade_level, guardian_name, \
             guardian_phone, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {}",
            STUDENT_COLUMNS
        );

        sqlx::query_as::<_, Student>(&query)
            .bind(Uuid::new_v4())
            .bind(data.user_id)
            .bind(data.business_id)
            .bind(data.grade_level)
            .bind(data.guardian_name)
            .bind(data.guardian_phone)
            .bind(data.status)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS);

        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Checks whether a user already backs a student profile
    pub async fn exists_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateStudent,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE students SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(grade_level) = data.grade_level {
            query.push(", grade_level = ").push_bind(grade_level);
        }
        if let Some(guardian_name) = data.guardian_name {
            query.push(", guardian_name = ").push_bind(guardian_name);
        }
        if let Some(guardian_phone) = data.guardian_phone {
            query.push(", guardian_phone = ").push_bind(guardian_phone);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(STUDENT_COLUMNS);

        query.build_query_as::<Student>().fetch_optional(executor).await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

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
            "SELECT {} FROM students WHERE ($1 IS NULL OR business_id = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            STUDENT_COLUMNS
        );

        sqlx::query_as::<_, Student>(&query)
            .bind(business_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    pub async fn count<'e, E>(executor: E, business_id: Option<Uuid>) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE ($1 IS NULL OR business_id = $1)")
            .bind(business_id)
            .fetch_one(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_student_clearing_counts_as_change() {
        assert!(UpdateStudent::default().is_empty());

        let update = UpdateStudent {
            guardian_phone: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
