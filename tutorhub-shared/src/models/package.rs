/// Package model and database operations
///
/// Packages are subscription plans referenced (never owned) by businesses.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE packages (
///     id BLOB PRIMARY KEY NOT NULL,
///     name TEXT NOT NULL UNIQUE,
///     price REAL NOT NULL CHECK (price >= 0),
///     validation_period_days INTEGER NOT NULL CHECK (validation_period_days > 0),
///     description TEXT,
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

const PACKAGE_COLUMNS: &str =
    "id, name, price, validation_period_days, description, status, created_at, updated_at";

/// Subscription package
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Package {
    pub id: Uuid,

    /// Unique display name
    pub name: String,

    /// Price, never negative
    pub price: f64,

    /// How long a subscription stays valid, in days (> 0)
    pub validation_period_days: i64,

    pub description: Option<String>,

    pub status: AccountStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new package
#[derive(Debug, Clone)]
pub struct CreatePackage {
    pub name: String,
    pub price: f64,
    pub validation_period_days: i64,
    pub description: Option<String>,
    pub status: AccountStatus,
}

/// Input for updating an existing package
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePackage {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub validation_period_days: Option<i64>,
    pub description: Option<Option<String>>,
    pub status: Option<AccountStatus>,
}

impl UpdatePackage {
    pub fn is_empty(&self) -> bool {
        self == &UpdatePackage::default()
    }
}

impl Package {
    /// Creates a new package
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or a CHECK constraint fails
    pub async fn create<'e, E>(executor: E, data: CreatePackage) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO packages (id, name, price, validation_period_days, description, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) \
             RETURNING {}",
            PACKAGE_COLUMNS
        );

        sqlx::query_as::<_, Package>(&query)
            .bind(Uuid::new_v4())
            .bind(data.name)
            .bind(data.price)
            .bind(data.validation_period_days)
            .bind(data.description)
            .bind(data.status)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    /// Finds a package by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {} FROM packages WHERE id = $1", PACKAGE_COLUMNS);

        sqlx::query_as::<_, Package>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Checks whether a package with this ID exists
    pub async fn exists<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM packages WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Checks whether any package other than `exclude` is named `name`
    pub async fn name_taken<'e, E>(
        executor: E,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM packages WHERE name = $1 AND ($2 IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(executor)
        .await
    }

    /// Updates an existing package; only non-None fields are written
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdatePackage,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE packages SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(price) = data.price {
            query.push(", price = ").push_bind(price);
        }
        if let Some(days) = data.validation_period_days {
            query.push(", validation_period_days = ").push_bind(days);
        }
        if let Some(description) = data.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(PACKAGE_COLUMNS);

        query.build_query_as::<Package>().fetch_optional(executor).await
    }

    /// Deletes a package by ID
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM packages WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists packages by name
    pub async fn list<'e, E>(executor: E, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {} FROM packages ORDER BY name ASC LIMIT $1 OFFSET $2",
            PACKAGE_COLUMNS
        );

        sqlx::query_as::<_, Package>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Counts total number of packages
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM packages")
            .fetch_one(executor)
            .await
    }
}
