/// Business model and database operations
///
/// A business is always backed by exactly one `users` row (role `business`).
/// Email, phone, password hash and status are mirrored from that user; the
/// service layer keeps the pair consistent, this module only does storage.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE businesses (
///     id BLOB PRIMARY KEY NOT NULL,
///     name TEXT NOT NULL UNIQUE,
///     slug TEXT NOT NULL UNIQUE,
///     user_id BLOB NOT NULL UNIQUE REFERENCES users (id) ON DELETE RESTRICT,
///     owner_name TEXT NOT NULL,
///     package_id BLOB REFERENCES packages (id) ON DELETE RESTRICT,
///     email TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     phone TEXT NOT NULL DEFAULT '',
///     location TEXT NOT NULL DEFAULT '',
///     password_hash TEXT NOT NULL,
///     status INTEGER NOT NULL DEFAULT 1 CHECK (status IN (0, 1)),
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite};
use uuid::Uuid;

use super::{push_id_list, AccountStatus};

const BUSINESS_COLUMNS: &str = "id, name, slug, user_id, owner_name, package_id, email, phone, \
     location, password_hash, status, created_at, updated_at";

/// Business profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Business {
    pub id: Uuid,

    /// Unique display name
    pub name: String,

    /// Unique URL-safe identifier derived from a seed
    pub slug: String,

    /// Backing user account (1:1)
    pub user_id: Uuid,

    pub owner_name: String,

    /// Subscribed package, if any
    pub package_id: Option<Uuid>,

    /// Mirrored from the user
    pub email: String,

    /// Mirrored from the user
    pub phone: String,

    pub location: String,

    /// Mirrored from the user
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Mirrored from the user
    pub status: AccountStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a business row
#[derive(Debug, Clone)]
pub struct CreateBusiness {
    pub name: String,
    pub slug: String,
    pub user_id: Uuid,
    pub owner_name: String,
    pub package_id: Option<Uuid>,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub password_hash: String,
    pub status: AccountStatus,
}

/// Column changes for a business row
///
/// `package_id: Some(None)` clears the package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBusiness {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub owner_name: Option<String>,
    pub location: Option<String>,
    pub package_id: Option<Option<Uuid>>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub status: Option<AccountStatus>,
}

impl UpdateBusiness {
    pub fn is_empty(&self) -> bool {
        self == &UpdateBusiness::default()
    }
}

impl Business {
    /// Inserts a business row
    ///
    /// # Errors
    ///
    /// Returns an error on unique violations (name, slug, email, user_id) or
    /// foreign key violations (user_id, package_id)
    pub async fn create<'e, E>(executor: E, data: CreateBusiness) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO businesses (id, name, slug, user_id, owner_name, package_id, email, phone, \
             location, password_hash, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) \
             RETURNING {}",
            BUSINESS_COLUMNS
        );

        sqlx::query_as::<_, Business>(&query)
            .bind(Uuid::new_v4())
            .bind(data.name)
            .bind(data.slug)
            .bind(data.user_id)
            .bind(data.owner_name)
            .bind(data.package_id)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.location)
            .bind(data.password_hash)
            .bind(data.status)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    /// Finds a business by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {} FROM businesses WHERE id = $1", BUSINESS_COLUMNS);

        sqlx::query_as::<_, Business>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds the business backed by a user
    pub async fn find_by_user_id<'e, E>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {} FROM businesses WHERE user_id = $1", BUSINESS_COLUMNS);

        sqlx::query_as::<_, Business>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Checks whether a business exists
    pub async fn exists<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM businesses WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
    }

    /// Checks whether any business other than `exclude` uses `email`
    pub async fn email_taken<'e, E>(
        executor: E,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM businesses WHERE email = $1 AND ($2 IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(executor)
        .await
    }

    /// Checks whether any business other than `exclude` is named `name`
    pub async fn name_taken<'e, E>(
        executor: E,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM businesses WHERE name = $1 AND ($2 IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(executor)
        .await
    }

    /// Checks whether a slug is already allocated
    pub async fn slug_exists<'e, E>(executor: E, slug: &str) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM businesses WHERE slug = $1)")
            .bind(slug)
            .fetch_one(executor)
            .await
    }

    /// Returns the subset of `ids` that exist
    pub async fn existing_ids<'e, E>(executor: E, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM businesses WHERE id IN ");
        push_id_list(&mut query, ids);

        query.build_query_scalar::<Uuid>().fetch_all(executor).await
    }

    /// Returns the backing user ids of the given businesses
    pub async fn user_ids_for<'e, E>(executor: E, ids: &[Uuid]) -> Result<Vec<Uuid>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT user_id FROM businesses WHERE id IN ");
        push_id_list(&mut query, ids);

        query.build_query_scalar::<Uuid>().fetch_all(executor).await
    }

    /// Updates a business row; only non-None fields are written
    ///
    /// # Returns
    ///
    /// The updated business if found, None otherwise
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateBusiness,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE businesses SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(slug) = data.slug {
            query.push(", slug = ").push_bind(slug);
        }
        if let Some(owner_name) = data.owner_name {
            query.push(", owner_name = ").push_bind(owner_name);
        }
        if let Some(location) = data.location {
            query.push(", location = ").push_bind(location);
        }
        if let Some(package_id) = data.package_id {
            query.push(", package_id = ").push_bind(package_id);
        }
        if let Some(email) = data.email {
            query.push(", email = ").push_bind(email);
        }
        if let Some(phone) = data.phone {
            query.push(", phone = ").push_bind(phone);
        }
        if let Some(password_hash) = data.password_hash {
            query.push(", password_hash = ").push_bind(password_hash);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(BUSINESS_COLUMNS);

        query.build_query_as::<Business>().fetch_optional(executor).await
    }

    /// Sets the status of many businesses in one statement
    pub async fn set_status_many<'e, E>(
        executor: E,
        ids: &[Uuid],
        status: AccountStatus,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE businesses SET status = ");
        query.push_bind(status);
        query.push(", updated_at = ").push_bind(Utc::now());
        query.push(" WHERE id IN ");
        push_id_list(&mut query, ids);

        let result = query.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Sets (or clears) the package of many businesses in one statement
    pub async fn set_package_many<'e, E>(
        executor: E,
        ids: &[Uuid],
        package_id: Option<Uuid>,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE businesses SET package_id = ");
        query.push_bind(package_id);
        query.push(", updated_at = ").push_bind(Utc::now());
        query.push(" WHERE id IN ");
        push_id_list(&mut query, ids);

        let result = query.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Deletes a business row
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists businesses, newest first
    pub async fn list<'e, E>(executor: E, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {} FROM businesses ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            BUSINESS_COLUMNS
        );

        sqlx::query_as::<_, Business>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Counts total number of businesses
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM businesses")
            .fetch_one(executor)
            .await
    }

    /// Counts businesses subscribed to a package
    pub async fn count_by_package<'e, E>(executor: E, package_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM businesses WHERE package_id = $1")
            .bind(package_id)
            .fetch_one(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_business_default_is_empty() {
        assert!(UpdateBusiness::default().is_empty());

        let clear_package = UpdateBusiness {
            package_id: Some(None),
            ..Default::default()
        };
        assert!(!clear_package.is_empty());
    }
}
