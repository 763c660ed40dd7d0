/// User model and database operations
///
/// Users are the identity store: credentials, role and status. Business,
/// Teacher and Student profiles each reference exactly one user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BLOB PRIMARY KEY NOT NULL,
///     name TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     phone TEXT NOT NULL DEFAULT '',
///     password_hash TEXT NOT NULL,
///     role TEXT NOT NULL CHECK (role IN ('admin', 'business', 'teacher', 'student')),
///     status INTEGER NOT NULL DEFAULT 1 CHECK (status IN (0, 1)),
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tutorhub_shared::models::user::{User, CreateUser, Role};
/// use tutorhub_shared::models::AccountStatus;
/// use tutorhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     phone: "555-0100".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Teacher,
///     status: AccountStatus::Active,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ada@example.com").await?;
/// # Ok(())
/// # }
/// ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite};
use uuid::Uuid;

use super::{push_id_list, AccountStatus};

const USER_COLUMNS: &str =
    "id, name, email, phone, password_hash, role, status, created_at, updated_at";

/// Platform roles
///
/// Ordered by seniority: Admin > Business > Teacher > Student. The `Ord`
/// implementation follows [`Role::level`], so `Role::Admin > Role::Teacher`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator
    Admin,

    /// Owner account of a Business
    Business,

    /// Teaching staff of a Business
    Teacher,

    /// Enrolled student
    Student,
}

impl Role {
    /// Every role, most senior first
    pub const ALL: [Role; 4] = [Role::Admin, Role::Business, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Business => "business",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Parses a role name; anything outside the four known roles is `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "business" => Some(Role::Business),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Numeric seniority used for comparisons
    pub fn level(&self) -> u8 {
        match self {
            Role::Admin => 4,
            Role::Business => 3,
            Role::Teacher => 2,
            Role::Student => 1,
        }
    }

    /// Checks if this role is at least as senior as `target`
    pub fn can_access(&self, target: &Role) -> bool {
        self.level() >= target.level()
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level().cmp(&other.level())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Contact phone
    pub phone: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Role in the hierarchy
    pub role: Role,

    /// Active/inactive flag
    pub status: AccountStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl UpdateUser {
    /// True when no column would change
    pub fn is_empty(&self) -> bool {
        self == &UpdateUser::default()
    }
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database connection fails
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (id, name, email, phone, password_hash, role, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.password_hash)
            .bind(data.role)
            .bind(data.status)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a user by email address
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// Checks whether any user other than `exclude` owns `email`
    pub async fn email_taken<'e, E>(
        executor: E,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND ($2 IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(executor)
        .await?;

        Ok(taken)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` are written; `updated_at` is always
    /// refreshed.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if the user doesn't exist
    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(name) = data.name {
            query.push(", name = ").push_bind(name);
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
        if let Some(role) = data.role {
            query.push(", role = ").push_bind(role);
        }
        if let Some(status) = data.status {
            query.push(", status = ").push_bind(status);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(USER_COLUMNS);

        query.build_query_as::<User>().fetch_optional(executor).await
    }

    /// Sets the status of many users in one statement
    ///
    /// # Returns
    ///
    /// Number of rows updated
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

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET status = ");
        query.push_bind(status);
        query.push(", updated_at = ").push_bind(Utc::now());
        query.push(" WHERE id IN ");
        push_id_list(&mut query, ids);

        let result = query.build().execute(executor).await?;
        Ok(result.rows_affected())
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// True if the user was deleted, false if it didn't exist
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists users, newest first
    pub async fn list<'e, E>(executor: E, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Counts total number of users
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await
    }
}
