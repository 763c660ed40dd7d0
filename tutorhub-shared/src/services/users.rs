/// User accounts and role promotion
///
/// Promotion follows the role hierarchy in
/// [`crate::auth::authorization`]: the actor must be at least as senior as
/// the role granted, and the new role must be at least as senior as the
/// current one. Linked business, teacher or student profiles are not touched.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{require_text, status_or_active, Page};
use crate::auth::authorization::{can_access_role, check_promotion, parse_role, AuthzError};
use crate::auth::password::{hash_password_with, validate_password_length, HashingConfig};
use crate::error::{DomainError, DomainResult};
use crate::models::user::{CreateUser, Role, UpdateUser, User};

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Plaintext; hashed before it reaches the store
    pub password: String,
    /// One of admin, business, teacher, student
    pub role: String,
    /// 0 or 1; active when omitted
    pub status: Option<i32>,
}

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
    hashing: HashingConfig,
}

impl UserService {
    pub fn new(pool: SqlitePool, hashing: HashingConfig) -> Self {
        Self { pool, hashing }
    }

    /// Creates a user account
    ///
    /// # Errors
    ///
    /// - Validation for a blank name, unknown role, bad status or short password
    /// - Conflict if the email is already in use
    pub async fn create_user(&self, input: NewUser) -> DomainResult<User> {
        require_text("name", &input.name)?;
        require_text("email", &input.email)?;
        let role = parse_role(&input.role)?;
        let status = status_or_active(input.status)?;
        validate_password_length(&input.password)?;

        if User::email_taken(&self.pool, &input.email, None).await? {
            debug!(email = %input.email, "User email already in use");
            return Err(DomainError::conflict("email is already in use"));
        }

        let password_hash = hash_password_with(&input.password, &self.hashing)?;

        let user = User::create(
            &self.pool,
            CreateUser {
                name: input.name,
                email: input.email,
                phone: input.phone,
                password_hash,
                role,
                status,
            },
        )
        .await?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// Gets a user by ID
    pub async fn get_user(&self, id: Uuid) -> DomainResult<User> {
        User::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Lists users with the total count
    pub async fn list_users(&self, page: Page) -> DomainResult<(Vec<User>, i64)> {
        let users = User::list(&self.pool, page.limit, page.offset).await?;
        let total = User::count(&self.pool).await?;
        Ok((users, total))
    }

    /// Changes a user's role
    ///
    /// # Errors
    ///
    /// - Validation if `new_role` is unknown, lower than the current role or unchanged
    /// - Forbidden if `promoted_by` is less senior than `new_role`
    /// - NotFound if the user does not exist
    pub async fn promote_user(
        &self,
        user_id: Uuid,
        new_role: &str,
        promoted_by: Role,
    ) -> DomainResult<User> {
        let requested = parse_role(new_role)?;

        if !can_access_role(promoted_by, requested) {
            warn!(%user_id, %requested, %promoted_by, "Promotion rejected: insufficient authority");
            return Err(AuthzError::InsufficientRole {
                required: requested,
                actual: promoted_by,
            }
            .into());
        }

        let user = self.get_user(user_id).await?;

        if let Err(err) = check_promotion(user.role, requested, promoted_by) {
            warn!(%user_id, current = %user.role, %requested, error = %err, "Promotion rejected");
            return Err(err.into());
        }

        let updated = User::update(
            &self.pool,
            user_id,
            UpdateUser {
                role: Some(requested),
                ..Default::default()
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("user", user_id))?;

        info!(%user_id, from = %user.role, to = %updated.role, %promoted_by, "User promoted");
        Ok(updated)
    }
}
