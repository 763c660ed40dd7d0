/// Domain error type shared by every service
///
/// Each failure carries one of a small set of kinds so the transport layer can
/// map it without inspecting messages:
///
/// - **NotFound**: a referenced Business/User/Package/Teacher/Student id is missing
/// - **Conflict**: duplicate email/slug/name, or a user already backs a profile
/// - **Validation**: invalid role, invalid status, negative amounts, short password,
///   empty update
/// - **Forbidden**: the acting role lacks authority for the operation
/// - **Internal**: transaction or store failure
///
/// Store constraint violations are translated here so that a race lost at the
/// unique index surfaces as the same `Conflict` the pre-check would have raised.
/// Writes that reference another row use [`DomainError::from_reference`] so a
/// row deleted after its existence check surfaces as `NotFound`.
///
/// # Example
///
/// ```
/// use tutorhub_shared::error::{DomainError, ErrorKind};
///
/// let err = DomainError::not_found("business", "42");
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.to_string(), "business not found: 42");
/// ```

use std::fmt::Display;

use sqlx::error::ErrorKind as SqlxErrorKind;

use crate::auth::authorization::AuthzError;
use crate::auth::password::PasswordError;

/// Result alias used by the service layer
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification of a [`DomainError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Forbidden,
    Internal,
}

/// Error returned by every domain operation
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Uniqueness or exclusivity violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Input rejected before touching the store
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Acting role lacks authority
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Store or transaction failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    /// Maps a foreign-key failure of a write referencing `entity` to the
    /// NotFound its existence check raises; other errors convert as usual
    pub fn from_reference(err: sqlx::Error, entity: &'static str, id: impl Display) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if matches!(db_err.kind(), SqlxErrorKind::ForeignKeyViolation) =>
            {
                DomainError::not_found(entity, id)
            }
            _ => err.into(),
        }
    }

    /// Returns the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Translates a SQLite unique-violation message into a user-facing conflict
///
/// SQLite reports these as `UNIQUE constraint failed: <table>.<column>`.
fn describe_unique_violation(message: &str) -> String {
    let target = message
        .strip_prefix("UNIQUE constraint failed: ")
        .unwrap_or(message)
        .trim();

    match target {
        "users.email" | "businesses.email" => "email is already in use".to_string(),
        "businesses.slug" => "slug is already taken".to_string(),
        "businesses.name" => "business name is already taken".to_string(),
        "businesses.user_id" => "user already backs a business profile".to_string(),
        "packages.name" => "package name is already taken".to_string(),
        "teachers.user_id" => "user already backs a teacher profile".to_string(),
        "students.user_id" => "user already backs a student profile".to_string(),
        other => match other.split_once('.') {
            Some((table, column)) => format!("duplicate {} for {}", column, table),
            None => format!("duplicate value: {}", other),
        },
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                SqlxErrorKind::UniqueViolation => {
                    DomainError::Conflict(describe_unique_violation(db_err.message()))
                }
                SqlxErrorKind::ForeignKeyViolation => DomainError::Conflict(
                    "referenced record is missing or still in use".to_string(),
                ),
                SqlxErrorKind::CheckViolation => {
                    DomainError::validation("record", db_err.message().to_string())
                }
                _ => DomainError::Internal(format!("Database error: {}", db_err)),
            },
            other => DomainError::Internal(format!("Database error: {}", other)),
        }
    }
}

impl From<PasswordError> for DomainError {
    fn from(err: PasswordError) -> Self {
        DomainError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<AuthzError> for DomainError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::UnknownRole(_) => DomainError::validation("role", err.to_string()),
            AuthzError::InsufficientRole { .. } => DomainError::Forbidden(err.to_string()),
            AuthzError::Demotion { .. } => DomainError::validation("role", err.to_string()),
            AuthzError::Unchanged(_) => DomainError::validation("role", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    #[test]
    fn test_error_kinds() {
        assert_eq!(DomainError::not_found("user", 1).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::conflict("dup").kind(), ErrorKind::Conflict);
        assert_eq!(
            DomainError::validation("status", "bad").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            DomainError::Forbidden("no".to_string()).kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            DomainError::Internal("boom".to_string()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::validation("password", "too short");
        assert_eq!(err.to_string(), "Invalid password: too short");

        let err = DomainError::not_found("package", "abc");
        assert_eq!(err.to_string(), "package not found: abc");
    }

    #[test]
    fn test_from_reference_passes_other_errors_through() {
        let err = DomainError::from_reference(sqlx::Error::RowNotFound, "package", "abc");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_describe_unique_violation() {
        assert_eq!(
            describe_unique_violation("UNIQUE constraint failed: businesses.email"),
            "email is already in use"
        );
        assert_eq!(
            describe_unique_violation("UNIQUE constraint failed: users.email"),
            "email is already in use"
        );
        assert_eq!(
            describe_unique_violation("UNIQUE constraint failed: businesses.slug"),
            "slug is already taken"
        );
        assert_eq!(
            describe_unique_violation("UNIQUE constraint failed: teachers.user_id"),
            "user already backs a teacher profile"
        );
        assert_eq!(
            describe_unique_violation("UNIQUE constraint failed: widgets.code"),
            "duplicate code for widgets"
        );
    }

    #[test]
    fn test_row_not_found_is_internal() {
        let err: DomainError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_authz_error_mapping() {
        let err: DomainError = AuthzError::InsufficientRole {
            required: Role::Admin,
            actual: Role::Student,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err: DomainError = AuthzError::UnknownRole("owner".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: DomainError = AuthzError::Demotion {
            current: Role::Teacher,
            requested: Role::Student,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
