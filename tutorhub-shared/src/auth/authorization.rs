/// Role hierarchy checks
///
/// TutorHub has a fixed total order of roles:
///
/// ```text
/// admin (4) > business (3) > teacher (2) > student (1)
/// ```
///
/// An actor can act on a role when its level is at least that role's level.
/// The same rule gates API routes ([`require_role`]) and role promotion
/// ([`check_promotion`]).
///
/// # Example
///
/// ```
/// use tutorhub_shared::auth::authorization::{can_access_role, check_promotion};
/// use tutorhub_shared::models::user::Role;
///
/// assert!(can_access_role(Role::Admin, Role::Business));
/// assert!(!can_access_role(Role::Teacher, Role::Business));
///
/// // An admin may lift a teacher to business
/// assert!(check_promotion(Role::Teacher, Role::Business, Role::Admin).is_ok());
///
/// // but not push them down to student
/// assert!(check_promotion(Role::Teacher, Role::Student, Role::Admin).is_err());
/// ```

use super::middleware::AuthContext;
use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Role name outside the fixed set
    #[error("Unknown role '{0}': expected one of admin, business, teacher, student")]
    UnknownRole(String),

    /// Actor is less senior than required
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole { required: Role, actual: Role },

    /// Requested role is below the current one
    #[error("Cannot change role from {current} to {requested}: promotion cannot lower a role")]
    Demotion { current: Role, requested: Role },

    /// Requested role equals the current one
    #[error("User already has role {0}")]
    Unchanged(Role),
}

/// Parses a role name, rejecting anything outside the four known roles
pub fn parse_role(name: &str) -> Result<Role, AuthzError> {
    Role::parse(name).ok_or_else(|| AuthzError::UnknownRole(name.to_string()))
}

/// True when `actor` is at least as senior as `target`
pub fn can_access_role(actor: Role, target: Role) -> bool {
    actor.can_access(&target)
}

/// Checks that the authenticated caller holds `required` or a more senior role
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` otherwise
pub fn require_role(auth: &AuthContext, required: Role) -> Result<(), AuthzError> {
    if !can_access_role(auth.role, required) {
        return Err(AuthzError::InsufficientRole {
            required,
            actual: auth.role,
        });
    }

    Ok(())
}

/// Decides whether a user holding `current` may be moved to `requested` by
/// an actor holding `promoted_by`
///
/// Checks, in order:
/// 1. the actor is at least as senior as `requested`
/// 2. `requested` is at least as senior as `current`
/// 3. `requested` differs from `current`
///
/// # Errors
///
/// - `InsufficientRole` when the actor lacks authority
/// - `Demotion` when the change would lower the role
/// - `Unchanged` when nothing would change
pub fn check_promotion(current: Role, requested: Role, promoted_by: Role) -> Result<(), AuthzError> {
    if !can_access_role(promoted_by, requested) {
        return Err(AuthzError::InsufficientRole {
            required: requested,
            actual: promoted_by,
        });
    }

    if !can_access_role(requested, current) {
        return Err(AuthzError::Demotion { current, requested });
    }

    if requested == current {
        return Err(AuthzError::Unchanged(current));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("business"), Ok(Role::Business));
        assert_eq!(
            parse_role("superuser"),
            Err(AuthzError::UnknownRole("superuser".to_string()))
        );
    }

    #[test]
    fn test_can_access_role_matrix() {
        for actor in Role::ALL {
            for target in Role::ALL {
                assert_eq!(
                    can_access_role(actor, target),
                    actor.level() >= target.level(),
                    "{} -> {}",
                    actor,
                    target
                );
            }
        }
    }

    #[test]
    fn test_require_role() {
        let business = AuthContext::new(Uuid::new_v4(), Role::Business);

        assert!(require_role(&business, Role::Business).is_ok());
        assert!(require_role(&business, Role::Teacher).is_ok());
        assert_eq!(
            require_role(&business, Role::Admin),
            Err(AuthzError::InsufficientRole {
                required: Role::Admin,
                actual: Role::Business,
            })
        );
    }

    #[test]
    fn test_student_cannot_grant_teacher() {
        assert!(matches!(
            check_promotion(Role::Student, Role::Teacher, Role::Student),
            Err(AuthzError::InsufficientRole { .. })
        ));
    }

    #[test]
    fn test_admin_cannot_demote_teacher() {
        assert_eq!(
            check_promotion(Role::Teacher, Role::Student, Role::Admin),
            Err(AuthzError::Demotion {
                current: Role::Teacher,
                requested: Role::Student,
            })
        );
    }

    #[test]
    fn test_admin_promotes_teacher_to_business() {
        assert!(check_promotion(Role::Teacher, Role::Business, Role::Admin).is_ok());
    }

    #[test]
    fn test_business_can_promote_up_to_own_level() {
        assert!(check_promotion(Role::Student, Role::Teacher, Role::Business).is_ok());
        assert!(check_promotion(Role::Student, Role::Business, Role::Business).is_ok());
        assert!(check_promotion(Role::Student, Role::Admin, Role::Business).is_err());
    }

    #[test]
    fn test_unchanged_role_rejected() {
        assert_eq!(
            check_promotion(Role::Teacher, Role::Teacher, Role::Admin),
            Err(AuthzError::Unchanged(Role::Teacher))
        );
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::InsufficientRole {
            required: Role::Admin,
            actual: Role::Teacher,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient permissions: requires admin, has teacher"
        );

        assert!(AuthzError::UnknownRole("owner".to_string())
            .to_string()
            .contains("owner"));
    }
}
