/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and length validation
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: bearer-token middleware producing an `AuthContext`
/// - [`authorization`]: role hierarchy checks and promotion rules
///
/// # Example
///
/// ```no_run
/// use tutorhub_shared::auth::password::{hash_password_with, verify_password, HashingConfig};
/// use tutorhub_shared::auth::jwt::{create_token, Claims};
/// use tutorhub_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password_with("user_password", &HashingConfig::default())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4(), Role::Admin), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
