/// Password hashing module using Argon2id
///
/// A business's password hash is computed once and written to both the
/// business row and its backing user, so every hash in the system comes from
/// [`hash_password_with`].
///
/// # Parameters
///
/// - **Algorithm**: Argon2id
/// - **Memory**: 64 MB (65536 KB) by default
/// - **Iterations**: 3 passes by default
/// - **Parallelism**: 4 lanes by default
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use tutorhub_shared::auth::password::{hash_password_with, verify_password, HashingConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HashingConfig::minimal();
/// let hash = hash_password_with("super_secret_password_123", &config)?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

use crate::error::DomainError;

/// Shortest accepted plaintext password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl HashingConfig {
    /// Cheapest parameters Argon2 accepts; for tests and local development
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Hashes a password using Argon2id with explicit parameters
///
/// # Returns
///
/// PHC string format hash (includes algorithm, parameters, salt, and hash)
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are rejected or
/// hashing fails
pub fn hash_password_with(password: &str, config: &HashingConfig) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(config.memory_kib)
        .t_cost(config.iterations)
        .p_cost(config.parallelism)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a hash
///
/// Parameters are read from the PHC string, so hashes produced with any
/// [`HashingConfig`] verify.
///
/// # Returns
///
/// `Ok(true)` if password matches, `Ok(false)` if it doesn't match
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` for a malformed hash or one without
/// an output digest, and `PasswordError::VerifyError` for any other
/// verification failure
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;
    if parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash("missing hash output".to_string()));
    }

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Rejects passwords shorter than [`MIN_PASSWORD_LENGTH`] characters
///
/// # Example
///
/// ```
/// use tutorhub_shared::auth::password::validate_password_length;
///
/// assert!(validate_password_length("long enough").is_ok());
/// assert!(validate_password_length("short").is_err());
/// ```
pub fn validate_password_length(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::validation(
            "password",
            format!("must be at least {} characters long", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_hash_password_default_parameters() {
        let hash = hash_password_with("test_password_123", &HashingConfig::default())
            .expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_minimal_parameters() {
        let hash = hash_password_with("test_password_123", &HashingConfig::minimal())
            .expect("Hash should succeed");

        assert!(hash.contains("m=8"));
        assert!(hash.contains("t=1"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let config = HashingConfig::minimal();
        let hash1 = hash_password_with("same_password", &config).unwrap();
        let hash2 = hash_password_with("same_password", &config).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let config = HashingConfig {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        };
        let result = hash_password_with("password", &config);
        assert!(matches!(result, Err(PasswordError::HashError(_))));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password_with("correct_password", &HashingConfig::minimal()).unwrap();

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(matches!(
            verify_password("password", "$argon2id$invalid"),
            Err(PasswordError::InvalidHash(_))
        ));

        // Parameters and salt without a digest
        let hash = hash_password_with("password", &HashingConfig::minimal()).unwrap();
        let truncated = &hash[..hash.rfind('$').unwrap()];
        assert!(matches!(
            verify_password("password", truncated),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_hash_verify_unicode() {
        let config = HashingConfig::minimal();
        for password in ["with spaces", "unicode-密码-パスワード", "with-special-chars!@#$%"] {
            let hash = hash_password_with(password, &config).unwrap();
            assert!(verify_password(password, &hash).unwrap());
        }
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password_length("12345678").is_ok());
        assert!(validate_password_length("密码密码密码密码").is_ok());

        let err = validate_password_length("1234567").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("at least 8"));
    }
}
