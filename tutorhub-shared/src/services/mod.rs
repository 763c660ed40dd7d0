/// Service layer: the domain operations exposed to the API
///
/// Services own the cross-table rules: validation before any write,
/// uniqueness pre-checks, mirroring between a business and its user, slug
/// allocation and role checks. Multi-table writes run inside one transaction
/// through [`crate::db::transaction::commit_or_rollback`].
///
/// # Example
///
/// ```no_run
/// use tutorhub_shared::auth::password::HashingConfig;
/// use tutorhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use tutorhub_shared::services::businesses::NewBusiness;
/// use tutorhub_shared::services::Services;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let services = Services::new(pool, HashingConfig::default());
///
/// let business = services
///     .businesses
///     .create(NewBusiness {
///         owner_name: "Grace Hopper".to_string(),
///         name: "ABC Tutors".to_string(),
///         slug: None,
///         email: "abc@example.com".to_string(),
///         phone: "555-0100".to_string(),
///         location: "Springfield".to_string(),
///         password: "correct horse battery".to_string(),
///         package_id: None,
///     })
///     .await?;
///
/// assert_eq!(business.slug, "abc-tutors");
/// # Ok(())
/// # }
/// ```

use sqlx::SqlitePool;

use crate::auth::password::HashingConfig;
use crate::error::{DomainError, DomainResult};
use crate::models::AccountStatus;

pub mod businesses;
pub mod mirror;
pub mod packages;
pub mod students;
pub mod teachers;
pub mod users;

pub use businesses::BusinessService;
pub use packages::PackageService;
pub use students::StudentService;
pub use teachers::TeacherService;
pub use users::UserService;

/// Aggregates all services
///
/// Cloning is cheap since the pool is reference counted.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub packages: PackageService,
    pub businesses: BusinessService,
    pub teachers: TeacherService,
    pub students: StudentService,
}

impl Services {
    pub fn new(pool: SqlitePool, hashing: HashingConfig) -> Self {
        Self {
            users: UserService::new(pool.clone(), hashing),
            packages: PackageService::new(pool.clone()),
            businesses: BusinessService::new(pool.clone(), hashing),
            teachers: TeacherService::new(pool.clone()),
            students: StudentService::new(pool),
        }
    }
}

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    /// Builds a page, clamping the limit to `1..=MAX_LIMIT` and the offset to `>= 0`
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Parses an optional raw status code, defaulting to active
pub(crate) fn status_or_active(code: Option<i32>) -> DomainResult<AccountStatus> {
    code.map(AccountStatus::try_from)
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Rejects blank required text
pub(crate) fn require_text(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Rejects negative or non-finite amounts
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(field, "must be a non-negative number"));
    }
    Ok(())
}

/// Sorts and de-duplicates a batch of ids, rejecting an empty batch
pub(crate) fn normalize_batch(ids: &[uuid::Uuid]) -> DomainResult<Vec<uuid::Uuid>> {
    if ids.is_empty() {
        return Err(DomainError::validation("ids", "at least one id is required"));
    }
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use uuid::Uuid;

    #[test]
    fn test_page_clamps() {
        assert_eq!(Page::default(), Page { limit: 20, offset: 0 });
        assert_eq!(Page::new(Some(0), Some(-5)), Page { limit: 1, offset: 0 });
        assert_eq!(Page::new(Some(1000), Some(40)), Page { limit: 100, offset: 40 });
    }

    #[test]
    fn test_status_or_active() {
        assert_eq!(status_or_active(None).unwrap(), AccountStatus::Active);
        assert_eq!(status_or_active(Some(0)).unwrap(), AccountStatus::Inactive);
        assert_eq!(
            status_or_active(Some(3)).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("price", 0.0).is_ok());
        assert!(require_non_negative("price", 12.5).is_ok());
        assert!(require_non_negative("price", -0.01).is_err());
        assert!(require_non_negative("price", f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_batch() {
        assert!(normalize_batch(&[]).is_err());

        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let batch = normalize_batch(&[id, other, id]).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.contains(&id));
        assert!(batch.contains(&other));
    }
}
