/// Business slug allocation
///
/// A slug is derived from a human-supplied seed: lower-cased, every run of
/// non-alphanumeric characters collapsed to one hyphen, leading and trailing
/// hyphens trimmed. When the base is taken, `-1`, `-2`, ... are appended to
/// the base and each candidate is re-checked against the store. The unique
/// index on `businesses.slug` remains the final guard against races.
///
/// # Example
///
/// ```
/// use tutorhub_shared::slug::normalize;
///
/// assert_eq!(normalize("ABC Tutors!!").unwrap(), "abc-tutors");
/// assert!(normalize("!!!").is_err());
/// ```

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DomainError, DomainResult};
use crate::models::business::Business;

/// Candidates tried before allocation gives up
pub const MAX_SLUG_ATTEMPTS: u32 = 10_000;

/// Normalizes a seed into a slug base
///
/// # Errors
///
/// Returns a validation error if nothing alphanumeric remains
pub fn normalize(seed: &str) -> DomainResult<String> {
    let mut slug = String::with_capacity(seed.len());
    let mut pending_hyphen = false;

    for c in seed.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        return Err(DomainError::validation(
            "slug",
            "must contain at least one letter or digit",
        ));
    }

    Ok(slug)
}

/// Allocates a unique slug for `seed`
///
/// `keep` names a slug the caller already owns (the business being
/// updated); it counts as free.
///
/// # Errors
///
/// - Validation if the seed normalizes to nothing
/// - Conflict after [`MAX_SLUG_ATTEMPTS`] taken candidates
/// - Internal on store failure
pub async fn allocate(
    conn: &mut SqliteConnection,
    seed: &str,
    keep: Option<&str>,
) -> DomainResult<String> {
    let base = normalize(seed)?;

    if is_free(conn, &base, keep).await? {
        debug!(slug = %base, "Allocated slug");
        return Ok(base);
    }

    for suffix in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = format!("{}-{}", base, suffix);
        debug!(candidate = %candidate, "Slug taken, trying next candidate");

        if is_free(conn, &candidate, keep).await? {
            debug!(slug = %candidate, "Allocated slug");
            return Ok(candidate);
        }
    }

    Err(DomainError::conflict(format!(
        "no free slug for '{}' after {} attempts",
        base, MAX_SLUG_ATTEMPTS
    )))
}

async fn is_free(
    conn: &mut SqliteConnection,
    candidate: &str,
    keep: Option<&str>,
) -> DomainResult<bool> {
    if keep == Some(candidate) {
        return Ok(true);
    }
    Ok(!Business::slug_exists(&mut *conn, candidate).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("ABC Tutors!!").unwrap(), "abc-tutors");
        assert_eq!(normalize("Math & Science Academy").unwrap(), "math-science-academy");
        assert_eq!(normalize("already-a-slug").unwrap(), "already-a-slug");
    }

    #[test]
    fn test_normalize_collapses_and_trims() {
        assert_eq!(normalize("  --Hello___World--  ").unwrap(), "hello-world");
        assert_eq!(normalize("a   b").unwrap(), "a-b");
        assert_eq!(normalize("Room 101").unwrap(), "room-101");
    }

    #[test]
    fn test_normalize_drops_non_ascii() {
        assert_eq!(normalize("Café Élan").unwrap(), "caf-lan");
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize("").is_err());
        assert!(normalize("   ").is_err());
        assert!(normalize("!!!---").is_err());
    }
}
