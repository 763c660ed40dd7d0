/// Business lifecycle
///
/// A business is provisioned together with its backing user (role
/// `business`) and deleted together with it. Email, phone, password hash and
/// status are kept identical on both rows by [`super::mirror`].
///
/// # States
///
/// ```text
/// Provisioning ──> Active <──> Inactive ──> Deleted
/// ```
///
/// # Atomicity
///
/// Every operation that writes more than one row runs in a single
/// transaction and either commits fully or rolls back fully. Pre-checks
/// (uniqueness, package existence) happen before the transaction opens; the
/// store's unique indexes back them up, and a violation surfaces as the same
/// Conflict the pre-check would have produced.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::mirror::{self, MirroredFields};
use super::{normalize_batch, require_text, Page};
use crate::auth::password::{hash_password_with, validate_password_length, HashingConfig};
use crate::db::transaction::commit_or_rollback;
use crate::error::{DomainError, DomainResult};
use crate::models::business::{Business, CreateBusiness, UpdateBusiness};
use crate::models::package::Package;
use crate::models::user::{CreateUser, Role, User};
use crate::models::AccountStatus;
use crate::slug;

/// Input for provisioning a business and its user
#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub owner_name: String,
    pub name: String,
    /// Slug seed; the business name is used when omitted
    pub slug: Option<String>,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Plaintext; hashed once for both rows
    pub password: String,
    pub package_id: Option<Uuid>,
}

/// Requested business changes
///
/// Every field is optional. `package_id: Some(None)` clears the package.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessChanges {
    pub name: Option<String>,
    /// New slug seed; re-allocated only if it normalizes to a different slug
    pub slug: Option<String>,
    pub owner_name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub package_id: Option<Option<Uuid>>,
    pub status: Option<i32>,
}

impl BusinessChanges {
    pub fn is_empty(&self) -> bool {
        self == &BusinessChanges::default()
    }
}

#[derive(Clone)]
pub struct BusinessService {
    pool: SqlitePool,
    hashing: HashingConfig,
}

impl BusinessService {
    pub fn new(pool: SqlitePool, hashing: HashingConfig) -> Self {
        Self { pool, hashing }
    }

    /// Provisions a business together with its backing user
    ///
    /// # Errors
    ///
    /// - Validation for blank names, an empty slug seed or a short password
    /// - Conflict if the email is used by any business or user, or the name is taken
    /// - NotFound if `package_id` does not exist
    /// - Internal if the transaction fails; nothing is persisted
    pub async fn create(&self, input: NewBusiness) -> DomainResult<Business> {
        require_text("owner_name", &input.owner_name)?;
        require_text("name", &input.name)?;
        require_text("email", &input.email)?;
        validate_password_length(&input.password)?;
        let seed = input.slug.clone().unwrap_or_else(|| input.name.clone());
        slug::normalize(&seed)?;

        self.ensure_email_free(&input.email, None, None).await?;

        if Business::name_taken(&self.pool, &input.name, None).await? {
            return Err(DomainError::conflict("business name is already taken"));
        }

        if let Some(package_id) = input.package_id {
            self.ensure_package_exists(package_id).await?;
        }

        let password_hash = hash_password_with(&input.password, &self.hashing)?;

        let mut tx = self.pool.begin().await?;
        let outcome = provision(&mut tx, input, &seed, password_hash).await;
        let business = commit_or_rollback(tx, outcome).await?;

        info!(
            business_id = %business.id,
            user_id = %business.user_id,
            slug = %business.slug,
            "Business provisioned"
        );
        Ok(business)
    }

    /// Gets a business by ID
    pub async fn get(&self, id: Uuid) -> DomainResult<Business> {
        Business::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("business", id))
    }

    /// Lists businesses with the total count
    pub async fn list(&self, page: Page) -> DomainResult<(Vec<Business>, i64)> {
        let businesses = Business::list(&self.pool, page.limit, page.offset).await?;
        let total = Business::count(&self.pool).await?;
        Ok((businesses, total))
    }

    /// Applies the supplied changes to a business and, for mirrored fields,
    /// to its user
    ///
    /// # Errors
    ///
    /// - Validation if nothing was supplied or nothing would change, or for
    ///   a bad status, short non-empty password, blank text or empty slug seed
    /// - NotFound if the business or the new package does not exist
    /// - Conflict if the new name or email is taken
    pub async fn update(&self, id: Uuid, mut changes: BusinessChanges) -> DomainResult<Business> {
        if changes.is_empty() {
            return Err(DomainError::validation("update", "no changes supplied"));
        }

        // An empty password leaves the current one in place
        changes.password = changes.password.filter(|password| !password.is_empty());

        let status = changes.status.map(AccountStatus::try_from).transpose()?;
        if let Some(password) = changes.password.as_deref() {
            validate_password_length(password)?;
        }
        for (field, value) in [
            ("name", &changes.name),
            ("owner_name", &changes.owner_name),
            ("email", &changes.email),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        let slug_base = changes.slug.as_deref().map(slug::normalize).transpose()?;

        let current = self.get(id).await?;

        if let Some(name) = changes.name.as_deref() {
            if Business::name_taken(&self.pool, name, Some(id)).await? {
                return Err(DomainError::conflict("business name is already taken"));
            }
        }
        if let Some(email) = changes.email.as_deref() {
            self.ensure_email_free(email, Some(id), Some(current.user_id))
                .await?;
        }
        if let Some(Some(package_id)) = changes.package_id {
            self.ensure_package_exists(package_id).await?;
        }

        let password_hash = changes
            .password
            .as_deref()
            .map(|password| hash_password_with(password, &self.hashing))
            .transpose()?;

        let staged = UpdateBusiness {
            name: changes.name,
            owner_name: changes.owner_name,
            location: changes.location,
            package_id: changes.package_id,
            ..Default::default()
        };
        let mirrored = MirroredFields {
            email: changes.email,
            phone: changes.phone,
            password_hash,
            status,
        };
        let reslug = changes
            .slug
            .filter(|_| slug_base.as_deref() != Some(current.slug.as_str()));

        if staged.is_empty() && mirrored.is_empty() && reslug.is_none() {
            return Err(DomainError::validation("update", "no changes to apply"));
        }

        let mut tx = self.pool.begin().await?;
        let outcome = apply_update(&mut tx, &current, staged, mirrored, reslug).await;
        let business = commit_or_rollback(tx, outcome).await?;

        info!(business_id = %id, "Business updated");
        Ok(business)
    }

    /// Deletes a business and its backing user
    ///
    /// Teacher and student profiles of the business are removed by the
    /// store's cascade.
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let business = self.get(id).await?;

        let mut tx = self.pool.begin().await?;
        let outcome = remove_pair(&mut tx, business.id, business.user_id).await;
        commit_or_rollback(tx, outcome).await?;

        info!(business_id = %id, user_id = %business.user_id, "Business deleted");
        Ok(())
    }

    /// Sets the status of a business and its user
    pub async fn change_status(&self, id: Uuid, status: i32) -> DomainResult<Business> {
        let status = AccountStatus::try_from(status)?;
        let business = self.get(id).await?;

        let mut tx = self.pool.begin().await?;
        let outcome = mirror::write_linked(
            &mut tx,
            business.id,
            business.user_id,
            UpdateBusiness::default(),
            MirroredFields::status(status),
        )
        .await;
        let business = commit_or_rollback(tx, outcome).await?;

        info!(business_id = %id, status = status.code(), "Business status changed");
        Ok(business)
    }

    /// Subscribes a business to a package
    pub async fn assign_package(&self, id: Uuid, package_id: Uuid) -> DomainResult<Business> {
        self.ensure_package_exists(package_id).await?;

        let business = Business::update(
            &self.pool,
            id,
            UpdateBusiness {
                package_id: Some(Some(package_id)),
                ..Default::default()
            },
        )
        .await
        .map_err(|err| DomainError::from_reference(err, "package", package_id))?
        .ok_or_else(|| DomainError::not_found("business", id))?;

        info!(business_id = %id, %package_id, "Package assigned");
        Ok(business)
    }

    /// Clears the package of a business
    pub async fn remove_package(&self, id: Uuid) -> DomainResult<Business> {
        let business = Business::update(
            &self.pool,
            id,
            UpdateBusiness {
                package_id: Some(None),
                ..Default::default()
            },
        )
        .await?
        .ok_or_else(|| DomainError::not_found("business", id))?;

        info!(business_id = %id, "Package removed");
        Ok(business)
    }

    /// Sets the status of every listed business and its user
    ///
    /// All ids are checked before anything is written; one missing id
    /// rejects the whole batch.
    ///
    /// # Returns
    ///
    /// Number of businesses updated (duplicates counted once)
    pub async fn bulk_update_status(&self, ids: &[Uuid], status: i32) -> DomainResult<u64> {
        let status = AccountStatus::try_from(status)?;
        let ids = self.validate_batch(ids).await?;

        let mut tx = self.pool.begin().await?;
        let outcome = bulk_status(&mut tx, &ids, status).await;
        let updated = commit_or_rollback(tx, outcome).await?;

        info!(count = updated, status = status.code(), "Bulk status update applied");
        Ok(updated)
    }

    /// Subscribes every listed business to a package
    pub async fn bulk_assign_package(&self, ids: &[Uuid], package_id: Uuid) -> DomainResult<u64> {
        self.ensure_package_exists(package_id).await?;
        let ids = self.validate_batch(ids).await?;

        let mut tx = self.pool.begin().await?;
        let outcome = bulk_package(&mut tx, &ids, package_id).await;
        let updated = commit_or_rollback(tx, outcome).await?;

        info!(count = updated, %package_id, "Bulk package assignment applied");
        Ok(updated)
    }

    /// Checks both tables that hold an email
    async fn ensure_email_free(
        &self,
        email: &str,
        business_id: Option<Uuid>,
        user_id: Option<Uuid>,
    ) -> DomainResult<()> {
        let on_business = Business::email_taken(&self.pool, email, business_id).await?;
        let on_user = User::email_taken(&self.pool, email, user_id).await?;

        if on_business || on_user {
            debug!(email, on_business, on_user, "Email already in use");
            return Err(DomainError::conflict("email is already in use"));
        }
        Ok(())
    }

    async fn ensure_package_exists(&self, package_id: Uuid) -> DomainResult<()> {
        if !Package::exists(&self.pool, package_id).await? {
            return Err(DomainError::not_found("package", package_id));
        }
        Ok(())
    }

    /// De-duplicates the batch and fails on the first id that does not exist
    async fn validate_batch(&self, ids: &[Uuid]) -> DomainResult<Vec<Uuid>> {
        let ids = normalize_batch(ids)?;
        let existing = Business::existing_ids(&self.pool, &ids).await?;

        if let Some(missing) = ids.iter().find(|id| !existing.contains(id)) {
            warn!(
                requested = ids.len(),
                found = existing.len(),
                %missing,
                "Rejecting batch with unknown business"
            );
            return Err(DomainError::not_found("business", missing));
        }

        Ok(ids)
    }
}

async fn provision(
    conn: &mut SqliteConnection,
    input: NewBusiness,
    seed: &str,
    password_hash: String,
) -> DomainResult<Business> {
    let user = User::create(
        &mut *conn,
        CreateUser {
            name: input.owner_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            password_hash: password_hash.clone(),
            role: Role::Business,
            status: AccountStatus::Active,
        },
    )
    .await?;

    let slug = slug::allocate(&mut *conn, seed, None).await?;
    let package_id = input.package_id;

    let business = Business::create(
        &mut *conn,
        CreateBusiness {
            name: input.name,
            slug,
            user_id: user.id,
            owner_name: input.owner_name,
            package_id: input.package_id,
            email: input.email,
            phone: input.phone,
            location: input.location,
            password_hash,
            status: AccountStatus::Active,
        },
    )
    .await
    .map_err(|err| mirror::package_write_error(err, package_id))?;

    Ok(business)
}

async fn apply_update(
    conn: &mut SqliteConnection,
    current: &Business,
    mut staged: UpdateBusiness,
    mirrored: MirroredFields,
    reslug: Option<String>,
) -> DomainResult<Business> {
    if let Some(seed) = reslug {
        let slug = slug::allocate(&mut *conn, &seed, Some(&current.slug)).await?;
        if slug != current.slug {
            debug!(business_id = %current.id, from = %current.slug, to = %slug, "Slug re-allocated");
            staged.slug = Some(slug);
        }
    }

    // A new seed can allocate back to the current slug
    if staged.is_empty() && mirrored.is_empty() {
        return Err(DomainError::validation("update", "no changes to apply"));
    }

    mirror::write_linked(conn, current.id, current.user_id, staged, mirrored).await
}

async fn remove_pair(conn: &mut SqliteConnection, business_id: Uuid, user_id: Uuid) -> DomainResult<()> {
    if !Business::delete(&mut *conn, business_id).await? {
        return Err(DomainError::not_found("business", business_id));
    }
    if !User::delete(&mut *conn, user_id).await? {
        return Err(DomainError::not_found("user", user_id));
    }
    Ok(())
}

async fn bulk_status(
    conn: &mut SqliteConnection,
    ids: &[Uuid],
    status: AccountStatus,
) -> DomainResult<u64> {
    let user_ids = Business::user_ids_for(&mut *conn, ids).await?;
    if user_ids.len() != ids.len() {
        return Err(DomainError::not_found(
            "business",
            format!("{} of {} rows", ids.len() - user_ids.len(), ids.len()),
        ));
    }

    mirror::write_status_many(conn, ids, &user_ids, status).await
}

async fn bulk_package(conn: &mut SqliteConnection, ids: &[Uuid], package_id: Uuid) -> DomainResult<u64> {
    let updated = Business::set_package_many(&mut *conn, ids, Some(package_id))
        .await
        .map_err(|err| DomainError::from_reference(err, "package", package_id))?;
    if updated != ids.len() as u64 {
        return Err(DomainError::not_found(
            "business",
            format!("{} of {} rows", ids.len() as u64 - updated, ids.len()),
        ));
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_changes_empty() {
        assert!(BusinessChanges::default().is_empty());
        assert!(!BusinessChanges {
            package_id: Some(None),
            ..Default::default()
        }
        .is_empty());
    }
}
