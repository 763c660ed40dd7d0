/// Business/User field mirroring
///
/// A business row duplicates four fields of its backing user: email, phone,
/// password hash and status. Every write path that changes one of them goes
/// through this module so both rows receive the identical value on the same
/// connection (always an open transaction).

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::models::business::{Business, UpdateBusiness};
use crate::models::user::{UpdateUser, User};
use crate::models::AccountStatus;

/// Values shared by a business and its user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirroredFields {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub status: Option<AccountStatus>,
}

impl MirroredFields {
    pub fn status(status: AccountStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &MirroredFields::default()
    }

    /// The user-side update carrying exactly these values
    pub fn to_user_update(&self) -> UpdateUser {
        UpdateUser {
            email: self.email.clone(),
            phone: self.phone.clone(),
            password_hash: self.password_hash.clone(),
            status: self.status,
            ..Default::default()
        }
    }

    /// Merges these values into a business-side update
    pub fn merge_into(self, update: &mut UpdateBusiness) {
        if self.email.is_some() {
            update.email = self.email;
        }
        if self.phone.is_some() {
            update.phone = self.phone;
        }
        if self.password_hash.is_some() {
            update.password_hash = self.password_hash;
        }
        if self.status.is_some() {
            update.status = self.status;
        }
    }
}

/// Converts a failed business write, reporting a lost package reference as
/// NotFound for that package
pub(crate) fn package_write_error(err: sqlx::Error, package_id: Option<Uuid>) -> DomainError {
    match package_id {
        Some(package_id) => DomainError::from_reference(err, "package", package_id),
        None => err.into(),
    }
}

/// Writes a business update and mirrors the shared fields onto its user
///
/// # Errors
///
/// NotFound if either row is missing, or if a package being assigned
/// disappeared; any other store error is returned as-is for the caller to
/// roll back.
pub async fn write_linked(
    conn: &mut SqliteConnection,
    business_id: Uuid,
    user_id: Uuid,
    mut business: UpdateBusiness,
    mirrored: MirroredFields,
) -> DomainResult<Business> {
    let user_update = mirrored.to_user_update();
    let touches_user = !mirrored.is_empty();
    let package_id = business.package_id.flatten();
    mirrored.merge_into(&mut business);

    let updated = Business::update(&mut *conn, business_id, business)
        .await
        .map_err(|err| package_write_error(err, package_id))?
        .ok_or_else(|| DomainError::not_found("business", business_id))?;

    if touches_user {
        User::update(&mut *conn, user_id, user_update)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;
    }

    Ok(updated)
}

/// Sets the status of many businesses and their users
///
/// Both id lists must be complete; a row count that differs from the list
/// length means a row disappeared and is reported as NotFound.
pub async fn write_status_many(
    conn: &mut SqliteConnection,
    business_ids: &[Uuid],
    user_ids: &[Uuid],
    status: AccountStatus,
) -> DomainResult<u64> {
    let businesses = Business::set_status_many(&mut *conn, business_ids, status).await?;
    if businesses != business_ids.len() as u64 {
        return Err(DomainError::not_found(
            "business",
            format!("{} of {} rows", business_ids.len() as u64 - businesses, business_ids.len()),
        ));
    }

    let users = User::set_status_many(&mut *conn, user_ids, status).await?;
    if users != user_ids.len() as u64 {
        return Err(DomainError::not_found(
            "user",
            format!("{} of {} rows", user_ids.len() as u64 - users, user_ids.len()),
        ));
    }

    Ok(businesses)
}
