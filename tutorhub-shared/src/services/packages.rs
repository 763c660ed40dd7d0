/// Subscription package management

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{require_non_negative, require_text, status_or_active, Page};
use crate::error::{DomainError, DomainResult};
use crate::models::business::Business;
use crate::models::package::{CreatePackage, Package, UpdatePackage};
use crate::models::AccountStatus;

/// Input for creating a package
#[derive(Debug, Clone)]
pub struct NewPackage {
    pub name: String,
    pub price: f64,
    pub validation_period_days: i64,
    pub description: Option<String>,
    pub status: Option<i32>,
}

/// Requested package changes; `description: Some(None)` clears it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub validation_period_days: Option<i64>,
    pub description: Option<Option<String>>,
    pub status: Option<i32>,
}

fn require_positive_period(days: i64) -> DomainResult<()> {
    if days <= 0 {
        return Err(DomainError::validation(
            "validation_period_days",
            "must be greater than zero",
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PackageService {
    pool: SqlitePool,
}

impl PackageService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a package
    ///
    /// # Errors
    ///
    /// - Validation for a blank name, negative price, non-positive period or bad status
    /// - Conflict if the name is taken
    pub async fn create(&self, input: NewPackage) -> DomainResult<Package> {
        require_text("name", &input.name)?;
        require_non_negative("price", input.price)?;
        require_positive_period(input.validation_period_days)?;
        let status = status_or_active(input.status)?;

        if Package::name_taken(&self.pool, &input.name, None).await? {
            return Err(DomainError::conflict("package name is already taken"));
        }

        let package = Package::create(
            &self.pool,
            CreatePackage {
                name: input.name,
                price: input.price,
                validation_period_days: input.validation_period_days,
                description: input.description,
                status,
            },
        )
        .await?;

        info!(package_id = %package.id, name = %package.name, "Package created");
        Ok(package)
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Package> {
        Package::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DomainError::not_found("package", id))
    }

    pub async fn list(&self, page: Page) -> DomainResult<(Vec<Package>, i64)> {
        let packages = Package::list(&self.pool, page.limit, page.offset).await?;
        let total = Package::count(&self.pool).await?;
        Ok((packages, total))
    }

    /// Applies the supplied changes
    ///
    /// # Errors
    ///
    /// - Validation if nothing was supplied or a value is out of range
    /// - NotFound if the package does not exist
    /// - Conflict if the new name is taken
    pub async fn update(&self, id: Uuid, changes: PackageChanges) -> DomainResult<Package> {
        if changes == PackageChanges::default() {
            return Err(DomainError::validation("update", "no changes supplied"));
        }

        let mut staged = UpdatePackage::default();

        if let Some(name) = changes.name {
            require_text("name", &name)?;
            staged.name = Some(name);
        }
        if let Some(price) = changes.price {
            require_non_negative("price", price)?;
            staged.price = Some(price);
        }
        if let Some(days) = changes.validation_period_days {
            require_positive_period(days)?;
            staged.validation_period_days = Some(days);
        }
        staged.description = changes.description;
        if let Some(code) = changes.status {
            staged.status = Some(AccountStatus::try_from(code)?);
        }

        if let Some(name) = staged.name.as_deref() {
            if Package::name_taken(&self.pool, name, Some(id)).await? {
                return Err(DomainError::conflict("package name is already taken"));
            }
        }

        let package = Package::update(&self.pool, id, staged)
            .await?
            .ok_or_else(|| DomainError::not_found("package", id))?;

        info!(package_id = %id, "Package updated");
        Ok(package)
    }

    /// Deletes a package that no business references
    ///
    /// # Errors
    ///
    /// - NotFound if the package does not exist
    /// - Conflict while any business is subscribed to it
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let subscribers = Business::count_by_package(&self.pool, id).await?;
        if subscribers > 0 {
            debug!(package_id = %id, subscribers, "Package still referenced");
            return Err(DomainError::conflict(format!(
                "package is still assigned to {} business(es)",
                subscribers
            )));
        }

        if !Package::delete(&self.pool, id).await? {
            return Err(DomainError::not_found("package", id));
        }

        info!(package_id = %id, "Package deleted");
        Ok(())
    }
}
