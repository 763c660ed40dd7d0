/// Database models for TutorHub
///
/// Each model maps 1:1 to a table and exposes plain CRUD associated
/// functions generic over a sqlx executor, so the same call works against the
/// pool or inside an open transaction. Cross-table rules (mirroring, slug
/// allocation, role checks) live in `services`, not here.
///
/// # Models
///
/// - `user`: identity store (credentials, role, status)
/// - `package`: subscription plans
/// - `business`: business profiles, 1:1 with a `business` user
/// - `teacher`, `student`: dependent profiles linked to an existing user
///
/// # Example
///
/// ```no_run
/// use tutorhub_shared::models::package::{CreatePackage, Package};
/// use tutorhub_shared::models::AccountStatus;
/// use tutorhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let package = Package::create(&pool, CreatePackage {
///     name: "Starter".to_string(),
///     price: 19.0,
///     validation_period_days: 30,
///     description: None,
///     status: AccountStatus::Active,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

pub mod business;
pub mod package;
pub mod status;
pub mod student;
pub mod teacher;
pub mod user;

pub use status::AccountStatus;

/// Appends `(?, ?, ...)` with one bound id per element
pub(crate) fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, ids: &[Uuid]) {
    query.push("(");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}
