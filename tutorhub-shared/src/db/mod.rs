/// Database layer for TutorHub
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: embedded migration runner
/// - `transaction`: commit-or-rollback helper for multi-table writes
/// - Models are in the `models` module at crate root level
///
/// # Example
///
/// ```no_run
/// use tutorhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
pub mod transaction;
