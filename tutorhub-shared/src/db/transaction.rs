/// Unit-of-work helper for multi-table writes
///
/// Every operation that touches more than one table opens a transaction,
/// runs its body against the transaction's connection and hands the outcome
/// here. On `Ok` the transaction is committed; on `Err` it is rolled back
/// explicitly before the original error is returned.
///
/// # Example
///
/// ```no_run
/// use sqlx::SqlitePool;
/// use tutorhub_shared::db::transaction::commit_or_rollback;
/// use tutorhub_shared::error::DomainResult;
///
/// # async fn example(pool: SqlitePool) -> DomainResult<()> {
/// let mut tx = pool.begin().await?;
/// let outcome = sqlx::query("DELETE FROM students")
///     .execute(&mut *tx)
///     .await
///     .map(|_| ())
///     .map_err(Into::into);
/// commit_or_rollback(tx, outcome).await
/// # }
/// ```

use sqlx::{Sqlite, Transaction};
use tracing::{debug, warn};

use crate::error::{DomainError, DomainResult};

/// Commits on success, rolls back on failure
///
/// A failed rollback is logged but the original error wins. A failed commit
/// surfaces as an internal error (sqlx rolls the transaction back on drop).
pub async fn commit_or_rollback<T>(
    tx: Transaction<'static, Sqlite>,
    outcome: DomainResult<T>,
) -> DomainResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(DomainError::from)?;
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Rolling back transaction");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
