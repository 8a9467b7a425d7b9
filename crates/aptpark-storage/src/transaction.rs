//! Transaction scoping for service-level operations.
//!
//! Every mutating service operation opens exactly one transaction, passes
//! `&mut *tx` to the repository functions and finishes it with one of
//! [`commit`], [`rollback`] or [`end`]. A transaction that is dropped without
//! being finished is rolled back by SQLx when its connection returns to the
//! pool.
//!
//! # Usage Pattern
//!
//! ```no_run
//! use aptpark_storage::{Database, transaction};
//! use aptpark_storage::repositories::residents;
//!
//! # async fn example(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
//! let mut tx = transaction::begin(db).await?;
//!
//! residents::adjust_vehicle_count(&mut tx, "RES001", 1).await?;
//!
//! transaction::commit(tx).await?;
//! # Ok(())
//! # }
//! ```

use crate::connection::Database;
use crate::error::StorageResult;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, error};

/// An open transaction on the gateway's connection.
pub type Tx = Transaction<'static, Sqlite>;

/// Begin a transaction.
///
/// The pool holds a single connection, so a caller must not use
/// [`Database::pool`] again until the transaction is finished.
pub async fn begin(db: &Database) -> StorageResult<Tx> {
    let tx = db.pool().begin().await?;
    debug!("Transaction started");
    Ok(tx)
}

/// Commit a transaction, making all of its writes visible.
pub async fn commit(tx: Tx) -> StorageResult<()> {
    tx.commit().await?;
    debug!("Transaction committed");
    Ok(())
}

/// Roll back a transaction.
///
/// A failing rollback is logged and swallowed; SQLite discards the pending
/// writes when the connection is reset anyway.
pub async fn rollback(tx: Tx) {
    match tx.rollback().await {
        Ok(()) => debug!("Transaction rolled back"),
        Err(e) => error!(error = %e, "Rollback failed"),
    }
}

/// Finish a transaction that has nothing worth keeping.
///
/// Used when an operation stops early (rejection or cancellation). Any
/// writes made so far are discarded and the connection returns to the pool
/// in autocommit mode.
pub async fn end(tx: Tx) {
    if let Err(e) = tx.rollback().await {
        error!(error = %e, "Failed to end transaction");
    } else {
        debug!("Transaction ended without changes");
    }
}
