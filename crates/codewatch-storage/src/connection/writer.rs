//! BEGIN IMMEDIATE transactions on the write connection.

use codewatch_core::errors::RepositoryError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Execute a write inside a BEGIN IMMEDIATE transaction. The write lock is
/// taken at transaction start, so checks and writes see one snapshot. Any
/// error rolls the whole transaction back.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, RepositoryError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, RepositoryError>,
{
    // `&Connection` is all the writer mutex hands out, hence the unchecked
    // constructor. Dropping the transaction uncommitted rolls back.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        RepositoryError::Backend {
            message: format!("failed to begin immediate transaction: {e}"),
        }
    })?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| RepositoryError::Backend {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}
