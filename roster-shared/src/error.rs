/// Store error taxonomy
///
/// Every store backend reports failures through [`StoreError`]. "Not found"
/// is not an error here: lookups return `Option` and deletes return `bool`,
/// so handlers decide how absence is reported.
///
/// # Example
///
/// ```
/// use roster_shared::error::StoreError;
///
/// let err = StoreError::DuplicateKey("users_email_key".to_string());
/// assert!(err.is_duplicate_key());
/// ```

use thiserror::Error;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write (e.g. duplicate email)
    #[error("Duplicate key violates unique constraint: {0}")]
    DuplicateKey(String),

    /// The store could not be reached (pool timeout, closed pool, I/O)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Returns true if the error is a unique-index violation
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or("unique index").to_string();
                    return StoreError::DuplicateKey(constraint);
                }
                StoreError::Database(db_err.to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}
