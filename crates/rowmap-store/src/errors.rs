//! Error handling for rowmap-store
//!
//! Wraps rowmap-core ExError with store-specific helpers

use rowmap_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a statement error that keeps the failing SQL as context
pub fn statement_error(op: &str, sql: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(format!("{} (sql: {})", err, sql))
}
