//! Error handling utilities for repositories

use graph_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a write error, reporting serialization failures and unique violations
/// as edge conflicts so the caller retries
pub fn map_write_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        // 40001 serialization_failure, 40P01 deadlock_detected
        if matches!(db_err.code().as_deref(), Some("40001" | "40P01")) {
            return DomainError::EdgeConflict;
        }
    }
    map_unique_violation(e, || DomainError::EdgeConflict)
}
