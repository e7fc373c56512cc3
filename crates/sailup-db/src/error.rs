//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Classifies and adds context                   │
//! │       │                                                                 │
//! │       ├── Domain(CoreError)  → business rule violation, no retry       │
//! │       ├── Unavailable        → transient, caller may retry w/ backoff  │
//! │       ├── ConnectionFailed / → fatal configuration, surface to the     │
//! │       │   MigrationFailed      operator, do not keep serving           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  user_message() ← presentation-safe text, never raw store errors       │
//! │  tracing log    ← full diagnostic detail                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use sailup_core::CoreError;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - ID doesn't exist
    /// - Soft-deleted record
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Duplicate email or fiscal code slipping past the explicit pre-check
    /// - Duplicate product code
    #[error("duplicate {field}: value already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Business rule violation from the core domain.
    ///
    /// Carries booking conflicts, invalid status transitions, duplicate
    /// registrations and collected validation failures. Not retryable.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Database connection failed.
    ///
    /// Unusable configuration: bad path, permissions, disk full. The process
    /// must not silently continue serving requests in this state.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed. Same severity as [`DbError::ConnectionFailed`].
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// The store is temporarily unavailable (lock contention, pool or
    /// statement timeout). Retryable with backoff.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Query execution failed (runtime SQL error).
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed to commit.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Internal database error.
    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True when the caller may retry the operation with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DbError::Unavailable(_))
    }

    /// Presentation-safe message for end users.
    ///
    /// Business errors render their own text; store internals collapse to a
    /// generic sentence. The raw diagnostic only ever reaches the log
    /// channel, never a response body.
    pub fn user_message(&self) -> String {
        match self {
            DbError::Domain(err) => err.to_string(),
            DbError::NotFound { entity, .. } => format!("{entity} not found"),
            DbError::UniqueViolation { field } => {
                format!("a record with the same {field} already exists")
            }
            DbError::Unavailable(_) => {
                "the service is temporarily busy, please try again".to_string()
            }
            DbError::ForeignKeyViolation { .. }
            | DbError::ConnectionFailed(_)
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::TransactionFailed(_)
            | DbError::Internal(_) => "an internal error occurred, contact support".to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound          → DbError::NotFound
/// sqlx::Error::Database             → Analyze message for constraint/busy
/// sqlx::Error::PoolTimedOut         → DbError::Unavailable (retryable)
/// Other                             → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                //   "UNIQUE constraint failed: <table>.<column>"
                //   "FOREIGN KEY constraint failed"
                // Lock contention after busy_timeout:
                //   "database is locked" / "database table is locked"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked")
                    || msg.contains("database table is locked")
                {
                    DbError::Unavailable(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => {
                DbError::Unavailable("connection pool timed out".to_string())
            }

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DbError::Unavailable("database is locked".into()).is_retryable());
        assert!(!DbError::QueryFailed("syntax error".into()).is_retryable());
        assert!(!DbError::Domain(CoreError::EmailAlreadyRegistered).is_retryable());
    }

    #[test]
    fn test_user_message_hides_store_internals() {
        let err = DbError::QueryFailed("no such table: Prenotazione".into());
        assert!(!err.user_message().contains("Prenotazione"));

        let err = DbError::Domain(CoreError::BookingConflict {
            product_id: "BARCA-01".into(),
        });
        assert_eq!(
            err.user_message(),
            "product BARCA-01 is not available in the requested period"
        );
    }

    #[test]
    fn test_not_found_helper() {
        let err = DbError::not_found("Utente", 42);
        assert_eq!(err.to_string(), "Utente not found: 42");
    }
}
