use thiserror::Error;

/// Internal error type for store and service operations.
///
/// Not exposed via API - endpoints see `AuthError`, which maps any of
/// these to a generic 500 without leaking the underlying failure.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error("Database error: {operation} failed: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Insert hit a unique index; the constraint is the final authority
    /// for conflicts the pre-checks raced on.
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: &'static str },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: &'static str,
        message: String,
    },
}

impl InternalError {
    pub fn database(operation: &'static str, source: sea_orm::DbErr) -> Self {
        InternalError::Database { operation, source }
    }

    pub fn crypto(operation: &'static str, message: impl Into<String>) -> Self {
        InternalError::Crypto {
            operation,
            message: message.into(),
        }
    }
}
