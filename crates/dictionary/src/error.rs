use std::time::Duration;

use thiserror::Error;

/// Errors produced by dictionary lookups.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The lookup matched nothing.
    #[error("{0}")]
    NotFound(String),

    /// A required input was missing or malformed.
    #[error("{0}")]
    BadRequest(String),

    #[error("Query failed: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Query timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

impl DictionaryError {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}
