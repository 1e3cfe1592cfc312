use thiserror::Error;

/// Errors raised by a post store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A statement failed to execute or a row could not be decoded
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// The backend could not be reached (pool closed, timed out, I/O failure)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Errors returned by post operations.
///
/// Each variant maps to exactly one HTTP status (see the `IntoResponse`
/// implementation in the server handlers).
#[derive(Debug, Error)]
pub enum PostError {
    /// The payload is malformed or a required field is missing (HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// The referenced post does not exist (HTTP 404)
    #[error("Post not found")]
    NotFound { post_id: i64 },

    /// The store failed (HTTP 500)
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PostError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        PostError::Validation(message.into())
    }
}
