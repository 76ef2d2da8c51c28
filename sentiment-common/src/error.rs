//! Common error types for the sentiment service

use thiserror::Error;

/// Common result type for sentiment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the sentiment crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Required fields were absent from a record
    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    /// Store is running without a database
    #[error("Database unavailable: {0}")]
    Unavailable(String),
}
