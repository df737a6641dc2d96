// src/error.rs

//! Error types for the kondate crate

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kondate operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database access failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database initialization failed
    #[error("failed to initialize database: {0}")]
    InitError(String),

    /// I/O failure (config files, database paths)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// Requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),
}
