// src/error.rs

//! Error types for slimcheck
//!
//! Only failures that stop a lint run before any check executes are errors.
//! Everything a check finds in the Dockerfile itself is reported as an
//! [`Issue`](crate::checks::Issue) instead.

use thiserror::Error;

/// Errors that can occur while loading a Dockerfile or configuration
#[derive(Error, Debug)]
pub enum Error {
    /// The Dockerfile path does not exist
    #[error("Dockerfile not found at {0}")]
    NotFoundError(String),

    /// The Dockerfile is not valid UTF-8 text
    #[error("Failed to parse Dockerfile: {0}")]
    ParseError(String),

    /// The Dockerfile exists but could not be read
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration file is malformed or has invalid values
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
