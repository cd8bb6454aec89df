//! Error types for the Lattice API server
//!
//! Provides a unified error type hierarchy. Credential failures seen while
//! serving requests are not errors; they are reported as rejections by the
//! authenticators. Only construction-time failures live here.

use thiserror::Error;

/// Result type alias using Lattice's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // Authenticator construction errors
    #[error("Config load error: {0}")]
    ConfigLoad(#[from] ConfigLoadError),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures while building an authenticator from its configuration.
///
/// Messages carry line numbers only, never token values.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read token file: {0}")]
    Read(#[source] std::io::Error),

    #[error("token file is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed record on line {line}: expected 2 comma-separated fields, found {fields}")]
    MalformedRecord { line: usize, fields: usize },

    #[error("empty token or username on line {line}")]
    EmptyField { line: usize },

    #[error("duplicate token on line {line} (first defined on line {first_line})")]
    DuplicateToken { line: usize, first_line: usize },

    #[error("api key must not be empty")]
    EmptyApiKey,
}
