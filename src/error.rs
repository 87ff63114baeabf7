//! Custom error types for rustdblp.
//!
//! All library functions return `Result<T, DblpError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for rustdblp operations.
#[derive(Debug, Error)]
pub enum DblpError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTML parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Search endpoint answered with a non-success status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message
        message: String,
    },

    /// A required field is missing from a result entry
    #[error("Entry has no {0}")]
    MissingField(&'static str),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Config file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Title list input error
    #[error("Input error: {0}")]
    Input(String),
}

/// Result type alias using `DblpError`
pub type Result<T> = std::result::Result<T, DblpError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| DblpError::Parse(msg.to_string()))
    }
}
