//! # Error Handling
//!
//! This module defines the centralized error type for the `qx-builder`
//! library. It uses `thiserror` to derive a single `Error` enum covering
//! every failure mode of a build run, with descriptive messages.
//!
//! ## Error Kinds
//!
//! - **Network**: the base configuration could not be fetched.
//! - **I/O**: a profile or output file could not be read or written.
//! - **Decode**: fetched or read bytes were not valid UTF-8.
//! - **Profile**: the YAML profile is malformed or fails validation.
//!
//! There is deliberately no structural parse error for the configuration
//! text itself: the section parser accepts any text.

use thiserror::Error;

/// Main error type for qx-builder operations
#[derive(Error, Debug)]
pub enum Error {
    /// The YAML profile parsed but its content is invalid.
    ///
    /// Carries an optional hint describing how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the profile
        hint: Option<String>,
    },

    /// Fetching a remote document failed.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// The HTTP client could not be set up; no request was made.
    #[error("HTTP client error: {message}")]
    HttpClient { message: String },

    /// Input bytes could not be decoded as UTF-8 text.
    #[error("Decoding error: {source_name} is not valid UTF-8 text")]
    Decode { source_name: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error came from the fetch collaborator.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. })
    }
}
