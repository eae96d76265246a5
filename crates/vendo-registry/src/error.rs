//! Error types for registry operations

use thiserror::Error;

/// Registry operation errors
#[derive(Debug, Error)]
pub enum RegistryError {
    // ============ Network Errors ============
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    // ============ Metadata Errors ============
    #[error("Version not found: {package}@{version}")]
    VersionNotFound { package: String, version: String },

    #[error("Invalid metadata for {package}: {message}")]
    MetadataParse { package: String, message: String },

    #[error("Invalid version range '{range}': {message}")]
    InvalidRange { range: String, message: String },

    // ============ Integrity Errors ============
    #[error("Checksum mismatch for {package}@{version}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        package: String,
        version: String,
        expected: String,
        actual: String,
    },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Core(#[from] vendo_core::CoreError),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

impl From<reqwest::Error> for RegistryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RegistryError::Timeout { seconds: 30 }
        } else if e.is_connect() {
            RegistryError::Network {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RegistryError::Http {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            RegistryError::Network {
                message: e.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for RegistryError {
    fn from(e: url::ParseError) -> Self {
        RegistryError::InvalidUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}
