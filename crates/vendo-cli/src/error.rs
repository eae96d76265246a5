//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

#![allow(dead_code)] // Some variants/methods are for future use

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Vendor file missing, malformed, or unusable
    #[error("Configuration error: {message}")]
    #[diagnostic(code(vendo::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Registry unreachable or returned an HTTP failure
    #[error("Network error: {message}")]
    #[diagnostic(code(vendo::cli::network))]
    Network { message: String },

    /// Archive failed checksum or layout verification
    #[error("Integrity error: {message}")]
    #[diagnostic(code(vendo::cli::integrity))]
    Integrity {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Registry answered, but the metadata does not resolve
    #[error("Registry error: {message}")]
    #[diagnostic(code(vendo::cli::registry))]
    Registry { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(vendo::cli::io))]
    Io { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(vendo::cli::error))]
    Other { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(vendo::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Network { .. } => exit_codes::NETWORK_ERROR,
            CliError::Integrity { .. } => exit_codes::INTEGRITY_ERROR,
            CliError::Registry { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify a vendo-core error
    pub fn from_core(err: vendo_core::CoreError) -> Self {
        use vendo_core::CoreError;

        match err {
            CoreError::ManifestNotFound { .. }
            | CoreError::UnrecognizedFormat { .. }
            | CoreError::DuplicatePackage { .. }
            | CoreError::JsonParse(_)
            | CoreError::YamlParse(_) => CliError::Config {
                message: err.to_string(),
                help: None,
            },
            CoreError::PathTraversal { .. } | CoreError::Archive { .. } => CliError::Integrity {
                message: err.to_string(),
                help: None,
            },
            CoreError::Io(_) => CliError::Io {
                message: err.to_string(),
            },
        }
    }

    /// Classify a vendo-registry error
    pub fn from_registry(err: vendo_registry::RegistryError) -> Self {
        use vendo_registry::RegistryError;

        match err {
            RegistryError::Http { .. }
            | RegistryError::Network { .. }
            | RegistryError::Timeout { .. }
            | RegistryError::InvalidUrl { .. } => CliError::Network {
                message: err.to_string(),
            },
            RegistryError::ChecksumMismatch { .. } => CliError::Integrity {
                message: err.to_string(),
                help: Some(
                    "verify the pinned shasum in the vendor file matches the intended \
                     package content"
                        .to_string(),
                ),
            },
            RegistryError::VersionNotFound { .. }
            | RegistryError::MetadataParse { .. }
            | RegistryError::InvalidRange { .. } => CliError::Registry {
                message: err.to_string(),
            },
            RegistryError::Io(_) => CliError::Io {
                message: err.to_string(),
            },
            RegistryError::Core(core) => CliError::from_core(core),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
