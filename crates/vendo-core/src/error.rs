//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Vendor file not found: {path}")]
    ManifestNotFound { path: String },

    #[error("Unrecognized vendor file type: '{extension}'")]
    UnrecognizedFormat { extension: String },

    #[error("Duplicate package in vendor file: {name}")]
    DuplicatePackage { name: String },

    #[error("Archive entry escapes the destination directory: {entry}")]
    PathTraversal { entry: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
