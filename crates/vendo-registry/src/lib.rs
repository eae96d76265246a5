//! Vendo Registry Access
//!
//! This crate talks to an npm-compatible registry for Vendo, including:
//!
//! - **Metadata documents**: dist-tags, published versions, tarball URLs
//! - **Cached downloads**: metadata and archives persisted under the
//!   metadata directory and reused across runs
//! - **Install pipeline**: phased metadata / fetch / install runs with
//!   pinned-checksum verification
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use vendo_core::PackageSpec;
//! use vendo_registry::{Installer, RegistryClient, SilentObserver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RegistryClient::new(".vendor", None)?;
//!
//! let packages = vec![PackageSpec {
//!     package: "left-pad".to_string(),
//!     version: "1.3.0".to_string(),
//!     shasum: "e572ff9dd10a300bb5537f7fd7f1a7d866a10956".to_string(),
//! }];
//!
//! Installer::new(&client)
//!     .run(&packages, Path::new("vendor"), false, &SilentObserver)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod install;
pub mod metadata;

// Re-exports for convenience
pub use client::{DEFAULT_REGISTRY, RegistryClient};
pub use error::{RegistryError, Result};
pub use install::{InstallObserver, Installer, Phase, SilentObserver};
pub use metadata::Metadata;
