//! Vendo Core - foundational pieces of the npm vendoring tool
//!
//! This crate provides the types used throughout Vendo:
//! - `checksum`: SHA-1 digests matching the registry's shasum algorithm
//! - `archive`: safe gzip-tar extraction and two-phase package installs
//! - `manifest`: the vendor file model with JSON/YAML codecs

pub mod archive;
pub mod checksum;
pub mod error;
pub mod manifest;

pub use error::{CoreError, Result};
pub use manifest::{ManifestFormat, PackageSpec, VendorFile};
