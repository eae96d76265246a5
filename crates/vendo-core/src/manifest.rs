//! Vendor file definition and loading
//!
//! A vendor file declares the registry, the install location, and the
//! set of packages to vendor, each pinned to an exact version and
//! shasum. JSON and YAML files are supported, selected by extension.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Cache root used when the vendor file does not name one
const DEFAULT_METADATA_DIR: &str = ".vendor";

/// One pinned package in a vendor file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Package name as registered
    pub package: String,

    /// Exact version (not a range)
    pub version: String,

    /// Hex SHA-1 digest the downloaded archive must match
    pub shasum: String,
}

/// A parsed vendor file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorFile {
    /// Registry override for private mirrors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Install root for vendored packages
    pub location: String,

    /// Cache root for metadata and archives (default: `.vendor`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,

    /// Pinned packages in install order
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
}

impl VendorFile {
    /// Load a vendor file, selecting the codec from its extension
    ///
    /// A package name listed twice is rejected here rather than left to
    /// clobber its own install later.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::ManifestNotFound {
                path: path.display().to_string(),
            });
        }

        let format = ManifestFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let vendor = format.decode(&content)?;
        vendor.check_unique_packages()?;
        Ok(vendor)
    }

    /// Save the vendor file through the codec its extension selects
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ManifestFormat::from_path(path)?;
        std::fs::write(path, format.encode(self)?)?;
        Ok(())
    }

    /// Install root resolved against `base`
    pub fn location_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.location)
    }

    /// Cache root resolved against `base`
    pub fn metadata_dir(&self, base: &Path) -> PathBuf {
        base.join(self.metadata.as_deref().unwrap_or(DEFAULT_METADATA_DIR))
    }

    fn check_unique_packages(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for spec in &self.packages {
            if !seen.insert(spec.package.as_str()) {
                return Err(CoreError::DuplicatePackage {
                    name: spec.package.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Vendor file codec, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// Detect the codec for a path (`.json`, `.yaml`, or `.yml`)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension {
            "json" => Ok(ManifestFormat::Json),
            "yaml" | "yml" => Ok(ManifestFormat::Yaml),
            other => Err(CoreError::UnrecognizedFormat {
                extension: other.to_string(),
            }),
        }
    }

    fn decode(self, content: &str) -> Result<VendorFile> {
        match self {
            ManifestFormat::Json => Ok(serde_json::from_str(content)?),
            ManifestFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }

    fn encode(self, vendor: &VendorFile) -> Result<String> {
        match self {
            ManifestFormat::Json => Ok(serde_json::to_string_pretty(vendor)?),
            ManifestFormat::Yaml => Ok(serde_yaml::to_string(vendor)?),
        }
    }
}
