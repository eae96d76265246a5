//! Registry metadata documents
//!
//! The registry answers `GET {registry}/{package}` with a JSON document
//! carrying `dist-tags` and a `versions` mapping; each version points
//! at its tarball URL and shasum. `Metadata` wraps one decoded document
//! and answers the lookups the install pipeline needs.

use std::collections::BTreeMap;

use semver::{Version, VersionReq};
use serde::Deserialize;

use crate::error::{RegistryError, Result};

/// Decoded metadata document for one package
#[derive(Debug, Clone)]
pub struct Metadata {
    package: String,
    document: Document,
}

#[derive(Debug, Clone, Deserialize)]
struct Document {
    /// Named version pointers ("latest", "next", ...)
    #[serde(default, rename = "dist-tags")]
    dist_tags: BTreeMap<String, String>,

    /// Published versions and their dist info
    #[serde(default)]
    versions: BTreeMap<String, VersionInfo>,
}

/// Per-version section of a metadata document
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub dist: DistInfo,
}

/// Distribution pointers for one published version
#[derive(Debug, Clone, Deserialize)]
pub struct DistInfo {
    /// Download URL for the gzip-tar archive
    pub tarball: String,

    /// Hex SHA-1 digest the registry declares for the archive
    pub shasum: String,
}

impl Metadata {
    /// Parse a raw metadata document for `package`
    pub fn parse(package: &str, content: &str) -> Result<Self> {
        let document =
            serde_json::from_str(content).map_err(|e| RegistryError::MetadataParse {
                package: package.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            package: package.to_string(),
            document,
        })
    }

    /// The package this document describes
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Copy of the dist-tags mapping (tag name -> version)
    pub fn tags(&self) -> BTreeMap<String, String> {
        self.document.dist_tags.clone()
    }

    /// Tarball URL for a version
    pub fn tarball(&self, version: &str) -> Result<&str> {
        self.version(version).map(|v| v.dist.tarball.as_str())
    }

    /// Registry-declared shasum for a version
    pub fn shasum(&self, version: &str) -> Result<&str> {
        self.version(version).map(|v| v.dist.shasum.as_str())
    }

    /// All published version strings
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.document.versions.keys().map(|s| s.as_str())
    }

    /// Published versions satisfying a comma-separated comparator set
    ///
    /// The range is semver comparator syntax (`>=1.0.0, <2.0.0`), not a
    /// native npm range; `||` unions are not supported. Versions that
    /// do not parse as semver are skipped.
    pub fn compatible_versions(&self, range: &str) -> Result<Vec<String>> {
        let req = VersionReq::parse(range).map_err(|e| RegistryError::InvalidRange {
            range: range.to_string(),
            message: e.to_string(),
        })?;

        Ok(self
            .document
            .versions
            .keys()
            .filter(|key| {
                Version::parse(key)
                    .map(|v| req.matches(&v))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    fn version(&self, version: &str) -> Result<&VersionInfo> {
        self.document
            .versions
            .get(version)
            .ok_or_else(|| RegistryError::VersionNotFound {
                package: self.package.clone(),
                version: version.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> Metadata {
        let json = r#"{
            "name": "left-pad",
            "dist-tags": {"latest": "1.5.0", "legacy": "0.9.0"},
            "versions": {
                "0.9.0": {
                    "dist": {
                        "tarball": "https://registry.example.com/left-pad/-/left-pad-0.9.0.tgz",
                        "shasum": "aaa111"
                    }
                },
                "1.0.0": {
                    "dist": {
                        "tarball": "https://registry.example.com/left-pad/-/left-pad-1.0.0.tgz",
                        "shasum": "bbb222"
                    }
                },
                "1.5.0": {
                    "dist": {
                        "tarball": "https://registry.example.com/left-pad/-/left-pad-1.5.0.tgz",
                        "shasum": "ccc333"
                    }
                },
                "2.0.0": {
                    "dist": {
                        "tarball": "https://registry.example.com/left-pad/-/left-pad-2.0.0.tgz",
                        "shasum": "ddd444"
                    }
                }
            }
        }"#;
        Metadata::parse("left-pad", json).unwrap()
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        let err = Metadata::parse("left-pad", "not json").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MetadataParse { package, .. } if package == "left-pad"
        ));
    }

    #[test]
    fn test_tags_returns_copy() {
        let metadata = sample_metadata();
        let mut tags = metadata.tags();
        assert_eq!(tags.get("latest").map(String::as_str), Some("1.5.0"));

        // Mutating the copy leaves the document untouched
        tags.insert("latest".to_string(), "9.9.9".to_string());
        assert_eq!(
            metadata.tags().get("latest").map(String::as_str),
            Some("1.5.0")
        );
    }

    #[test]
    fn test_tarball_and_shasum_lookup() {
        let metadata = sample_metadata();
        assert_eq!(
            metadata.tarball("1.0.0").unwrap(),
            "https://registry.example.com/left-pad/-/left-pad-1.0.0.tgz"
        );
        assert_eq!(metadata.shasum("1.0.0").unwrap(), "bbb222");
    }

    #[test]
    fn test_version_not_found() {
        let metadata = sample_metadata();
        let err = metadata.tarball("3.0.0").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::VersionNotFound { package, version }
                if package == "left-pad" && version == "3.0.0"
        ));
    }

    #[test]
    fn test_compatible_versions() {
        let metadata = sample_metadata();
        let matching = metadata.compatible_versions(">=1.0.0,<2.0.0").unwrap();
        assert_eq!(matching, vec!["1.0.0".to_string(), "1.5.0".to_string()]);
    }

    #[test]
    fn test_compatible_versions_skips_unparsable_keys() {
        let json = r#"{
            "versions": {
                "1.0.0": {"dist": {"tarball": "https://x/a.tgz", "shasum": "a"}},
                "not-a-version": {"dist": {"tarball": "https://x/b.tgz", "shasum": "b"}}
            }
        }"#;
        let metadata = Metadata::parse("odd", json).unwrap();

        let matching = metadata.compatible_versions(">=0.1.0").unwrap();
        assert_eq!(matching, vec!["1.0.0".to_string()]);
    }

    #[test]
    fn test_compatible_versions_invalid_range() {
        let metadata = sample_metadata();
        let err = metadata.compatible_versions("not a range").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidRange { .. }));
    }

    #[test]
    fn test_versions_iterator() {
        let metadata = sample_metadata();
        let versions: Vec<_> = metadata.versions().collect();
        assert_eq!(versions, vec!["0.9.0", "1.0.0", "1.5.0", "2.0.0"]);
    }
}
