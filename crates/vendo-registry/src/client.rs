//! Registry HTTP client with on-disk caching
//!
//! Every fetch lands in the metadata directory before it is used:
//! metadata documents as `{package}.json`, archives under `archives/`
//! named after the last segment of their tarball URL. Cached files are
//! reused on later runs unless the caller asks for a refresh.

use std::path::{Path, PathBuf};

use reqwest::header::CONTENT_TYPE;
use url::Url;

use vendo_core::checksum;

use crate::error::{RegistryError, Result};
use crate::metadata::Metadata;

/// Registry queried when a vendor file does not name one
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.com";

/// HTTP client for one registry, caching everything it downloads
#[derive(Debug)]
pub struct RegistryClient {
    /// Cache directory for metadata documents
    metadata_dir: PathBuf,
    /// Cache directory for downloaded archives
    archives_dir: PathBuf,
    /// Base URL requests are joined against
    registry: Url,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client caching under `metadata_dir`
    ///
    /// Falls back to [`DEFAULT_REGISTRY`] when no registry is given.
    /// Cache directories are created lazily on first download.
    pub fn new(metadata_dir: impl Into<PathBuf>, registry: Option<&str>) -> Result<Self> {
        let metadata_dir = std::path::absolute(metadata_dir.into())?;
        let archives_dir = metadata_dir.join("archives");

        let registry = registry.unwrap_or(DEFAULT_REGISTRY);
        let registry = Url::parse(registry).map_err(|e| RegistryError::InvalidUrl {
            url: registry.to_string(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| RegistryError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            metadata_dir,
            archives_dir,
            registry,
            http,
        })
    }

    /// The registry base URL
    pub fn registry(&self) -> &Url {
        &self.registry
    }

    /// Where metadata documents are cached
    pub fn metadata_dir(&self) -> &Path {
        &self.metadata_dir
    }

    /// Where downloaded archives are cached
    pub fn archives_dir(&self) -> &Path {
        &self.archives_dir
    }

    /// Fetch the metadata document for a package
    ///
    /// The document is served from `{metadata_dir}/{package}.json` when
    /// present; `refresh` forces a re-download. Either way the returned
    /// value is parsed from the cache file, so what callers see is
    /// exactly what later runs will read back.
    pub async fn get_metadata(&self, package: &str, refresh: bool) -> Result<Metadata> {
        let path = self.metadata_dir.join(format!("{package}.json"));

        if refresh || !path.exists() {
            let url = self.registry.join(package)?;
            tracing::debug!("fetching metadata for {package} from {url}");
            self.download(url, &path).await?;
        }

        let content = std::fs::read_to_string(&path)?;
        Metadata::parse(package, &content)
    }

    /// Fetch the archive for a package version, verified against the
    /// registry's declared shasum
    ///
    /// Returns the path of the cached archive. A cached file is reused
    /// unless `refresh` is set, but the shasum check runs on every call.
    pub async fn get_archive(
        &self,
        package: &str,
        version: &str,
        refresh: bool,
    ) -> Result<PathBuf> {
        let metadata = self.get_metadata(package, refresh).await?;
        let tarball = metadata.tarball(version)?;

        let url = Url::parse(tarball).map_err(|e| RegistryError::InvalidUrl {
            url: tarball.to_string(),
            reason: e.to_string(),
        })?;
        let path = self.archives_dir.join(archive_filename(&url)?);

        if refresh || !path.exists() {
            tracing::debug!("fetching archive for {package}@{version} from {url}");
            self.download(url, &path).await?;
        }

        let data = std::fs::read(&path)?;
        let expected = metadata.shasum(version)?;
        if !checksum::verify(&data, expected) {
            return Err(RegistryError::ChecksumMismatch {
                package: package.to_string(),
                version: version.to_string(),
                expected: expected.to_string(),
                actual: checksum::sha1_hex(&data),
            });
        }

        Ok(path)
    }

    /// Check a cached archive against a hex SHA-1 digest
    pub fn checksum(&self, archive: &Path, shasum: &str) -> Result<bool> {
        let data = std::fs::read(archive)?;
        Ok(checksum::verify(&data, shasum))
    }

    /// Download a URL into the cache, creating parent directories
    async fn download(&self, url: Url, path: &Path) -> Result<()> {
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Responses that declare a charset are decoded to text before
        // they are persisted; anything else is written byte for byte.
        if declares_charset(&response) {
            let text = response.text().await?;
            std::fs::write(path, text)?;
        } else {
            let bytes = response.bytes().await?;
            std::fs::write(path, bytes)?;
        }

        Ok(())
    }
}

/// Charset declared in the Content-Type header?
fn declares_charset(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("charset="))
}

/// Cache filename for a tarball URL (its last path segment)
fn archive_filename(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RegistryError::InvalidUrl {
            url: url.to_string(),
            reason: "tarball URL has no filename".to_string(),
        })
}
