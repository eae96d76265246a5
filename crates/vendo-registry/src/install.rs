//! Install pipeline
//!
//! Installs run in three sequential phases over the whole package list:
//! metadata first, then archive downloads, then extraction into the
//! vendor location. A failure in the download phase aborts before any
//! existing install is touched, so a bad checksum never leaves the
//! vendor directory half replaced.

use std::path::Path;

use vendo_core::{PackageSpec, checksum};

use crate::client::RegistryClient;
use crate::error::{RegistryError, Result};

/// Pipeline phase, reported to observers as the run progresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fetching metadata documents
    Metadata,
    /// Downloading and verifying archives
    Fetch,
    /// Extracting archives into the vendor location
    Install,
}

/// Progress callbacks for an install run
///
/// All methods default to no-ops; implement the ones you care about.
pub trait InstallObserver {
    /// A phase is beginning
    fn phase_started(&self, _phase: Phase) {}

    /// One package finished the given phase
    fn package_done(&self, _phase: Phase, _spec: &PackageSpec) {}
}

/// Observer that reports nothing
pub struct SilentObserver;

impl InstallObserver for SilentObserver {}

/// Runs the install pipeline against one registry client
pub struct Installer<'a> {
    client: &'a RegistryClient,
}

impl<'a> Installer<'a> {
    pub fn new(client: &'a RegistryClient) -> Self {
        Self { client }
    }

    /// Install every package into `location_dir`
    ///
    /// Each package lands at `{location_dir}/{package}`, replacing any
    /// previous install of the same package. Archives are verified
    /// against the pinned shasum from the vendor file before anything
    /// under `location_dir` is modified; a mismatch anywhere aborts the
    /// whole run.
    pub async fn run(
        &self,
        packages: &[PackageSpec],
        location_dir: &Path,
        refresh: bool,
        observer: &dyn InstallObserver,
    ) -> Result<()> {
        observer.phase_started(Phase::Metadata);
        for spec in packages {
            self.client.get_metadata(&spec.package, refresh).await?;
            observer.package_done(Phase::Metadata, spec);
        }

        observer.phase_started(Phase::Fetch);
        let mut archives = Vec::with_capacity(packages.len());
        for spec in packages {
            let archive = self
                .client
                .get_archive(&spec.package, &spec.version, refresh)
                .await?;

            if !self.client.checksum(&archive, &spec.shasum)? {
                let data = std::fs::read(&archive)?;
                return Err(RegistryError::ChecksumMismatch {
                    package: spec.package.clone(),
                    version: spec.version.clone(),
                    expected: spec.shasum.clone(),
                    actual: checksum::sha1_hex(&data),
                });
            }

            archives.push(archive);
            observer.package_done(Phase::Fetch, spec);
        }

        observer.phase_started(Phase::Install);
        std::fs::create_dir_all(location_dir)?;
        for (spec, archive) in packages.iter().zip(&archives) {
            let install_dir = location_dir.join(&spec.package);
            vendo_core::archive::install(archive, &install_dir)?;
            observer.package_done(Phase::Install, spec);
        }

        Ok(())
    }
}
