//! Install command - download and install the vendored packages

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use console::style;
use dialoguer::Confirm;
use vendo_core::{PackageSpec, VendorFile};
use vendo_registry::{InstallObserver, Installer, Phase, RegistryClient};

use crate::error::{CliError, Result};

/// Vendor files tried, in order, when none is named
const DEFAULT_VENDOR_FILES: &[&str] = &["vendor.json", "vendor.yaml", "vendor.yml"];

/// Run the install command
pub async fn run(vendor_file: Option<&Path>, yes: bool, refresh: bool) -> Result<()> {
    let vendor_path = resolve_vendor_file(vendor_file)?;
    tracing::debug!("using vendor file {}", vendor_path.display());

    let manifest = VendorFile::load(&vendor_path).map_err(CliError::from_core)?;

    // Directories in the vendor file resolve against the working directory
    let base = std::env::current_dir()?;
    let location_dir = manifest.location_dir(&base);
    let metadata_dir = manifest.metadata_dir(&base);

    if !yes && !confirm_overwrite(&location_dir)? {
        println!("{}", style("Install aborted").red());
        return Ok(());
    }

    let client = RegistryClient::new(&metadata_dir, manifest.registry.as_deref())
        .map_err(CliError::from_registry)?;

    println!(
        "{} Installing {} package(s) from {}",
        style("→").blue().bold(),
        style(manifest.packages.len()).yellow(),
        style(client.registry().as_str()).cyan()
    );

    Installer::new(&client)
        .run(&manifest.packages, &location_dir, refresh, &ConsoleObserver)
        .await
        .map_err(CliError::from_registry)?;

    println!(
        "{} Installed {} package(s) into {}",
        style("✓").green().bold(),
        style(manifest.packages.len()).yellow(),
        style(location_dir.display()).cyan()
    );

    Ok(())
}

/// Locate the vendor file: explicit flag, then VENDORFILE, then defaults
fn resolve_vendor_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(CliError::config(format!(
            "Could not find vendor file: {}",
            path.display()
        )));
    }

    // An empty VENDORFILE counts as unset
    if let Some(name) = std::env::var_os("VENDORFILE").filter(|v| !v.is_empty()) {
        let path = PathBuf::from(name);
        if path.exists() {
            return Ok(path);
        }
        return Err(CliError::config_with_help(
            format!("Could not find vendor file: {}", path.display()),
            "the VENDORFILE environment variable names a file that does not exist",
        ));
    }

    for name in DEFAULT_VENDOR_FILES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(CliError::config_with_help(
        format!(
            "Could not find vendor file: tried {}",
            DEFAULT_VENDOR_FILES.join(", ")
        ),
        "create a vendor.json or pass --vendor-file",
    ))
}

/// Warn that the install location will be overwritten and ask to proceed
fn confirm_overwrite(location_dir: &Path) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::config_with_help(
            "Confirmation required but no terminal is attached",
            "pass --yes to skip the prompt",
        ));
    }

    println!("Proceeding may erase files in {}.", location_dir.display());
    Confirm::new()
        .with_prompt("Are you sure you want to do this?")
        .default(false)
        .interact()
        .map_err(|e| CliError::internal(e.to_string()))
}

/// Observer printing one styled line per phase and package
struct ConsoleObserver;

impl InstallObserver for ConsoleObserver {
    fn phase_started(&self, phase: Phase) {
        let label = match phase {
            Phase::Metadata => "Resolving metadata",
            Phase::Fetch => "Fetching archives",
            Phase::Install => "Installing packages",
        };
        println!("{} {}", style("→").blue().bold(), style(label).cyan().bold());
    }

    fn package_done(&self, phase: Phase, spec: &PackageSpec) {
        let verb = match phase {
            Phase::Metadata => "resolved",
            Phase::Fetch => "fetched",
            Phase::Install => "installed",
        };
        println!(
            "  {} {} {}@{}",
            style("✓").green(),
            verb,
            style(&spec.package).cyan(),
            style(&spec.version).yellow()
        );
    }
}
