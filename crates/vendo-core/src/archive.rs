//! Archive extraction for vendored packages
//!
//! Registry tarballs are gzip-compressed tar archives with all package
//! contents nested under a top-level `package/` directory. Extraction
//! validates every entry path before writing anything, and installs go
//! through a scratch directory so a bad archive never clobbers a
//! previously good install.

use std::fs::File;
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use tar::Archive;
use tempfile::TempDir;

use crate::error::{CoreError, Result};

/// Directory registry tarballs nest their contents under
const PACKAGE_ROOT: &str = "package";

/// Extract a gzip-tar archive into a destination directory
///
/// Every entry name is validated before the first write; an absolute
/// name or one containing `..` fails the whole extraction with
/// `PathTraversal` and leaves the destination untouched.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<()> {
    validate_entries(archive_path)?;

    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);

    std::fs::create_dir_all(dest)?;
    archive.unpack(dest)?;

    Ok(())
}

/// Install a package archive into its final directory
///
/// The archive is extracted to a scratch directory first; only then is
/// any previous install removed and the archive's inner `package/`
/// directory moved into place, so a half-extracted archive can never
/// replace a good install. The scratch directory is removed on every
/// exit path.
pub fn install(archive_path: &Path, install_dir: &Path) -> Result<()> {
    let scratch = TempDir::new()?;
    extract(archive_path, scratch.path())?;

    let unpacked = scratch.path().join(PACKAGE_ROOT);
    if !unpacked.is_dir() {
        return Err(CoreError::Archive {
            message: format!(
                "no {}/ directory in {}",
                PACKAGE_ROOT,
                archive_path.display()
            ),
        });
    }

    if install_dir.exists() {
        std::fs::remove_dir_all(install_dir)?;
    }
    if let Some(parent) = install_dir.parent() {
        std::fs::create_dir_all(parent)?;
    }
    move_dir(&unpacked, install_dir)?;

    Ok(())
}

/// Check every entry name of an archive before anything is written
///
/// Rejects absolute names and any name containing `..`, even one that
/// would resolve back inside the destination: `unpack` skips such
/// entries silently instead of writing them.
fn validate_entries(archive_path: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let decoder = GzDecoder::new(file);
    let mut archive = Archive::new(decoder);

    for entry in archive.entries()? {
        let entry = entry?;
        let name = entry.path()?.into_owned();
        let contained = name
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !contained {
            return Err(CoreError::PathTraversal {
                entry: name.display().to_string(),
            });
        }
    }

    Ok(())
}

/// Move a directory, copying when the rename crosses filesystems
/// (scratch directories often live on a different mount)
fn move_dir(src: &Path, dest: &Path) -> Result<()> {
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            copy_dir(src, dest)?;
            std::fs::remove_dir_all(src)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, Header};
    use tempfile::TempDir;

    fn write_archive(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(encoder);

        for (name, content) in entries {
            let mut header = Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_mtime(0);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }

        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap();
    }

    /// `Builder` refuses to encode `..` in entry names, so archives for
    /// the traversal tests fill in the header name bytes directly.
    fn write_hostile_archive(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(encoder);

        for (name, content) in entries {
            let mut header = Header::new_gnu();
            header.as_old_mut().name[..name.len()].copy_from_slice(name.as_bytes());
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_mtime(0);
            header.set_cksum();
            builder.append(&header, content.as_bytes()).unwrap();
        }

        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_extract_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("left-pad-1.0.0.tgz");
        write_archive(
            &archive,
            &[
                ("package/package.json", r#"{"name": "left-pad"}"#),
                ("package/index.js", "module.exports = leftPad;"),
            ],
        );

        let dest = temp.path().join("unpack");
        extract(&archive, &dest).unwrap();

        assert!(dest.join("package/package.json").exists());
        let content = std::fs::read_to_string(dest.join("package/index.js")).unwrap();
        assert_eq!(content, "module.exports = leftPad;");
    }

    #[test]
    fn test_extract_rejects_parent_escape() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.tgz");
        write_hostile_archive(
            &archive,
            &[
                ("package/index.js", "module.exports = {};"),
                ("../../escape.txt", "boo"),
            ],
        );

        let dest = temp.path().join("unpack");
        let err = extract(&archive, &dest).unwrap_err();

        assert!(matches!(err, CoreError::PathTraversal { .. }));
        // Nothing may be written, not even the benign entry
        assert!(!dest.exists());
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[test]
    fn test_extract_rejects_escape_via_nested_parents() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.tgz");
        write_hostile_archive(&archive, &[("a/../../etc/passwd", "root")]);

        let dest = temp.path().join("unpack");
        let err = extract(&archive, &dest).unwrap_err();

        assert!(matches!(err, CoreError::PathTraversal { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_extract_rejects_parent_components_inside_destination() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.tgz");
        write_hostile_archive(
            &archive,
            &[("package/../package/index.js", "module.exports = {};")],
        );

        let dest = temp.path().join("unpack");
        // The name folds back inside the destination, but unpack would
        // skip it; extraction must fail, not quietly drop the entry
        let err = extract(&archive, &dest).unwrap_err();

        assert!(matches!(err, CoreError::PathTraversal { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_extract_rejects_absolute_entry() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.tgz");
        write_hostile_archive(&archive, &[("/escape.txt", "boo")]);

        let dest = temp.path().join("unpack");
        let err = extract(&archive, &dest).unwrap_err();

        assert!(matches!(err, CoreError::PathTraversal { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_install_flattens_package_dir() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("left-pad-1.0.0.tgz");
        write_archive(
            &archive,
            &[
                ("package/package.json", r#"{"name": "left-pad"}"#),
                ("package/index.js", "module.exports = leftPad;"),
                ("package/lib/util.js", "exports.pad = pad;"),
            ],
        );

        let install_dir = temp.path().join("vendor").join("left-pad");
        install(&archive, &install_dir).unwrap();

        assert!(install_dir.join("package.json").exists());
        assert!(install_dir.join("index.js").exists());
        assert!(install_dir.join("lib/util.js").exists());
        assert!(!install_dir.join("package").exists());
    }

    #[test]
    fn test_install_replaces_existing_install() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("left-pad-1.0.0.tgz");
        write_archive(&archive, &[("package/index.js", "module.exports = leftPad;")]);

        let install_dir = temp.path().join("vendor").join("left-pad");
        std::fs::create_dir_all(&install_dir).unwrap();
        std::fs::write(install_dir.join("stale.js"), "old").unwrap();

        install(&archive, &install_dir).unwrap();

        assert!(install_dir.join("index.js").exists());
        assert!(!install_dir.join("stale.js").exists());
    }

    #[test]
    fn test_install_requires_package_dir() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("flat.tgz");
        write_archive(&archive, &[("index.js", "module.exports = {};")]);

        let install_dir = temp.path().join("vendor").join("flat");
        let err = install(&archive, &install_dir).unwrap_err();

        assert!(matches!(err, CoreError::Archive { .. }));
        assert!(!install_dir.exists());
    }
}
