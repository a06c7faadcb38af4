//! Per-item transfers used by the relocation engine.
//! - `move_file`: atomic rename; on a cross-filesystem error, safe copy then delete
//!   the original. Between the copy landing and the delete, both files exist.
//! - `copy_file`: safe copy; the original is untouched.
//! Neither function replaces an existing destination.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::atomic::rename_synced;
use super::copy::safe_copy_with_metadata;
use super::helpers::io_error_with_help;
use super::space::ensure_space_for_copy;
use super::util::is_cross_device;

/// How a file reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Same-filesystem rename
    Renamed,
    /// Cross-filesystem: copied, then the original removed
    CopiedAndRemoved,
    /// Copy mode; original kept
    Copied,
}

fn refuse_existing(dest: &Path) -> Result<()> {
    if dest.symlink_metadata().is_ok() {
        bail!("destination already exists: {}", dest.display());
    }
    Ok(())
}

/// Last step of a cross-filesystem move. On failure the error says the copy landed.
fn remove_original(src: &Path, dest: &Path) -> Result<()> {
    fs::remove_file(src)
        .map_err(io_error_with_help("remove original file", src))
        .with_context(|| {
            format!(
                "destination copy written to '{}' but the original could not be removed",
                dest.display()
            )
        })
}

fn dest_dir(dest: &Path) -> &Path {
    dest.parent().unwrap_or_else(|| Path::new("."))
}

/// Move `src` to `dest`.
pub fn move_file(src: &Path, dest: &Path, preserve_metadata: bool) -> Result<TransferKind> {
    refuse_existing(dest)?;

    match rename_synced(src, dest) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dest.display(), "Renamed file atomically");
            Ok(TransferKind::Renamed)
        }
        Err(e) if is_cross_device(&e) => {
            warn!(
                src = %src.display(),
                dest = %dest.display(),
                "cross-filesystem move; copying then removing original (both exist until removal)"
            );
            let len = fs::metadata(src)
                .map_err(io_error_with_help("stat source", src))?
                .len();
            ensure_space_for_copy(dest_dir(dest), len)?;
            safe_copy_with_metadata(src, dest, preserve_metadata)?;
            remove_original(src, dest)?;
            Ok(TransferKind::CopiedAndRemoved)
        }
        Err(e) => Err(io_error_with_help("rename", src)(e)),
    }
}

/// Copy `src` to `dest`, keeping the original.
pub fn copy_file(src: &Path, dest: &Path, preserve_metadata: bool) -> Result<TransferKind> {
    refuse_existing(dest)?;
    let len = fs::metadata(src)
        .map_err(io_error_with_help("stat source", src))?
        .len();
    ensure_space_for_copy(dest_dir(dest), len)?;
    safe_copy_with_metadata(src, dest, preserve_metadata)?;
    info!(src = %src.display(), dest = %dest.display(), bytes = len, "Copied file");
    Ok(TransferKind::Copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn move_removes_source() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let out = td.path().join("output");
        fs::create_dir(&out).unwrap();
        fs::write(&src, b"payload").unwrap();

        let kind = move_file(&src, &out.join("a.txt"), false).unwrap();
        assert_eq!(kind, TransferKind::Renamed);
        assert!(!src.exists());
        assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"payload");
    }

    #[test]
    fn copy_keeps_source() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let out = td.path().join("output");
        fs::create_dir(&out).unwrap();
        fs::write(&src, b"payload").unwrap();

        let kind = copy_file(&src, &out.join("a.txt"), true).unwrap();
        assert_eq!(kind, TransferKind::Copied);
        assert!(src.exists());
        assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"payload");
    }

    #[test]
    fn existing_destination_is_never_replaced() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dest = td.path().join("b.txt");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        assert!(move_file(&src, &dest, false).is_err());
        assert!(copy_file(&src, &dest, false).is_err());
        assert!(src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn failed_removal_mentions_the_written_copy() {
        let td = tempdir().unwrap();
        let dest = td.path().join("output/a.txt");
        let err = remove_original(&td.path().join("a.txt"), &dest).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("destination copy written to"), "{msg}");
        assert!(msg.contains(&dest.display().to_string()), "{msg}");
        assert!(msg.contains("remove original file"), "{msg}");
    }

    #[test]
    fn move_of_missing_source_fails() {
        let td = tempdir().unwrap();
        let err = move_file(&td.path().join("gone"), &td.path().join("x"), false).unwrap_err();
        assert!(err.to_string().contains("rename"));
    }
}
