//! Pre-mutation snapshots.
//! A file is copied into the run's backup directory before it is moved, so the
//! original bytes survive even if the move goes wrong.

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::copy::safe_copy_with_metadata;
use super::helpers::io_error_with_help;
use super::space::ensure_space_for_copy;

/// Copy `src` to `backup_dir/name` (creating the directory) and verify the length.
pub fn snapshot(src: &Path, backup_dir: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(backup_dir)
        .map_err(io_error_with_help("create backup directory", backup_dir))?;
    let dest = backup_dir.join(name);
    if dest.symlink_metadata().is_ok() {
        bail!("backup already exists: {}", dest.display());
    }

    let expected = fs::metadata(src)
        .map_err(io_error_with_help("stat source", src))?
        .len();
    ensure_space_for_copy(backup_dir, expected)?;
    let copied = safe_copy_with_metadata(src, &dest, true)?;
    if copied != expected {
        let _ = fs::remove_file(&dest);
        bail!(
            "backup of '{}' is incomplete: copied {} of {} bytes",
            src.display(),
            copied,
            expected
        );
    }
    info!(src = %src.display(), backup = %dest.display(), bytes = copied, "Backed up file");
    Ok(dest)
}
