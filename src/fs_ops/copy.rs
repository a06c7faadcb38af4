//! Safe copy-and-rename:
//! - Copies to a temp file in the destination directory (fsynced by io_copy)
//! - Refuses to replace an existing destination
//! - Renames temp -> dest and syncs the destination directory
//! - Removes the temp file on any failure

use anyhow::{anyhow, bail, Result};
use std::fs;
use std::path::Path;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help;
use super::{io_copy, meta};
use crate::platform::tmp_sibling_name;

/// Copy `src` to `dest` via a temp sibling. Returns bytes copied.
pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<u64> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
    fs::create_dir_all(dest_dir)
        .map_err(io_error_with_help("create destination directory", dest_dir))?;

    let tmp_path = tmp_sibling_name(dest, "copy");
    let bytes = io_copy::copy_streaming(src, &tmp_path)
        .map_err(io_error_with_help("copy to temporary file", &tmp_path));
    let bytes = match bytes {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    if dest.exists() {
        let _ = fs::remove_file(&tmp_path);
        bail!("destination appeared during copy: {}", dest.display());
    }
    if let Err(e) = try_atomic_move(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(bytes)
}

/// Safe copy, then copy permissions/timestamps from `src` when requested.
pub fn safe_copy_with_metadata(src: &Path, dest: &Path, preserve: bool) -> Result<u64> {
    let src_meta = fs::metadata(src).map_err(io_error_with_help("stat source", src))?;
    let bytes = safe_copy_and_rename(src, dest)?;
    if preserve {
        meta::preserve_metadata(dest, &src_meta);
    }
    Ok(bytes)
}
