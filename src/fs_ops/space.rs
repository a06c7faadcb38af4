//! Free-space checks before copies, and human-readable byte formatting.

use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::errors::ReorgError;
use crate::platform::free_space_bytes;

/// Headroom kept free on the destination filesystem.
const CUSHION: u64 = 4 * 1024 * 1024;

pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Fail with `InsufficientSpace` when `dst_dir` cannot hold `required` more bytes.
/// If free space cannot be queried the copy proceeds and any ENOSPC surfaces from the write.
pub fn ensure_space_for_copy(dst_dir: &Path, required: u64) -> Result<()> {
    let available = match free_space_bytes(dst_dir) {
        Ok(n) => n,
        Err(e) => {
            debug!(dir = %dst_dir.display(), error = %e, "free-space query failed; skipping check");
            return Ok(());
        }
    };
    if available < required.saturating_add(CUSHION) {
        return Err(ReorgError::InsufficientSpace {
            required,
            available,
            dest: dst_dir.to_path_buf(),
        }
        .into());
    }
    Ok(())
}
