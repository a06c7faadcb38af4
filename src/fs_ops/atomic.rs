//! Rename helpers.
//! - `try_atomic_move` renames with context-rich errors and syncs the destination directory.
//! - `write_atomic` publishes generated text files (temp + fsync + rename).

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::util::fsync_dir;
use crate::platform::tmp_sibling_name;

/// Rename `src` to `dst`. The underlying io::Error stays reachable through the
/// anyhow chain so callers can detect EXDEV.
pub fn try_atomic_move(src: &Path, dst: &Path) -> Result<()> {
    rename_synced(src, dst)
        .with_context(|| format!("atomic rename '{}' -> '{}'", src.display(), dst.display()))
}

/// Plain io::Result rename + best-effort parent fsync (Unix).
pub(super) fn rename_synced(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)?;
    if let Some(parent) = dst.parent() {
        // A failed directory fsync must not turn a completed rename into a failure.
        let _ = fsync_dir(parent);
    }
    Ok(())
}

/// Write `contents` to `path` through a temp sibling so readers never see a partial file.
/// Replaces an existing file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if path.parent().is_none() {
        return Err(anyhow!("path has no parent: {}", path.display()));
    }
    let tmp = tmp_sibling_name(path, "write");
    let res = (|| -> io::Result<()> {
        let mut f = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
        f.write_all(contents)?;
        f.sync_all()?;
        drop(f);
        rename_synced(&tmp, path)
    })();
    if let Err(e) = res {
        let _ = fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("write '{}'", path.display()));
    }
    Ok(())
}
