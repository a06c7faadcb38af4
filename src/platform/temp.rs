//! Unique hidden sibling names for atomic write-then-rename.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix shared by every transient file reorg writes next to a target.
pub const TEMP_PREFIX: &str = ".reorg.";

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Pattern: `.reorg.<tag>.<pid>.<nanos>.<seq>.tmp` next to `target`.
pub fn tmp_sibling_name(target: &Path, tag: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!("{TEMP_PREFIX}{tag}.{pid}.{nanos}.{seq}.tmp");
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}
