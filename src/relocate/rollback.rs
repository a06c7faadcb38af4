//! Rollback: restore archived files into a flat target directory.
//!
//! Copy-only. The archive is never modified, so it stays the source of truth
//! after a rollback. A filename that already exists in the target is skipped
//! (`AlreadyPresent`), never overwritten. Items are keyed by their path
//! relative to the archive root, so same-named files in different archive
//! subdirectories are both reported; the second one is skipped.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use super::{log_outcome, ItemOutcome, ItemStatus, RelocationItem, RunReport};
use crate::config::ensure_existing_dir;
use crate::fs_ops::{self, is_vcs_dir, TEMP_PREFIX};
use crate::scaffold::ARCHIVE_README;
use crate::shutdown;

/// Every regular file under `archive_root`, sorted by path. The generated
/// archive README at the top level and transient temp files are left out.
fn archived_files(archive_root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(archive_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_vcs_dir(e.file_name())));
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable archive entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with(TEMP_PREFIX) || (entry.depth() == 1 && name == ARCHIVE_README) {
            continue;
        }
        files.push(entry.into_path());
    }
    files
}

/// Restore every archived file into `target_root`. Returns the per-file report.
pub fn restore_archive(archive_root: &Path, target_root: &Path, dry_run: bool) -> Result<RunReport> {
    ensure_existing_dir(archive_root, "archive_root")?;
    if !target_root.exists() {
        if dry_run {
            info!(target = %target_root.display(), "dry-run: restore target would be created");
        } else {
            fs::create_dir_all(target_root).with_context(|| {
                format!("create restore directory '{}'", target_root.display())
            })?;
            info!(target = %target_root.display(), "Created restore directory");
        }
    }

    let files = archived_files(archive_root);
    info!(
        archive = %archive_root.display(),
        target = %target_root.display(),
        files = files.len(),
        dry_run,
        "Starting rollback"
    );

    let mut report = RunReport::new();
    // Names a dry run would have restored, so later same-named files report as skipped.
    let mut planned: HashSet<String> = HashSet::new();

    for src in files {
        if shutdown::is_requested() {
            warn!("interrupt received; stopping rollback");
            report.interrupted = true;
            break;
        }
        let key = src
            .strip_prefix(archive_root)
            .unwrap_or(&src)
            .to_string_lossy()
            .replace('\\', "/");
        let Some(name) = src.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let dest = target_root.join(&name);

        let mut item = RelocationItem::named(key);
        item.candidates = 1;
        item.size_bytes = fs::metadata(&src).ok().map(|m| m.len());
        item.source_path = Some(src.clone());

        let status = if dest.symlink_metadata().is_ok() || planned.contains(&name) {
            ItemStatus::AlreadyPresent
        } else if dry_run {
            planned.insert(name);
            ItemStatus::WouldCopy
        } else {
            match fs_ops::copy_file(&src, &dest, true) {
                Ok(_) => ItemStatus::Copied,
                Err(e) => ItemStatus::Failed(format!("{e:#}")),
            }
        };

        let outcome = ItemOutcome::new(item, status, Some(dest));
        log_outcome(&outcome);
        report.record(outcome);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn write(p: &Path, data: &[u8]) {
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, data).unwrap();
    }

    #[test]
    #[serial]
    fn restores_flat_and_skips_existing() {
        let td = tempdir().unwrap();
        let archive = td.path().join("archive");
        let target = td.path().join("training-scripts");
        write(&archive.join("training/train_fasttext_turkic.py"), b"ft");
        write(&archive.join("utilities/latin_to_cyrillic_turkic.py"), b"l2c");
        write(&archive.join(ARCHIVE_README), b"readme");
        write(&target.join("latin_to_cyrillic_turkic.py"), b"newer");

        let report = restore_archive(&archive, &target, false).unwrap();
        assert_eq!(report.copied_count(), 1);
        assert_eq!(report.already_present_count(), 1);
        assert_eq!(report.len(), 2, "README is not restored");
        assert_eq!(fs::read(target.join("train_fasttext_turkic.py")).unwrap(), b"ft");
        assert_eq!(fs::read(target.join("latin_to_cyrillic_turkic.py")).unwrap(), b"newer");
        assert!(archive.join("training/train_fasttext_turkic.py").exists());
    }

    #[test]
    #[serial]
    fn same_name_in_two_groups_reports_both() {
        let td = tempdir().unwrap();
        let archive = td.path().join("archive");
        let target = td.path().join("restore");
        write(&archive.join("a/dup.py"), b"first");
        write(&archive.join("b/dup.py"), b"second");

        for dry_run in [true, false] {
            let report = restore_archive(&archive, &target, dry_run).unwrap();
            assert_eq!(report.len(), 2);
            assert_eq!(report.already_present_count(), 1);
            if !dry_run {
                assert_eq!(report.status_of("a/dup.py"), Some(&ItemStatus::Copied));
                assert_eq!(fs::read(target.join("dup.py")).unwrap(), b"first");
            } else {
                assert_eq!(report.status_of("a/dup.py"), Some(&ItemStatus::WouldCopy));
                assert!(!target.exists());
            }
        }
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn unwritable_target_fails_items_and_keeps_archive() {
        use std::os::unix::fs::PermissionsExt;
        if unsafe { libc::geteuid() } == 0 {
            eprintln!("skipping: running as root");
            return;
        }
        let td = tempdir().unwrap();
        let archive = td.path().join("archive");
        let target = td.path().join("restore");
        write(&archive.join("training/a.py"), b"a");
        fs::create_dir_all(&target).unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o555)).unwrap();

        let report = restore_archive(&archive, &target, false);
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

        let report = report.unwrap();
        assert_eq!(report.failed_count(), 1);
        assert!(matches!(report.status_of("training/a.py"), Some(ItemStatus::Failed(_))));
        assert!(!target.join("a.py").exists());
        assert_eq!(fs::read(archive.join("training/a.py")).unwrap(), b"a");
    }

    #[test]
    #[serial]
    fn missing_archive_is_fatal() {
        let td = tempdir().unwrap();
        let err = restore_archive(&td.path().join("archive"), td.path(), false).unwrap_err();
        assert!(err.to_string().contains("archive_root does not exist"));
    }
}
