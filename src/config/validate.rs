//! Config validation logic.
//! Verifies the project root exists, canonicalizes configured paths, and
//! creates destination directories on demand.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::BACKUP_DIR_PREFIX;
use super::types::Config;
use crate::errors::ReorgError;

/// Check the project root and make every configured path absolute.
/// Nothing is created here; missing destinations are handled per command.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    ensure_existing_dir(&cfg.project_root, "project_root")?;
    fs::read_dir(&cfg.project_root).with_context(|| {
        format!(
            "Cannot read project_root '{}'; check permissions",
            cfg.project_root.display()
        )
    })?;

    cfg.project_root = dunce::canonicalize(&cfg.project_root)
        .with_context(|| format!("canonicalize '{}'", cfg.project_root.display()))?;
    cfg.output_dir = cfg.output_root();
    cfg.archive_dir = cfg.archive_root();
    cfg.restore_dir = cfg.restore_root();
    cfg.exclude = cfg.excluded_paths();
    if let Some(lf) = cfg.log_file.take() {
        cfg.log_file = Some(cfg.resolve(&lf));
    }

    info!(
        "Config validated: project='{}' output='{}' archive='{}' restore='{}'",
        cfg.project_root.display(),
        cfg.output_dir.display(),
        cfg.archive_dir.display(),
        cfg.restore_dir.display()
    );
    Ok(())
}

/// Fail with a typed error unless `path` exists and is a directory.
pub fn ensure_existing_dir(path: &Path, label: &'static str) -> Result<()> {
    if !path.exists() {
        error!("{label} does not exist: {}", path.display());
        return Err(ReorgError::RootMissing {
            label,
            path: path.to_path_buf(),
        }
        .into());
    }
    if !path.is_dir() {
        error!("{label} is not a directory: {}", path.display());
        return Err(ReorgError::NotADirectory {
            label,
            path: path.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

/// Ensure a destination directory exists (create if missing). If it exists, it must be a directory.
/// In dry-run mode nothing is created.
pub fn ensure_dir(path: &Path, label: &'static str, dry_run: bool) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            error!("{label} exists but isn't a directory: {}", path.display());
            return Err(ReorgError::NotADirectory {
                label,
                path: path.to_path_buf(),
            }
            .into());
        }
        return Ok(());
    }
    if dry_run {
        info!(action = "mkdir -p", path = %path.display(), "dry-run");
        return Ok(());
    }
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create {label} directory '{}'", path.display()))?;
    info!("Created {label} directory: {}", path.display());
    Ok(())
}

/// Backup directories left under the project root by earlier runs.
/// They hold copies of relocated files and must never be searched as sources.
pub fn existing_backup_dirs(project_root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(project_root) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| e.file_name().to_string_lossy().starts_with(BACKUP_DIR_PREFIX))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    debug!(count = dirs.len(), "found earlier backup directories");
    dirs
}
