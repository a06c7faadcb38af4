//! Relocation engine.
//!
//! Given a list of bare filenames, a source root and a destination root, the
//! engine finds each file under the source root and moves (or copies) it to
//! `dest_root/<name>`, optionally snapshotting it into a backup directory first.
//!
//! Per item, in input order:
//! 1. already at `dest_root/<name>` -> `AlreadyPresent` (this is what makes reruns no-ops)
//! 2. not found under `source_root` -> `NotFound`
//! 3. dry-run -> `WouldMove` / `WouldCopy`
//! 4. backup (if enabled), then move/copy -> `Moved` / `Copied`, or `Failed`
//!
//! Per-item errors never stop the run. Only missing roots (checked once, up
//! front) and an interrupt end it early.

pub mod report;
pub mod rollback;

use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ensure_existing_dir;
use crate::errors::ReorgError;
use crate::fs_ops::{self, SourceIndex};
use crate::shutdown;

pub use report::{ItemOutcome, ItemStatus, RunReport};

/// Settings for one engine run. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Report only; touch nothing
    pub dry_run: bool,
    /// Copy instead of move
    pub copy_mode: bool,
    /// Snapshot each source into `backup_dir` before mutating
    pub backup: bool,
    /// Copy permissions and timestamps when a copy is made
    pub preserve_metadata: bool,
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    /// Subtrees of `source_root` never searched (dest and backup dirs are always added)
    pub excluded_paths: Vec<PathBuf>,
    /// Required when `backup` is set
    pub backup_dir: Option<PathBuf>,
}

impl RunConfig {
    /// A move run from `source_root` into `dest_root`; flags off.
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            dry_run: false,
            copy_mode: false,
            backup: false,
            preserve_metadata: false,
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            excluded_paths: Vec::new(),
            backup_dir: None,
        }
    }
}

/// A requested name and what the engine learned about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationItem {
    pub name: String,
    /// The file chosen under the source root
    pub source_path: Option<PathBuf>,
    pub size_bytes: Option<u64>,
    /// Number of same-named files found under the source root
    pub candidates: usize,
}

impl RelocationItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_path: None,
            size_bytes: None,
            candidates: 0,
        }
    }
}

/// Accept only a single normal path component: no separators, no `.`/`..`.
pub fn validate_name(name: &str) -> Result<(), ReorgError> {
    let invalid = || ReorgError::InvalidName(name.to_string());
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(invalid());
    }
    let mut comps = Path::new(name).components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(c)), None) if c == name => Ok(()),
        _ => Err(invalid()),
    }
}

/// Canonicalize if the path exists; otherwise keep it as given.
fn normalized(p: &Path) -> PathBuf {
    dunce::canonicalize(p).unwrap_or_else(|_| p.to_path_buf())
}

pub struct Relocator {
    cfg: RunConfig,
}

impl Relocator {
    pub fn new(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    /// Check the roots once, before any item is touched.
    /// A missing destination is tolerated in dry-run mode (it would be created).
    fn verify_roots(&self) -> Result<(PathBuf, PathBuf)> {
        ensure_existing_dir(&self.cfg.source_root, "source_root")?;
        if self.cfg.dry_run && !self.cfg.dest_root.exists() {
            info!(dest = %self.cfg.dest_root.display(), "dry-run: destination does not exist yet");
        } else {
            ensure_existing_dir(&self.cfg.dest_root, "dest_root")?;
        }

        let source = normalized(&self.cfg.source_root);
        let dest = normalized(&self.cfg.dest_root);
        if source == dest {
            bail!(
                "source_root and dest_root resolve to the same path: '{}'",
                source.display()
            );
        }
        if source.starts_with(&dest) {
            bail!(
                "source_root '{}' must not be inside dest_root '{}'",
                source.display(),
                dest.display()
            );
        }
        if self.cfg.backup && self.cfg.backup_dir.is_none() {
            bail!("backup requested but no backup directory configured");
        }
        Ok((source, dest))
    }

    /// Process `names` in order and return the report.
    pub fn run<S: AsRef<str>>(&self, names: &[S]) -> Result<RunReport> {
        let (source_root, dest_root) = self.verify_roots()?;

        let mut excluded: Vec<PathBuf> = self.cfg.excluded_paths.iter().map(|p| normalized(p)).collect();
        excluded.push(dest_root.clone());
        if let Some(b) = &self.cfg.backup_dir {
            excluded.push(normalized(b));
        }

        let wanted: HashSet<&str> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|n| validate_name(n).is_ok())
            .collect();
        let index = SourceIndex::build(&source_root, &wanted, &excluded);

        info!(
            source = %source_root.display(),
            dest = %dest_root.display(),
            items = names.len(),
            dry_run = self.cfg.dry_run,
            copy = self.cfg.copy_mode,
            backup = self.cfg.backup,
            "Starting relocation run"
        );

        let mut report = RunReport::new();
        for name in names.iter().map(AsRef::as_ref) {
            if shutdown::is_requested() {
                warn!("interrupt received; stopping before '{name}'");
                report.interrupted = true;
                break;
            }
            if report.status_of(name).is_some() {
                debug!(name, "duplicate request ignored");
                continue;
            }
            let outcome = self.process(name, &index, &dest_root);
            log_outcome(&outcome);
            report.record(outcome);
        }
        Ok(report)
    }

    fn process(&self, name: &str, index: &SourceIndex, dest_root: &Path) -> ItemOutcome {
        let mut item = RelocationItem::named(name);

        if let Err(e) = validate_name(name) {
            return ItemOutcome::new(item, ItemStatus::Failed(e.to_string()), None);
        }

        let dest = dest_root.join(name);
        if let Ok(meta) = fs::symlink_metadata(&dest) {
            item.size_bytes = Some(meta.len());
            return ItemOutcome::new(item, ItemStatus::AlreadyPresent, Some(dest));
        }

        let candidates = index.candidates(name);
        item.candidates = candidates.len();
        let Some(src) = candidates.first() else {
            return ItemOutcome::new(item, ItemStatus::NotFound, None);
        };
        if candidates.len() > 1 {
            warn!(
                name,
                chosen = %src.display(),
                candidates = candidates.len(),
                "several files share this name; using the first in path order"
            );
        }

        let meta = match fs::metadata(src) {
            Ok(m) => m,
            Err(e) => {
                warn!(name, src = %src.display(), error = %e, "source vanished after scan");
                return ItemOutcome::new(item, ItemStatus::NotFound, None);
            }
        };
        item.source_path = Some(src.clone());
        item.size_bytes = Some(meta.len());

        if self.cfg.dry_run {
            let status = if self.cfg.copy_mode {
                ItemStatus::WouldCopy
            } else {
                ItemStatus::WouldMove
            };
            return ItemOutcome::new(item, status, Some(dest));
        }

        match self.transfer(src, &dest, name) {
            Ok(status) => ItemOutcome::new(item, status, Some(dest)),
            Err(e) => ItemOutcome::new(item, ItemStatus::Failed(format!("{e:#}")), None),
        }
    }

    fn transfer(&self, src: &Path, dest: &Path, name: &str) -> Result<ItemStatus> {
        if self.cfg.backup {
            let backup_dir = self
                .cfg
                .backup_dir
                .as_deref()
                .ok_or_else(|| anyhow!("no backup directory configured"))?;
            fs_ops::snapshot(src, backup_dir, name).context("backup failed")?;
        }
        if self.cfg.copy_mode {
            fs_ops::copy_file(src, dest, self.cfg.preserve_metadata)?;
            Ok(ItemStatus::Copied)
        } else {
            fs_ops::move_file(src, dest, self.cfg.preserve_metadata)?;
            Ok(ItemStatus::Moved)
        }
    }
}

pub(crate) fn log_outcome(o: &ItemOutcome) {
    let src = o
        .item
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let dest = o
        .dest
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let bytes = o.item.size_bytes.unwrap_or(0);
    match &o.status {
        ItemStatus::Failed(reason) => {
            warn!(name = %o.item.name, %src, status = "failed", %reason, "Item failed")
        }
        ItemStatus::NotFound => info!(name = %o.item.name, status = "not_found", "Item not found"),
        status => info!(name = %o.item.name, %src, %dest, bytes, status = status.label(), "Item processed"),
    }
}
