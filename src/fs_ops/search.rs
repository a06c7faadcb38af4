//! Locating named files under a source root.
//!
//! The tree is walked once per run and only the requested names are indexed.
//! Excluded subtrees (destination, backups, configured paths, VCS metadata) are
//! pruned during the walk rather than filtered afterwards.
//! Candidates for a name are sorted by path so the pick is deterministic.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Version-control metadata directories never searched.
pub const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn"];

pub fn is_vcs_dir(name: &OsStr) -> bool {
    VCS_DIRS.iter().any(|v| name == OsStr::new(v))
}

/// Requested filename -> every matching regular file, sorted.
#[derive(Debug, Default)]
pub struct SourceIndex {
    matches: HashMap<String, Vec<PathBuf>>,
}

impl SourceIndex {
    /// Walk `root` and record regular files whose name is in `wanted`.
    pub fn build(root: &Path, wanted: &HashSet<&str>, excluded: &[PathBuf]) -> Self {
        let pruned = |e: &DirEntry| -> bool {
            if e.depth() == 0 {
                return false;
            }
            if e.file_type().is_dir() && is_vcs_dir(e.file_name()) {
                return true;
            }
            excluded.iter().any(|ex| e.path().starts_with(ex))
        };

        let mut matches: HashMap<String, Vec<PathBuf>> = HashMap::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !pruned(e));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry during source scan");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if wanted.contains(name) {
                matches
                    .entry(name.to_string())
                    .or_default()
                    .push(entry.into_path());
            }
        }
        for paths in matches.values_mut() {
            paths.sort();
        }
        debug!(root = %root.display(), indexed = matches.len(), "source scan complete");
        Self { matches }
    }

    /// Every match for `name`, in selection order.
    pub fn candidates(&self, name: &str) -> &[PathBuf] {
        self.matches.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(p: &Path) {
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, b"x").unwrap();
    }

    #[test]
    fn finds_nested_files_and_sorts_duplicates() {
        let td = tempdir().unwrap();
        let root = td.path();
        touch(&root.join("zeta/results.txt"));
        touch(&root.join("alpha/deep/results.txt"));
        touch(&root.join("other.txt"));

        let wanted: HashSet<&str> = ["results.txt"].into_iter().collect();
        let idx = SourceIndex::build(root, &wanted, &[]);
        assert_eq!(
            idx.candidates("results.txt"),
            &[root.join("alpha/deep/results.txt"), root.join("zeta/results.txt")]
        );
        assert!(idx.candidates("other.txt").is_empty());
    }

    #[test]
    fn excluded_and_vcs_dirs_are_pruned() {
        let td = tempdir().unwrap();
        let root = td.path();
        touch(&root.join("output/a.txt"));
        touch(&root.join(".git/a.txt"));
        touch(&root.join("data/a.txt"));

        let wanted: HashSet<&str> = ["a.txt"].into_iter().collect();
        let idx = SourceIndex::build(root, &wanted, &[root.join("output")]);
        assert_eq!(idx.candidates("a.txt"), &[root.join("data/a.txt")]);
    }

    #[test]
    fn directories_with_wanted_name_are_ignored() {
        let td = tempdir().unwrap();
        let root = td.path();
        fs::create_dir_all(root.join("a.txt")).unwrap();
        let wanted: HashSet<&str> = ["a.txt"].into_iter().collect();
        assert!(SourceIndex::build(root, &wanted, &[]).candidates("a.txt").is_empty());
    }
}
