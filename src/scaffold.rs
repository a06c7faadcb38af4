//! Static project files: `.gitignore` at the project root and the
//! date-stamped `README.md` describing the archive tree.

use anyhow::Result;
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ArchiveGroup;
use crate::fs_ops::write_atomic;

pub const GITIGNORE_FILE: &str = ".gitignore";
pub const ARCHIVE_README: &str = "README.md";

/// Fixed `.gitignore` content for the transcription project.
pub const GITIGNORE: &str = "\
# Python
__pycache__/
*.py[cod]
*.egg-info/
.pytest_cache/
.ipynb_checkpoints/

# Virtual environments
venv/
.venv/
env/

# Model weights and checkpoints
*.bin
*.pt
*.pth
*.ckpt
*.safetensors
*.onnx
models/
checkpoints/

# Audio
*.wav
*.mp3
*.flac

# Generated data and reorganisation leftovers
output/
backup_*/

# Editors / OS
.vscode/
.idea/
.DS_Store
Thumbs.db
";

/// What a scaffold write did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// File exists and `force` was not given
    Kept,
    /// Dry-run: would have been written
    WouldWrite,
}

/// Write `<project_root>/.gitignore`. An existing file is kept unless `force`.
pub fn write_gitignore(project_root: &Path, dry_run: bool, force: bool) -> Result<(PathBuf, WriteOutcome)> {
    let path = project_root.join(GITIGNORE_FILE);
    if path.exists() && !force {
        info!(path = %path.display(), "gitignore exists; leaving it untouched");
        return Ok((path, WriteOutcome::Kept));
    }
    if dry_run {
        info!(action = "write", path = %path.display(), "dry-run");
        return Ok((path, WriteOutcome::WouldWrite));
    }
    write_atomic(&path, GITIGNORE.as_bytes())?;
    info!(path = %path.display(), "Wrote gitignore");
    Ok((path, WriteOutcome::Written))
}

/// Render the archive README for `groups`, stamped with `date`.
pub fn archive_readme(groups: &[ArchiveGroup], date: NaiveDate) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Archive\n");
    let _ = writeln!(s, "Archived on {}.\n", date.format("%Y-%m-%d"));
    let _ = writeln!(
        s,
        "Development and training scripts that are no longer part of the active\n\
         pipeline. Nothing here is deleted by `reorg rollback`; it only copies files\n\
         back into the restore directory.\n"
    );
    for g in groups {
        let _ = writeln!(s, "## {}/\n", g.dir.display());
        for f in &g.files {
            let _ = writeln!(s, "- `{f}`");
        }
        s.push('\n');
    }
    s
}

/// Write `<archive_root>/README.md`, replacing any earlier copy.
pub fn write_archive_readme(
    archive_root: &Path,
    groups: &[ArchiveGroup],
    date: NaiveDate,
    dry_run: bool,
) -> Result<(PathBuf, WriteOutcome)> {
    let path = archive_root.join(ARCHIVE_README);
    if dry_run {
        info!(action = "write", path = %path.display(), "dry-run");
        return Ok((path, WriteOutcome::WouldWrite));
    }
    write_atomic(&path, archive_readme(groups, date).as_bytes())?;
    info!(path = %path.display(), "Wrote archive README");
    Ok((path, WriteOutcome::Written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::archive_groups;
    use std::fs;

    #[test]
    fn gitignore_kept_unless_forced() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join(GITIGNORE_FILE);
        fs::write(&p, "custom\n").unwrap();

        let (_, o) = write_gitignore(td.path(), false, false).unwrap();
        assert_eq!(o, WriteOutcome::Kept);
        assert_eq!(fs::read_to_string(&p).unwrap(), "custom\n");

        let (_, o) = write_gitignore(td.path(), true, true).unwrap();
        assert_eq!(o, WriteOutcome::WouldWrite);
        assert_eq!(fs::read_to_string(&p).unwrap(), "custom\n");

        let (_, o) = write_gitignore(td.path(), false, true).unwrap();
        assert_eq!(o, WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&p).unwrap(), GITIGNORE);
    }

    #[test]
    fn readme_lists_groups_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let text = archive_readme(&archive_groups(), date);
        assert!(text.contains("Archived on 2025-03-07."));
        assert!(text.contains("## training/"));
        assert!(text.contains("- `download_mmteb.py`"));
    }

    #[test]
    fn readme_dry_run_writes_nothing() {
        let td = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let (p, o) = write_archive_readme(td.path(), &archive_groups(), date, true).unwrap();
        assert_eq!(o, WriteOutcome::WouldWrite);
        assert!(!p.exists());
        write_archive_readme(td.path(), &archive_groups(), date, false).unwrap();
        assert!(p.exists());
    }
}
