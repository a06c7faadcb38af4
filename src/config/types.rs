//! Core configuration types.
//! - Config holds project-level settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{ARCHIVE_DIR_DEFAULT, OUTPUT_DIR_DEFAULT, RESTORE_DIR_DEFAULT};
use super::{defaults, paths};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// One archive subdirectory and the scripts that belong in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveGroup {
    /// Subdirectory of the archive root (e.g. `training`)
    pub dir: PathBuf,
    /// Bare filenames to relocate into it
    pub files: Vec<String>,
}

/// Project-level configuration. Engine runs are derived from it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the project being reorganized
    pub project_root: PathBuf,
    /// Where generated data files go (relative paths join onto project_root)
    pub output_dir: PathBuf,
    /// Where development scripts are archived
    pub archive_dir: PathBuf,
    /// Where rollback restores archived scripts
    pub restore_dir: PathBuf,
    /// Extra paths never searched for source files
    pub exclude: Vec<PathBuf>,
    /// Filenames moved by `reorg output`
    pub output_files: Vec<String>,
    /// Filenames moved by `reorg archive`, per subdirectory
    pub archive_groups: Vec<ArchiveGroup>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Copy permissions and timestamps onto relocated files
    pub preserve_metadata: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: paths::default_project_root(),
            output_dir: PathBuf::from(OUTPUT_DIR_DEFAULT),
            archive_dir: PathBuf::from(ARCHIVE_DIR_DEFAULT),
            restore_dir: PathBuf::from(RESTORE_DIR_DEFAULT),
            exclude: Vec::new(),
            output_files: defaults::output_files(),
            archive_groups: defaults::archive_groups(),
            log_level: LogLevel::Normal,
            log_file: None,
            preserve_metadata: false,
        }
    }
}

impl Config {
    /// Construct a Config for an explicit project root; other fields use defaults.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Join a configured path onto the project root unless it is already absolute.
    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.project_root.join(p)
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn archive_root(&self) -> PathBuf {
        self.resolve(&self.archive_dir)
    }

    pub fn restore_root(&self) -> PathBuf {
        self.resolve(&self.restore_dir)
    }

    /// Configured exclusions resolved against the project root.
    pub fn excluded_paths(&self) -> Vec<PathBuf> {
        self.exclude.iter().map(|p| self.resolve(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_dirs_join_project_root() {
        let cfg = Config::new("/srv/proj");
        assert_eq!(cfg.output_root(), PathBuf::from("/srv/proj/output"));
        assert_eq!(cfg.archive_root(), PathBuf::from("/srv/proj/archive"));
        assert_eq!(cfg.restore_root(), PathBuf::from("/srv/proj/training-scripts"));
    }

    #[test]
    fn absolute_dirs_are_kept() {
        let mut cfg = Config::new("/srv/proj");
        cfg.output_dir = PathBuf::from("/data/out");
        cfg.exclude = vec![PathBuf::from("venv"), PathBuf::from("/tmp/scratch")];
        assert_eq!(cfg.output_root(), PathBuf::from("/data/out"));
        assert_eq!(
            cfg.excluded_paths(),
            vec![PathBuf::from("/srv/proj/venv"), PathBuf::from("/tmp/scratch")]
        );
    }

    #[test]
    fn log_level_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!("quiet".parse::<LogLevel>(), Ok(LogLevel::Quiet));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
