//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Global flags may appear before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Reorganize the transcription project: move generated data into `output/`,
/// retire development scripts into `archive/`, and restore them on demand.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Idempotent project file reorganizer")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file to read instead of REORG_CONFIG or the default location.
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the project root (normally configured via XML).
    #[arg(long, global = true, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub project_root: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Print which config file would be used, then exit.
    #[arg(long, global = true, help = "Print the config file location used by reorg and exit")]
    pub print_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,
}

/// Options shared by the relocating subcommands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunFlags {
    /// Show what would be done, but do not modify files/directories
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Copy instead of move; sources are left in place
    #[arg(short = 'c', long)]
    pub copy: bool,

    /// Snapshot each file into backup_<timestamp>/ before touching it
    #[arg(short = 'b', long)]
    pub backup: bool,

    /// Preserve permissions and timestamps on copies
    #[arg(long)]
    pub preserve_metadata: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Move generated data files into the output directory
    Output {
        /// File names to relocate (defaults to the configured manifest)
        #[arg(value_name = "FILES")]
        files: Vec<String>,

        #[command(flatten)]
        flags: RunFlags,
    },
    /// Move development scripts into archive/<group>/ and write archive/README.md
    Archive {
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Copy archived scripts back into the restore directory (asks first)
    Rollback {
        /// Show what would be restored without copying
        #[arg(short = 'd', long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Write the project .gitignore
    Gitignore {
        #[arg(short = 'd', long)]
        dry_run: bool,

        /// Replace an existing .gitignore
        #[arg(long)]
        force: bool,
    },
    /// Write a template config file at the active config location
    InitConfig,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Flags of the relocating subcommand, if that is what was invoked.
    pub fn run_flags(&self) -> Option<&RunFlags> {
        match &self.command {
            Some(Command::Output { flags, .. }) | Some(Command::Archive { flags }) => Some(flags),
            _ => None,
        }
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(root) = &self.project_root {
            cfg.project_root = root.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if self.run_flags().is_some_and(|f| f.preserve_metadata) {
            cfg.preserve_metadata = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
