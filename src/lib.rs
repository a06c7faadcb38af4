//! Core library for `reorg`.
//!
//! Contains the relocation engine (find named files under a source root and
//! move/copy them into a destination root), rollback, configuration loading
//! and the small scaffolding helpers used by the CLI.
//!
//! Layout:
//! - `relocate`: the engine, its report type and rollback.
//! - `fs_ops`: filesystem primitives (atomic rename, safe copy, backups).
//! - `config`: XML config, defaults, validation.
//! - `scaffold`: static `.gitignore` and archive README generation.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod prompt;
pub mod relocate;
pub mod scaffold;
pub mod shutdown;

pub use config::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use config::{ArchiveGroup, Config, LogLevel};
pub use errors::ReorgError;
pub use relocate::{ItemOutcome, ItemStatus, RelocationItem, Relocator, RunConfig, RunReport};
pub use relocate::rollback::restore_archive;
