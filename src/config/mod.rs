//! Config module.
//! Provides configuration types, default paths and manifests, XML loading, and validation.

pub mod defaults;
pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{
    active_config_path, default_config_path, default_log_path, default_project_root, expand_tilde,
    path_has_symlink_ancestor,
};
pub use types::{ArchiveGroup, Config, LogLevel};
pub use validate::{ensure_dir, ensure_existing_dir, existing_backup_dirs, validate_and_normalize};
pub use xml::{create_template_config, load_config, load_config_from_xml_path};

/// Directory names, relative to the project root, used when nothing is configured.
pub const OUTPUT_DIR_DEFAULT: &str = "output";
pub const ARCHIVE_DIR_DEFAULT: &str = "archive";
pub const RESTORE_DIR_DEFAULT: &str = "training-scripts";

/// Project location under the user's home directory.
pub const PROJECT_SUBDIR_DEFAULT: &str = "Turkic-Languages-Audio-to-Text-Transcription/project";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "REORG_CONFIG";

/// Prefix of the per-run backup directories created under the project root.
pub const BACKUP_DIR_PREFIX: &str = "backup_";
