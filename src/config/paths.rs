//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths, the default project root, and
//! detects symlinked ancestors for safety.

use dirs::{config_dir, data_dir, home_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{CONFIG_ENV, PROJECT_SUBDIR_DEFAULT};

/// OS-appropriate default config path.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(mut base) = config_dir() {
        base.push("reorg");
        base.push("config.xml");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("reorg")
                .join("config.xml")
        })
    }
}

/// Config file in effect: explicit `--config`, then `$REORG_CONFIG`, then the OS default.
/// The boolean is true when the path was chosen explicitly (flag or env).
pub fn active_config_path(explicit: Option<&Path>) -> Option<(PathBuf, bool)> {
    if let Some(p) = explicit {
        return Some((p.to_path_buf(), true));
    }
    if let Some(p) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some((PathBuf::from(p), true));
    }
    default_config_path().map(|p| (p, false))
}

/// OS-appropriate default log file path (data dir). Not created here.
pub fn default_log_path() -> Option<PathBuf> {
    if let Some(mut base) = data_dir() {
        base.push("reorg");
        base.push("reorg.log");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join("reorg")
                .join("reorg.log")
        })
    }
}

/// `$HOME/Turkic-Languages-Audio-to-Text-Transcription/project`, or that subpath
/// of the current directory when no home directory is known.
pub fn default_project_root() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PROJECT_SUBDIR_DEFAULT)
}

/// Expand a leading `~` or `~/` to the home directory.
pub fn expand_tilde(s: &str) -> PathBuf {
    if s == "~" {
        if let Some(h) = home_dir() {
            return h;
        }
    } else if let Some(rest) = s.strip_prefix("~/")
        && let Some(h) = home_dir()
    {
        return h.join(rest);
    }
    PathBuf::from(s)
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
