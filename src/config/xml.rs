//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request (`reorg init-config`).
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation happens elsewhere.
//! - Unknown XML fields are rejected so misspelled settings surface immediately.
//! - A missing file at the OS default location means "use defaults"; a missing
//!   file that was named explicitly (flag or REORG_CONFIG) is an error.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{active_config_path, default_log_path, expand_tilde, path_has_symlink_ancestor};
use super::types::{ArchiveGroup, Config, LogLevel};
use super::{ARCHIVE_DIR_DEFAULT, OUTPUT_DIR_DEFAULT, RESTORE_DIR_DEFAULT};
use crate::errors::ReorgError;
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    project_root: Option<String>,
    output_dir: Option<String>,
    archive_dir: Option<String>,
    restore_dir: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    preserve_metadata: Option<bool>,
    exclude: Option<XmlPaths>,
    output_files: Option<XmlFiles>,
    archive_groups: Option<XmlGroups>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlPaths {
    #[serde(rename = "path", default)]
    paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlFiles {
    #[serde(rename = "file", default)]
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlGroups {
    #[serde(rename = "group", default)]
    groups: Vec<XmlGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlGroup {
    dir: String,
    #[serde(rename = "file", default)]
    files: Vec<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

fn trimmed_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

// Map XmlConfig -> Config; absent fields keep their defaults.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.project_root.as_deref()) {
        cfg.project_root = expand_tilde(s);
    }
    if let Some(s) = non_empty(parsed.output_dir.as_deref()) {
        cfg.output_dir = expand_tilde(s);
    }
    if let Some(s) = non_empty(parsed.archive_dir.as_deref()) {
        cfg.archive_dir = expand_tilde(s);
    }
    if let Some(s) = non_empty(parsed.restore_dir.as_deref()) {
        cfg.restore_dir = expand_tilde(s);
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(expand_tilde(s));
    }
    if let Some(level) = non_empty(parsed.log_level.as_deref()).and_then(LogLevel::parse) {
        cfg.log_level = level;
    }
    cfg.preserve_metadata = parsed.preserve_metadata.unwrap_or(false);

    if let Some(ex) = parsed.exclude {
        cfg.exclude = trimmed_names(ex.paths)
            .iter()
            .map(|s| expand_tilde(s))
            .collect();
    }
    if let Some(out) = parsed.output_files {
        cfg.output_files = trimmed_names(out.files);
    }
    if let Some(groups) = parsed.archive_groups {
        cfg.archive_groups = groups
            .groups
            .into_iter()
            .filter(|g| !g.dir.trim().is_empty())
            .map(|g| ArchiveGroup {
                dir: PathBuf::from(g.dir.trim()),
                files: trimmed_names(g.files),
            })
            .collect();
    }

    cfg
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents).map_err(|e| ReorgError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(xml_to_config(parsed))
}

/// Load the config in effect (see `active_config_path`).
/// Returns the config and the file it came from, if any.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let Some((path, named)) = active_config_path(explicit) else {
        debug!("no config location could be determined; using defaults");
        return Ok((Config::default(), None));
    };

    if !path.exists() {
        if named {
            return Err(ReorgError::Config {
                path,
                reason: "file does not exist".into(),
            }
            .into());
        }
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok((Config::default(), None));
    }

    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), project_root = %cfg.project_root.display(), "loaded config");
    Ok((cfg, Some(path)))
}

fn template_contents() -> String {
    let defaults = Config::default();
    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/reorg.log".into());

    let mut groups = String::new();
    for g in &defaults.archive_groups {
        groups.push_str(&format!("    <group>\n      <dir>{}</dir>\n", g.dir.display()));
        for f in &g.files {
            groups.push_str(&format!("      <file>{f}</file>\n"));
        }
        groups.push_str("    </group>\n");
    }
    let mut outputs = String::new();
    for f in &defaults.output_files {
        outputs.push_str(&format!("    <file>{f}</file>\n"));
    }

    format!(
        "<!--\n  reorg configuration (XML)\n\n  project_root       -> project to reorganize (~ is expanded)\n  output_dir         -> generated data files go here (relative to project_root)\n  archive_dir        -> development scripts are archived here\n  restore_dir        -> rollback restores archived scripts here\n  log_level          -> quiet | normal | info | debug\n  log_file           -> path to log file (optional; stderr still used)\n  preserve_metadata  -> copy permissions + timestamps onto relocated files\n  exclude/path       -> extra paths never searched for source files\n  output_files/file  -> files moved by `reorg output`\n  archive_groups     -> files moved by `reorg archive`, per subdirectory\n\n  CLI flags override XML values.\n-->\n<config>\n  <project_root>{}</project_root>\n  <output_dir>{OUTPUT_DIR_DEFAULT}</output_dir>\n  <archive_dir>{ARCHIVE_DIR_DEFAULT}</archive_dir>\n  <restore_dir>{RESTORE_DIR_DEFAULT}</restore_dir>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <preserve_metadata>false</preserve_metadata>\n  <exclude>\n    <path>venv</path>\n  </exclude>\n  <output_files>\n{}  </output_files>\n  <archive_groups>\n{}  </archive_groups>\n</config>\n",
        defaults.project_root.display(),
        suggested_log,
        outputs,
        groups,
    )
}

/// Create a template config file and its parent directory (best-effort permissions).
/// Refuses symlinked ancestors and never overwrites an existing file.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        return Err(anyhow::anyhow!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        ));
    }
    if path.exists() {
        return Err(anyhow::anyhow!(
            "Config file already exists: {}",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config directory '{}'", parent.display()))?;
        let _ = set_dir_mode_0700(parent);
    }

    write_config_secure_new_0600(path, template_contents().as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips_through_loader() {
        let td = tempfile::tempdir().unwrap();
        let path = dunce::canonicalize(td.path()).unwrap().join("cfg").join("config.xml");
        create_template_config(&path).unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        let defaults = Config::default();
        assert_eq!(cfg.output_files, defaults.output_files);
        assert_eq!(cfg.archive_groups, defaults.archive_groups);
        assert_eq!(cfg.exclude, vec![PathBuf::from("venv")]);
    }

    #[test]
    fn template_refuses_overwrite() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config/>").unwrap();
        assert!(create_template_config(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "<config/>");
    }

    #[test]
    fn unknown_field_is_a_config_error() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><bogus>1</bogus></config>").unwrap();
        let err = load_config_from_xml_path(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReorgError>(),
            Some(ReorgError::Config { .. })
        ));
    }
}
