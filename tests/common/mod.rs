#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A throwaway project tree plus a config file pointing at it.
pub struct Project {
    _td: TempDir,
    pub base: PathBuf,
    pub root: PathBuf,
    pub config: PathBuf,
}

impl Project {
    /// Project with the built-in manifests.
    pub fn new() -> Self {
        Self::with_config_body("")
    }

    /// Project whose config carries `extra` XML after `<project_root>`.
    pub fn with_config_body(extra: &str) -> Self {
        let td = tempfile::tempdir().unwrap();
        // Canonicalize to resolve /var -> /private/var on macOS and avoid symlink ancestors
        let base = dunce::canonicalize(td.path()).unwrap();
        let root = base.join("project");
        fs::create_dir_all(&root).unwrap();
        let config = base.join("config.xml");
        fs::write(
            &config,
            format!(
                "<config>\n  <project_root>{}</project_root>\n  <log_level>debug</log_level>\n{extra}</config>\n",
                root.display()
            ),
        )
        .unwrap();
        Self { _td: td, base, root, config }
    }

    pub fn write(&self, rel: &str, data: &[u8]) -> PathBuf {
        let p = self.root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, data).unwrap();
        p
    }

    pub fn read(&self, rel: &str) -> Vec<u8> {
        fs::read(self.root.join(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }

    /// `reorg` with REORG_CONFIG pointing at this project's config.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut c = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("reorg"));
        c.env("REORG_CONFIG", &self.config);
        c
    }

    /// Every file under the project root with its contents.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        tree(&self.root)
    }
}

pub fn tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

pub fn stdout_of(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}
