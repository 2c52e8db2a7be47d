//! Vault configuration.
//!
//! Settings come from `.coursevault.yaml` at the vault root (or an explicit
//! `--config` path), with every key optional. Command-line flags are applied
//! on top by the CLI.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VaultError};
use crate::hierarchy::index_type::MAX_LEVEL;
use crate::tags::priority::PriorityCategory;

pub const CONFIG_FILE_NAME: &str = ".coursevault.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct VaultConfig {
    /// Folder holding note templates; never indexed or normalised.
    pub templates_dir: String,
    /// Markdown file whose frontmatter seeds every generated index.
    pub index_template: Option<PathBuf>,
    pub main_title: String,
    /// Taxonomy level of the scan root (0 = Main, 1 = Program, ...).
    pub root_level: usize,
    pub readonly_key: String,
    pub home_note: String,
    pub dashboard_note: String,
    pub assignments_note: String,
    pub keep_structural: bool,
    pub priority_category: Option<PriorityCategory>,
    pub priority_overlay: BTreeMap<String, i64>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            templates_dir: "_templates".to_string(),
            index_template: None,
            main_title: "Main Index".to_string(),
            root_level: 0,
            readonly_key: "auto-generated-state".to_string(),
            home_note: "Home".to_string(),
            dashboard_note: "Dashboard".to_string(),
            assignments_note: "Assignments".to_string(),
            keep_structural: false,
            priority_category: None,
            priority_overlay: BTreeMap::new(),
        }
    }
}

impl VaultConfig {
    /// Load the explicit config file (which must exist) or the vault's own
    /// `.coursevault.yaml` if present. Falls back to defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) if !p.is_file() => {
                return Err(VaultError::Config(format!(
                    "config file {:?} does not exist",
                    p
                )));
            }
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                if !default_path.is_file() {
                    log::debug!("[config] No {} in {:?}, using defaults", CONFIG_FILE_NAME, root);
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&path).map_err(|e| VaultError::io(&path, e))?;
        let config = Self::from_yaml(&content)
            .map_err(|e| VaultError::Config(format!("{:?}: {}", path, e)))?;
        log::info!("[config] Loaded {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_level > MAX_LEVEL {
            return Err(VaultError::Config(format!(
                "root-level {} is deeper than the lesson level ({})",
                self.root_level, MAX_LEVEL
            )));
        }
        if self.templates_dir.trim().is_empty() {
            return Err(VaultError::Config("templates-dir must not be empty".into()));
        }
        if self.readonly_key.trim().is_empty() {
            return Err(VaultError::Config("readonly-key must not be empty".into()));
        }
        Ok(())
    }
}

/// Canonicalize the vault root; a missing or non-directory root is fatal.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let root = path.canonicalize().map_err(|e| {
        VaultError::Config(format!("vault root {:?} is not accessible: {}", path, e))
    })?;
    if !root.is_dir() {
        return Err(VaultError::Config(format!(
            "vault root {:?} is not a directory",
            root
        )));
    }
    Ok(root)
}
