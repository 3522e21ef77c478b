//! User-level settings.
//!
//! Stored as `settings.yml` in the platform config directory
//! (`~/.config/tmplsync/` on Linux). Holds the API host, an optional
//! token and the default environment ids per project directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};
use crate::template::Environment;

/// Platform host used when none is configured.
pub const DEFAULT_HOST: &str = "https://live.getsilverfin.com";

/// Settings loaded once per process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Default firm id per project path.
    #[serde(default)]
    pub default_firms: BTreeMap<String, u64>,

    /// Default partner id per project path.
    #[serde(default)]
    pub default_partners: BTreeMap<String, u64>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            token: None,
            default_firms: BTreeMap::new(),
            default_partners: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// The settings file used when no override is given.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tmplsync")
            .join("settings.yml")
    }

    /// Load settings. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| SyncError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save settings using write-to-temp-then-rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize settings: {}", e))?;

        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    pub fn default_firm(&self, project: &Path) -> Option<u64> {
        self.default_firms.get(&project_key(project)).copied()
    }

    pub fn set_default_firm(&mut self, project: &Path, firm_id: u64) {
        self.default_firms.insert(project_key(project), firm_id);
    }

    pub fn default_partner(&self, project: &Path) -> Option<u64> {
        self.default_partners.get(&project_key(project)).copied()
    }

    pub fn set_default_partner(&mut self, project: &Path, partner_id: u64) {
        self.default_partners.insert(project_key(project), partner_id);
    }

    /// Pick the environment for a command.
    ///
    /// An explicit flag wins, then the project's default firm, then its
    /// default partner.
    pub fn resolve_environment(
        &self,
        project: &Path,
        firm: Option<u64>,
        partner: Option<u64>,
    ) -> Result<Environment> {
        if let Some(id) = firm {
            return Ok(Environment::firm(id));
        }
        if let Some(id) = partner {
            return Ok(Environment::partner(id));
        }
        if let Some(id) = self.default_firm(project) {
            return Ok(Environment::firm(id));
        }
        if let Some(id) = self.default_partner(project) {
            return Ok(Environment::partner(id));
        }
        Err(SyncError::NoEnvironment)
    }
}

/// Key used for per-project defaults.
fn project_key(project: &Path) -> String {
    project
        .canonicalize()
        .unwrap_or_else(|_| project.to_path_buf())
        .to_string_lossy()
        .to_string()
}
