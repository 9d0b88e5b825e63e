//! Dashboard configuration
//!
//! Stored as TOML in the OS config directory
//! (`<config_dir>/fairgo-dashboard/config.toml`), overridable with
//! `FAIRGO_DASHBOARD_CONFIG`. Missing fields fall back to defaults.

use crate::dictionary::Section;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub endpoint: String,
    pub refresh_secs: u64,
    pub voice: VoiceConfig,
    /// Sections mounted on the surface; all of them when absent
    pub visible_sections: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    pub locale: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/api/live".to_string(),
            refresh_secs: 45,
            voice: VoiceConfig::default(),
            visible_sections: None,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            locale: "en-US".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load from the override path or the OS-specific location
    pub async fn load() -> Result<Self> {
        let path = match std::env::var_os("FAIRGO_DASHBOARD_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => Self::config_file_path()?,
        };
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid dashboard config {}", path.display()))?;
        Ok(config)
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        path.push("fairgo-dashboard");
        path.push("config.toml");
        Ok(path)
    }

    pub fn sections(&self) -> Vec<String> {
        match &self.visible_sections {
            Some(sections) => sections.clone(),
            None => Section::ALL.iter().map(|s| s.id().to_string()).collect(),
        }
    }
}
