use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::warn;

pub const DEFAULT_FEED_URL: &str = "https://api.citybik.es/v2/networks/velib";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct KernelConfig {
    pub listen: String,
    pub feed: FeedConf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConf {
    pub url: String,
    pub user_agent: String,
    pub freshness_secs: u64, // fenêtre de fraîcheur upstream
    pub timeout_secs: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".into(),
            feed: FeedConf::default(),
        }
    }
}

impl Default for FeedConf {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.into(),
            user_agent: "FairGo Mobility Dashboard".into(),
            freshness_secs: 20,
            timeout_secs: 10,
        }
    }
}

pub fn parse_config(txt: &str) -> KernelConfig {
    if txt.trim().is_empty() {
        return KernelConfig::default();
    }
    serde_yaml::from_str(txt).unwrap_or_else(|e| {
        warn!("[kernel] config invalide: {e}");
        KernelConfig::default()
    })
}

pub async fn load_config() -> KernelConfig {
    let path = std::env::var("FAIRGO_KERNEL_CONFIG").unwrap_or_else(|_| "kernel.yaml".into());
    load_config_from(&path).await
}

pub async fn load_config_from(path: impl AsRef<Path>) -> KernelConfig {
    let path = path.as_ref();
    if path.exists() {
        let txt = fs::read_to_string(path).await.unwrap_or_default();
        parse_config(&txt)
    } else {
        warn!("[kernel] pas de {}, usage config par défaut", path.display());
        KernelConfig::default()
    }
}
