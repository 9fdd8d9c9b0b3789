use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::warn;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HbsConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,
    pub app_tree: Option<TreeConf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TreeConf {
    pub addr: String, // ex: "http://tree.local:8080"
    #[serde(default = "default_tree_timeout")]
    pub timeout_ms: u64,
}

fn default_listen() -> String {
    "0.0.0.0:6031".into()
}

fn default_data_path() -> String {
    "./data/hbs.json".into()
}

fn default_reload_interval() -> u64 {
    60
}

fn default_tree_timeout() -> u64 {
    crate::tree::DEFAULT_TREE_TIMEOUT.as_millis() as u64
}

impl Default for HbsConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            data_path: default_data_path(),
            reload_interval_secs: default_reload_interval(),
            app_tree: None,
        }
    }
}

impl HbsConfig {
    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs.max(1))
    }
}

impl TreeConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}

pub fn parse_config(txt: &str) -> HbsConfig {
    if txt.trim().is_empty() {
        return HbsConfig::default();
    }
    serde_yaml::from_str(txt).unwrap_or_else(|e| {
        warn!(error = %e, "invalid hbs config, using defaults");
        HbsConfig::default()
    })
}

pub async fn load_config() -> HbsConfig {
    let path = std::env::var("SYMBION_HBS_CONFIG").unwrap_or_else(|_| "hbs.yaml".into());
    if Path::new(&path).exists() {
        match fs::read_to_string(&path).await {
            Ok(txt) => parse_config(&txt),
            Err(e) => {
                warn!(path = %path, error = %e, "unreadable hbs config, using defaults");
                HbsConfig::default()
            }
        }
    } else {
        warn!(path = %path, "no hbs config file, using defaults");
        HbsConfig::default()
    }
}
