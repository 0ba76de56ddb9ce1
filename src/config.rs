use crate::data::DEFAULT_API_BASE;
use crate::store::DEFAULT_STORE_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub store_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
        }
    }
}

impl AppConfig {
    pub fn sanitized(mut self) -> Self {
        let base = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            DEFAULT_API_BASE.to_string()
        };

        if self.store_path.as_os_str().is_empty() {
            self.store_path = PathBuf::from(DEFAULT_STORE_FILE);
        }
        self
    }
}

pub fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".kline-chart.json")
}

/// Missing or unparseable config falls back to defaults.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return AppConfig::default(),
    };

    serde_json::from_str::<AppConfig>(&contents)
        .map(|cfg| cfg.sanitized())
        .unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "ignoring unreadable config");
            AppConfig::default()
        })
}
