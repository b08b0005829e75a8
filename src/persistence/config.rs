use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User preferences stored in config.json. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// env_logger filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Task storage file, relative to the planner directory
    #[serde(default = "default_storage_file")]
    pub storage_file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_storage_file() -> String {
    "storage.json".to_string()
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage_file: default_storage_file(),
        }
    }
}

/// Load config.json; a missing file yields the defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(PlannerConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}
