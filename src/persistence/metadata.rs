use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// App metadata stored in meta.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Last selected date, YYYY-MM-DD
    #[serde(default)]
    pub last_selected: Option<String>,
}

impl AppMetadata {
    pub fn for_selection(date: NaiveDate) -> Self {
        Self {
            last_selected: Some(date.format("%Y-%m-%d").to_string()),
        }
    }

    /// The stored selection, if present and well-formed
    pub fn last_selected_date(&self) -> Option<NaiveDate> {
        self.last_selected
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }
}

/// Load app metadata from meta.json file
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<AppMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppMetadata::default());
    }

    let content = std::fs::read_to_string(path)?;
    let metadata: AppMetadata = serde_json::from_str(&content)?;
    Ok(metadata)
}

/// Save app metadata to meta.json file
pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &AppMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
