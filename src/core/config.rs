//! Editor configuration (`woxel.json`)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::types::Result;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILENAME: &str = "woxel.json";

/// Editor settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Directory holding `<name>.wox.gz` projects and exports
    pub data_dir: PathBuf,
    /// Seconds without input before an idle backup is written
    pub idle_backup_secs: f32,
    /// Delay before a held edit key starts repeating
    pub repeat_delay_secs: f32,
    /// Interval between repeats once repeating
    pub repeat_interval_secs: f32,
    /// Mouse sensitivity used when none is given on the command line
    pub default_sensitivity: f32,
    /// Offline render target size
    pub render_width: u32,
    pub render_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("saves"),
            idle_backup_secs: 180.0,
            repeat_delay_secs: 0.3,
            repeat_interval_secs: 0.1,
            default_sensitivity: 0.003,
            render_width: 1024,
            render_height: 768,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"idle_backup_secs": 60.0}"#).unwrap();
        assert_eq!(config.idle_backup_secs, 60.0);
        assert_eq!(config.repeat_delay_secs, 0.3);
        assert_eq!(config.data_dir, PathBuf::from("saves"));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        let mut config = EditorConfig::default();
        config.render_width = 320;
        config.save(&path).unwrap();
        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded.render_width, 320);
    }

    #[test]
    fn test_missing_or_bad_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(EditorConfig::load_or_default(&missing).render_height, 768);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert_eq!(EditorConfig::load_or_default(&bad).render_height, 768);
    }
}
