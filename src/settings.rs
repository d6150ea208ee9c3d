use crate::history::DEFAULT_CAPACITY;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of slots in the undo ring.
    pub history_capacity: usize,
    /// Log the undo table after every history change.
    pub print_undo_state: bool,
    pub last_graph: Option<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            print_undo_state: false,
            last_graph: None,
        }
    }
}

impl EditorSettings {
    /// `<config dir>/graph_history/settings.json`, or `settings.json` in the
    /// working directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("graph_history").join(SETTINGS_FILE))
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse settings {}", path.display()))?;
        log::info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write settings {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("graph_history_{}_{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = EditorSettings::load(&temp_path("missing.json")).unwrap();
        assert_eq!(settings, EditorSettings::default());
        assert_eq!(settings.history_capacity, 10);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        std::fs::write(&path, r#"{ "print_undo_state": true }"#).unwrap();

        let settings = EditorSettings::load(&path).unwrap();
        assert!(settings.print_undo_state);
        assert_eq!(settings.history_capacity, DEFAULT_CAPACITY);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn save_then_load() {
        let dir = temp_path("dir");
        let path = dir.join(SETTINGS_FILE);
        let settings = EditorSettings {
            history_capacity: 25,
            print_undo_state: true,
            last_graph: Some("pipeline.graph".into()),
        };

        settings.save(&path).unwrap();
        assert_eq!(EditorSettings::load(&path).unwrap(), settings);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(EditorSettings::load(&path).is_err());
        std::fs::remove_file(path).ok();
    }
}
