//! User preferences persisted between editor sessions

mod file;

pub use file::*;

use bevy::prelude::Resource;
use clawmap_core::ToolMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum number of remembered data directories
pub const MAX_RECENT_DATA_DIRS: usize = 10;

/// A previously opened data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentDataDir {
    pub path: String,
    /// Folder name shown in the menu
    pub name: String,
}

/// Editor preferences, stored as JSON in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    pub auto_open_last_data_dir: bool,
    /// Canvas cell size in pixels
    pub cell_size: f32,
    pub default_tool: ToolMode,
    /// Most recent first
    pub recent_data_dirs: Vec<RecentDataDir>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            auto_open_last_data_dir: true,
            cell_size: 30.0,
            default_tool: ToolMode::PaintTerrain,
            recent_data_dirs: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Move a directory to the front of the recent list
    pub fn add_recent_data_dir(&mut self, path: PathBuf, name: String) {
        let path = path.to_string_lossy().to_string();
        self.recent_data_dirs.retain(|r| r.path != path);
        self.recent_data_dirs.insert(0, RecentDataDir { path, name });
        self.recent_data_dirs.truncate(MAX_RECENT_DATA_DIRS);
    }

    pub fn remove_recent_data_dir(&mut self, path: &str) {
        self.recent_data_dirs.retain(|r| r.path != path);
    }

    pub fn clear_recent_data_dirs(&mut self) {
        self.recent_data_dirs.clear();
    }

    pub fn last_data_dir(&self) -> Option<&RecentDataDir> {
        self.recent_data_dirs.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_dirs_dedupe_and_cap() {
        let mut prefs = EditorPreferences::default();
        for i in 0..12 {
            prefs.add_recent_data_dir(PathBuf::from(format!("/data/{}", i)), format!("{}", i));
        }
        assert_eq!(prefs.recent_data_dirs.len(), MAX_RECENT_DATA_DIRS);
        assert_eq!(prefs.last_data_dir().unwrap().name, "11");

        prefs.add_recent_data_dir(PathBuf::from("/data/5"), "5".to_string());
        assert_eq!(prefs.recent_data_dirs.len(), MAX_RECENT_DATA_DIRS);
        assert_eq!(prefs.last_data_dir().unwrap().path, "/data/5");
        assert_eq!(
            prefs
                .recent_data_dirs
                .iter()
                .filter(|r| r.path == "/data/5")
                .count(),
            1
        );

        prefs.remove_recent_data_dir("/data/5");
        assert_eq!(prefs.last_data_dir().unwrap().name, "11");
        prefs.clear_recent_data_dirs();
        assert!(prefs.last_data_dir().is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let prefs: EditorPreferences = serde_json::from_str(r#"{"cell_size": 24.0}"#).unwrap();
        assert_eq!(prefs.cell_size, 24.0);
        assert!(prefs.auto_open_last_data_dir);
        assert_eq!(prefs.default_tool, ToolMode::PaintTerrain);
    }
}
