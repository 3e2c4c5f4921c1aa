//! The open data directory and its loaded map tables
//!
//! This module handles the Project resource; loading and saving go through
//! [`clawmap_core::CsvStore`] in `file.rs`.

mod file;

pub use file::*;

use bevy::prelude::Resource;
use clawmap_core::{GameMap, MapData};
use std::path::{Path, PathBuf};

/// The data directory being edited
#[derive(Debug, Default, Resource)]
pub struct Project {
    /// `None` until a directory has been opened
    pub data_dir: Option<PathBuf>,
    pub data: MapData,
}

impl Project {
    /// Folder name of the data directory
    pub fn name(&self) -> String {
        self.data_dir
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "(no data folder)".to_string())
    }

    pub fn is_open(&self) -> bool {
        self.data_dir.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.data.is_dirty()
    }

    pub fn map(&self, id: &str) -> Option<&GameMap> {
        self.data.map(id)
    }
}
