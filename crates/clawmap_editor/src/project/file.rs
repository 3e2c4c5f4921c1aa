//! Data directory load/save operations

use super::Project;
use clawmap_core::{CsvStore, MapData, StoreError};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("No data folder open")]
    NoDataDir,
}

impl Project {
    /// Load every table from a data directory
    pub fn open(dir: &Path) -> Result<Self, ProjectError> {
        if !dir.is_dir() {
            return Err(ProjectError::NotADirectory(dir.display().to_string()));
        }

        let store = CsvStore::new(dir);
        let data = MapData::load(&store)?;
        bevy::log::info!("Opened data folder {:?}", dir);

        Ok(Self {
            data_dir: Some(dir.to_path_buf()),
            data,
        })
    }

    /// Discard in-memory edits and load the tables again
    pub fn reload(&mut self) -> Result<(), ProjectError> {
        let dir = self.data_dir.clone().ok_or(ProjectError::NoDataDir)?;
        *self = Self::open(&dir)?;
        Ok(())
    }

    /// Write the editable tables back to the data directory
    pub fn save(&mut self) -> Result<(), ProjectError> {
        let dir = self.data_dir.as_ref().ok_or(ProjectError::NoDataDir)?;
        let mut store = CsvStore::new(dir);
        self.data.save(&mut store)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawmap_core::GameMap;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "clawmap_editor_{}",
            uuid::Uuid::new_v4().simple()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_open_save_reload() {
        let dir = temp_dir();
        std::fs::write(dir.join("maps.csv"), "id,name,width,height\nm1,Meadow,3,3\n").unwrap();

        let mut project = Project::open(&dir).unwrap();
        assert_eq!(project.map("m1").unwrap().name, "Meadow");
        assert!(!project.is_dirty());

        project
            .data
            .create_map(GameMap::new("m2", "Cave", 2, 2))
            .unwrap();
        assert!(project.is_dirty());
        project.save().unwrap();
        assert!(!project.is_dirty());

        project.data.delete_map("m2").unwrap();
        project.reload().unwrap();
        assert!(project.map("m2").is_some());

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_save_without_dir() {
        let mut project = Project::default();
        assert!(matches!(project.save(), Err(ProjectError::NoDataDir)));
        assert_eq!(project.name(), "(no data folder)");
    }

    #[test]
    fn test_open_missing_dir() {
        let missing = std::env::temp_dir().join("clawmap_editor_missing_dir");
        assert!(matches!(
            Project::open(&missing),
            Err(ProjectError::NotADirectory(_))
        ));
    }
}
