//! Record store - named tabular resources of string records
//!
//! A record is a mapping of field name to string value. The store does no
//! validation; typed decoding happens in [`crate::records`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A single row: field name -> value
pub type Record = HashMap<String, String>;

/// Errors raised while reading or writing a tabular resource
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// The tabular resources the editor knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Maps,
    MapTerrain,
    MapEntities,
    Waypoints,
    /// Read-only catalog
    Npcs,
    /// Read-only catalog
    Enemies,
}

impl Table {
    /// File name of the resource inside the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Maps => "maps.csv",
            Table::MapTerrain => "map_terrain.csv",
            Table::MapEntities => "map_entities.csv",
            Table::Waypoints => "waypoints.csv",
            Table::Npcs => "npcs.csv",
            Table::Enemies => "enemies.csv",
        }
    }

}

/// Load/save access to tabular resources
pub trait RecordStore {
    /// Read every record of a table. A missing resource yields an empty list.
    fn read_records(&self, table: Table) -> Result<Vec<Record>, StoreError>;

    /// Overwrite a table. The header row is `field_order`; fields a record lacks
    /// are written as empty strings.
    fn write_records(
        &mut self,
        table: Table,
        records: &[Record],
        field_order: &[String],
    ) -> Result<(), StoreError>;

    /// Existing header of a table, or empty if the resource is missing
    fn field_order(&self, table: Table) -> Result<Vec<String>, StoreError>;
}

/// A directory of UTF-8 CSV files
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a table's file
    pub fn path_of(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }

    fn csv_error(path: &Path, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl RecordStore for CsvStore {
    fn read_records(&self, table: Table) -> Result<Vec<Record>, StoreError> {
        let path = self.path_of(table);
        if !path.exists() {
            tracing::debug!("{} not found, treating as empty", path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| Self::csv_error(&path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| Self::csv_error(&path, e))?
            .clone();

        // Short rows get empty values for the missing fields; surplus values are dropped
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| Self::csv_error(&path, e))?;
            let record: Record = headers
                .iter()
                .enumerate()
                .map(|(index, field)| (field.to_string(), row.get(index).unwrap_or("").to_string()))
                .collect();
            records.push(record);
        }
        Ok(records)
    }

    fn write_records(
        &mut self,
        table: Table,
        records: &[Record],
        field_order: &[String],
    ) -> Result<(), StoreError> {
        let path = self.path_of(table);
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut writer = csv::Writer::from_path(&path).map_err(|e| Self::csv_error(&path, e))?;
        writer
            .write_record(field_order)
            .map_err(|e| Self::csv_error(&path, e))?;
        for record in records {
            let row = field_order
                .iter()
                .map(|field| record.get(field).map(String::as_str).unwrap_or(""));
            writer
                .write_record(row)
                .map_err(|e| Self::csv_error(&path, e))?;
        }
        writer.flush().map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }

    fn field_order(&self, table: Table) -> Result<Vec<String>, StoreError> {
        let path = self.path_of(table);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| Self::csv_error(&path, e))?;
        let headers = reader.headers().map_err(|e| Self::csv_error(&path, e))?;
        Ok(headers.iter().map(str::to_string).collect())
    }
}

/// In-memory store, mostly for tests and headless tooling
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<Table, (Vec<String>, Vec<Record>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table with rows given as `(field, value)` pairs
    pub fn with_rows(mut self, table: Table, fields: &[&str], rows: &[&[&str]]) -> Self {
        let field_order: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let records = rows
            .iter()
            .map(|row| {
                field_order
                    .iter()
                    .cloned()
                    .zip(row.iter().map(|v| v.to_string()))
                    .collect()
            })
            .collect();
        self.tables.insert(table, (field_order, records));
        self
    }

    pub fn contains(&self, table: Table) -> bool {
        self.tables.contains_key(&table)
    }
}

impl RecordStore for MemoryStore {
    fn read_records(&self, table: Table) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .tables
            .get(&table)
            .map(|(_, records)| records.clone())
            .unwrap_or_default())
    }

    fn write_records(
        &mut self,
        table: Table,
        records: &[Record],
        field_order: &[String],
    ) -> Result<(), StoreError> {
        // Keep only header fields, like a CSV round trip would
        let records = records
            .iter()
            .map(|record| {
                field_order
                    .iter()
                    .map(|f| (f.clone(), record.get(f).cloned().unwrap_or_default()))
                    .collect()
            })
            .collect();
        self.tables.insert(table, (field_order.to_vec(), records));
        Ok(())
    }

    fn field_order(&self, table: Table) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables
            .get(&table)
            .map(|(fields, _)| fields.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("clawmap_store_{}", uuid::Uuid::new_v4().simple()))
    }

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_resource_is_empty() {
        let store = CsvStore::new(temp_dir());
        assert!(store.read_records(Table::Maps).unwrap().is_empty());
        assert!(store.field_order(Table::Maps).unwrap().is_empty());
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = temp_dir();
        let mut store = CsvStore::new(&dir);
        let fields: Vec<String> = ["id", "name", "connectedWaypointIds"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = vec![
            record(&[("id", "wp1"), ("name", "Gate, north"), ("connectedWaypointIds", "wp2;wp3")]),
            record(&[("id", "wp2"), ("name", "Well"), ("connectedWaypointIds", "")]),
        ];

        store
            .write_records(Table::Waypoints, &records, &fields)
            .unwrap();

        assert_eq!(store.field_order(Table::Waypoints).unwrap(), fields);
        let loaded = store.read_records(Table::Waypoints).unwrap();
        assert_eq!(loaded, records);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_write_fills_missing_fields() {
        let dir = temp_dir();
        let mut store = CsvStore::new(&dir);
        let fields = vec!["a".to_string(), "b".to_string()];
        store
            .write_records(Table::Npcs, &[record(&[("a", "1")])], &fields)
            .unwrap();

        let loaded = store.read_records(Table::Npcs).unwrap();
        assert_eq!(loaded[0].get("b").map(String::as_str), Some(""));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_memory_store_seed() {
        let store = MemoryStore::new().with_rows(
            Table::Enemies,
            &["id", "name"],
            &[&["goblin", "Goblin"], &["orc", "Orc"]],
        );
        let rows = store.read_records(Table::Enemies).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], "orc");
        assert!(store.read_records(Table::Maps).unwrap().is_empty());
    }

    #[test]
    fn test_short_rows_fill_missing_fields() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("maps.csv"),
            "id,name,description,width,height,isSafe,recommendedLevel,defaultTerrain\n\
             village,Village,,4,3,true,1,GRASS\n\
             cave,Cave,,5,5\n",
        )
        .unwrap();

        let store = CsvStore::new(&dir);
        let rows = store.read_records(Table::Maps).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], "cave");
        assert_eq!(rows[1]["height"], "5");
        assert_eq!(rows[1]["isSafe"], "");
        assert_eq!(rows[1]["defaultTerrain"], "");

        std::fs::remove_dir_all(dir).ok();
    }
}
