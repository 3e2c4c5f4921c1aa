//! In-memory map data model
//!
//! Holds every map table in load order and implements the editing operations:
//! map creation and cascading deletion, single-cell terrain painting, entity
//! placement with per-cell collision checks, and waypoint connection edits.
//! All lookups are linear scans; the tables are small.

use crate::records::{
    CatalogEntry, EntityPlacement, EntityType, FromRecord, GameMap, TableRecord, TerrainRect,
    Waypoint, CAMPFIRE_ENTITY_ID,
};
use crate::store::{Record, RecordStore, StoreError, Table};
use crate::terrain::TerrainGrid;

/// Why an editing operation was refused. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapDataError {
    #[error("map id '{0}' already exists")]
    DuplicateId(String),
    #[error("cell ({x}, {y}) is already occupied by {existing}")]
    CellOccupied {
        x: i32,
        y: i32,
        existing: EntityType,
    },
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("no {0} selected")]
    MissingSelection(&'static str),
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

/// Result of a successful entity placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedEntity {
    pub instance_id: String,
    /// Set for waypoint placements: the waypoint whose connections may be edited next
    pub connection_prompt: Option<String>,
}

/// Every map table held in memory
#[derive(Debug, Clone, Default)]
pub struct MapData {
    pub maps: Vec<GameMap>,
    pub terrain: Vec<TerrainRect>,
    pub entities: Vec<EntityPlacement>,
    pub waypoints: Vec<Waypoint>,
    pub npcs: Vec<CatalogEntry>,
    pub enemies: Vec<CatalogEntry>,
    /// Rows of the writable tables that failed typed decoding, in file order
    unparsed: Vec<(Table, Record)>,
    dirty: bool,
}

/// Decode a table; rows that fail decoding come back untouched as the second list
fn read_table<T: FromRecord>(
    store: &dyn RecordStore,
    table: Table,
) -> Result<(Vec<T>, Vec<Record>), StoreError> {
    let records = store.read_records(table)?;
    let mut rows = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        match T::from_record(&record) {
            Ok(row) => rows.push(row),
            Err(e) => {
                // Row 1 is the header
                tracing::warn!(
                    "Cannot edit {} row {}, keeping it as is: {}",
                    table.file_name(),
                    index + 2,
                    e
                );
                rejected.push(record);
            }
        }
    }
    Ok((rows, rejected))
}

fn write_table<'a, T: TableRecord>(
    store: &mut dyn RecordStore,
    rows: &[T],
    unparsed: impl Iterator<Item = &'a Record>,
) -> Result<(), StoreError> {
    let mut field_order = store.field_order(T::TABLE)?;
    if field_order.is_empty() {
        field_order = T::default_field_order();
    }
    let records: Vec<_> = rows
        .iter()
        .map(TableRecord::to_record)
        .chain(unparsed.cloned())
        .collect();
    store.write_records(T::TABLE, &records, &field_order)
}

impl MapData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every table. Missing tables load as empty; undecodable rows are skipped.
    pub fn load(store: &dyn RecordStore) -> Result<Self, StoreError> {
        let mut unparsed = Vec::new();
        let mut keep = |table: Table, rejected: Vec<Record>| {
            unparsed.extend(rejected.into_iter().map(|record| (table, record)));
        };

        let (maps, rejected) = read_table(store, Table::Maps)?;
        keep(Table::Maps, rejected);
        let (terrain, rejected) = read_table(store, Table::MapTerrain)?;
        keep(Table::MapTerrain, rejected);
        let (entities, rejected) = read_table(store, Table::MapEntities)?;
        keep(Table::MapEntities, rejected);
        let (waypoints, rejected) = read_table(store, Table::Waypoints)?;
        keep(Table::Waypoints, rejected);
        // Catalogs are never written, so their bad rows can be dropped
        let (npcs, _) = read_table(store, Table::Npcs)?;
        let (enemies, _) = read_table(store, Table::Enemies)?;

        let data = Self {
            maps,
            terrain,
            entities,
            waypoints,
            npcs,
            enemies,
            unparsed,
            dirty: false,
        };
        tracing::info!(
            "Loaded {} maps, {} terrain rects, {} entities, {} waypoints ({} NPCs, {} enemies, {} rows kept unparsed)",
            data.maps.len(),
            data.terrain.len(),
            data.entities.len(),
            data.waypoints.len(),
            data.npcs.len(),
            data.enemies.len(),
            data.unparsed.len()
        );
        Ok(data)
    }

    /// Write the editable tables back. Catalogs are never written.
    ///
    /// Rows that could not be decoded on load follow the decoded rows of their table.
    pub fn save(&mut self, store: &mut dyn RecordStore) -> Result<(), StoreError> {
        write_table(store, &self.maps, self.unparsed_rows(Table::Maps))?;
        write_table(store, &self.terrain, self.unparsed_rows(Table::MapTerrain))?;
        write_table(store, &self.entities, self.unparsed_rows(Table::MapEntities))?;
        write_table(store, &self.waypoints, self.unparsed_rows(Table::Waypoints))?;
        self.dirty = false;
        tracing::info!("Saved {} maps", self.maps.len());
        Ok(())
    }

    /// Whether anything changed since load or the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rows of a table the editor could not decode and keeps verbatim
    pub fn unparsed_rows(&self, table: Table) -> impl Iterator<Item = &Record> {
        self.unparsed
            .iter()
            .filter(move |(t, _)| *t == table)
            .map(|(_, record)| record)
    }

    // ------------------------------------------------------------------------
    // Maps
    // ------------------------------------------------------------------------

    pub fn map(&self, id: &str) -> Option<&GameMap> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// Display name of a map, falling back to its id
    pub fn map_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.map(id).map(|m| m.name.as_str()).unwrap_or(id)
    }

    /// Append a new map, rejecting duplicate ids
    pub fn create_map(&mut self, map: GameMap) -> Result<(), MapDataError> {
        if self.map(&map.id).is_some() {
            return Err(MapDataError::DuplicateId(map.id));
        }
        tracing::debug!("Created map {}", map.id);
        self.maps.push(map);
        self.dirty = true;
        Ok(())
    }

    /// Replace every attribute of the map with the same id.
    /// Unmodelled columns not set on `map` keep their current values.
    pub fn update_map(&mut self, mut map: GameMap) -> Result<(), MapDataError> {
        let existing = self
            .maps
            .iter_mut()
            .find(|m| m.id == map.id)
            .ok_or_else(|| MapDataError::NotFound {
                kind: "map",
                id: map.id.clone(),
            })?;
        for (field, value) in std::mem::take(&mut existing.extra) {
            map.extra.entry(field).or_insert(value);
        }
        *existing = map;
        self.dirty = true;
        Ok(())
    }

    /// Remove a map together with its terrain, entities and waypoints
    pub fn delete_map(&mut self, id: &str) -> Result<GameMap, MapDataError> {
        let index = self
            .maps
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| MapDataError::NotFound {
                kind: "map",
                id: id.to_string(),
            })?;
        let removed = self.maps.remove(index);

        let before = (self.terrain.len(), self.entities.len(), self.waypoints.len());
        self.terrain.retain(|t| t.map_id != id);
        self.entities.retain(|e| e.map_id != id);
        self.waypoints.retain(|w| w.map_id != id);
        self.unparsed.retain(|(table, record)| {
            *table == Table::Maps || record.get("mapId").map(|v| v.trim()) != Some(id)
        });
        tracing::debug!(
            "Deleted map {}: {} terrain rects, {} entities, {} waypoints",
            id,
            before.0 - self.terrain.len(),
            before.1 - self.entities.len(),
            before.2 - self.waypoints.len()
        );

        self.dirty = true;
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Terrain
    // ------------------------------------------------------------------------

    /// Paint one cell. An existing 1x1 rectangle at the cell is overwritten,
    /// otherwise a new one is appended. Bounds are the caller's concern.
    pub fn paint_terrain(&mut self, map_id: &str, x: i32, y: i32, terrain: &str) {
        match self.terrain.iter_mut().find(|t| t.is_cell(map_id, x, y)) {
            Some(rect) => rect.terrain_types = vec![terrain.to_string()],
            None => self
                .terrain
                .push(TerrainRect::single_cell(map_id, x, y, terrain)),
        }
        self.dirty = true;
    }

    /// Resolve the terrain of every cell of a map.
    ///
    /// Starts from the map's default terrain and applies its rectangles in list
    /// order, clamped to the map; later rectangles override earlier ones.
    pub fn build_terrain_grid(&self, map: &GameMap) -> TerrainGrid {
        let mut grid = TerrainGrid::filled(map.width, map.height, &map.default_terrain);
        for rect in self.terrain.iter().filter(|t| t.map_id == map.id) {
            let terrain = rect.primary_terrain().unwrap_or(map.default_terrain.as_str());
            grid.fill_rect(rect.x1, rect.y1, rect.x2, rect.y2, terrain);
        }
        grid
    }

    // ------------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------------

    pub fn entity_at(&self, map_id: &str, x: i32, y: i32) -> Option<&EntityPlacement> {
        self.entities.iter().find(|e| e.is_at(map_id, x, y))
    }

    pub fn entities_on<'a>(&'a self, map_id: &'a str) -> impl Iterator<Item = &'a EntityPlacement> {
        self.entities.iter().filter(move |e| e.map_id == map_id)
    }

    /// Place an entity on an empty cell
    pub fn place_entity(
        &mut self,
        map_id: &str,
        x: i32,
        y: i32,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<PlacedEntity, MapDataError> {
        if let Some(existing) = self.entity_at(map_id, x, y) {
            return Err(MapDataError::CellOccupied {
                x,
                y,
                existing: existing.entity_type,
            });
        }

        let placement = EntityPlacement::new(map_id, x, y, entity_type, entity_id);
        let placed = PlacedEntity {
            instance_id: placement.instance_id.clone(),
            connection_prompt: (entity_type == EntityType::Waypoint)
                .then(|| entity_id.to_string()),
        };
        tracing::debug!("Placed {} '{}' at ({}, {}) on {}", entity_type, entity_id, x, y, map_id);
        self.entities.push(placement);
        self.dirty = true;
        Ok(placed)
    }

    /// Remove the entity occupying a cell
    pub fn delete_entity_at(
        &mut self,
        map_id: &str,
        x: i32,
        y: i32,
    ) -> Result<EntityPlacement, MapDataError> {
        let index = self
            .entities
            .iter()
            .position(|e| e.is_at(map_id, x, y))
            .ok_or_else(|| MapDataError::NotFound {
                kind: "entity",
                id: format!("{} ({}, {})", map_id, x, y),
            })?;
        self.dirty = true;
        Ok(self.entities.remove(index))
    }

    /// Valid `entityId` choices for an entity type
    pub fn entity_ids_for(&self, entity_type: EntityType) -> Vec<String> {
        match entity_type {
            EntityType::Waypoint => self.waypoints.iter().map(|w| w.id.clone()).collect(),
            EntityType::Npc => self.npcs.iter().map(|n| n.id.clone()).collect(),
            EntityType::Enemy => self.enemies.iter().map(|e| e.id.clone()).collect(),
            EntityType::Campfire => vec![CAMPFIRE_ENTITY_ID.to_string()],
        }
    }

    // ------------------------------------------------------------------------
    // Waypoints
    // ------------------------------------------------------------------------

    pub fn waypoint(&self, id: &str) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    /// Replace a waypoint's outgoing connections. Other waypoints are untouched.
    pub fn set_waypoint_connections<I, S>(
        &mut self,
        waypoint_id: &str,
        connected_ids: I,
    ) -> Result<(), MapDataError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let waypoint = self
            .waypoints
            .iter_mut()
            .find(|w| w.id == waypoint_id)
            .ok_or_else(|| MapDataError::NotFound {
                kind: "waypoint",
                id: waypoint_id.to_string(),
            })?;

        let mut connections: Vec<String> = Vec::new();
        for id in connected_ids {
            let id = id.into();
            if !connections.contains(&id) {
                connections.push(id);
            }
        }
        waypoint.connected_waypoint_ids = connections;
        self.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample() -> MapData {
        let mut data = MapData::new();
        data.create_map(GameMap::new("m1", "Meadow", 4, 3)).unwrap();
        data.create_map(GameMap::new("m2", "Cave", 2, 2)).unwrap();
        data.waypoints.push(Waypoint::new("wp1", "m1", "Meadow gate"));
        data.waypoints.push(Waypoint::new("wp2", "m2", "Cave mouth"));
        data
    }

    #[test]
    fn test_create_map_rejects_duplicate() {
        let mut data = sample();
        let err = data
            .create_map(GameMap::new("m1", "Other", 1, 1))
            .unwrap_err();
        assert_eq!(err, MapDataError::DuplicateId("m1".to_string()));
        assert_eq!(data.maps.len(), 2);
        assert_eq!(data.map_name("m1"), "Meadow");
    }

    #[test]
    fn test_map_name_falls_back_to_id() {
        let data = sample();
        assert_eq!(data.map_name("nowhere"), "nowhere");
    }

    #[test]
    fn test_update_map() {
        let mut data = sample();
        let mut edited = data.map("m2").unwrap().clone();
        edited.name = "Deep Cave".to_string();
        edited.is_safe = false;
        data.update_map(edited).unwrap();
        assert_eq!(data.map("m2").unwrap().name, "Deep Cave");

        let unknown = data.update_map(GameMap::new("m9", "", 1, 1));
        assert!(matches!(unknown, Err(MapDataError::NotFound { kind: "map", .. })));
    }

    #[test]
    fn test_delete_map_cascades() {
        let mut data = sample();
        data.paint_terrain("m1", 0, 0, "WATER");
        data.paint_terrain("m2", 0, 0, "ROCK");
        data.place_entity("m1", 1, 1, EntityType::Npc, "smith").unwrap();
        data.place_entity("m2", 1, 1, EntityType::Campfire, "campfire")
            .unwrap();

        let removed = data.delete_map("m1").unwrap();
        assert_eq!(removed.id, "m1");
        assert!(data.terrain.iter().all(|t| t.map_id != "m1"));
        assert!(data.entities.iter().all(|e| e.map_id != "m1"));
        assert!(data.waypoints.iter().all(|w| w.map_id != "m1"));

        // Other maps untouched
        assert_eq!(data.terrain.len(), 1);
        assert_eq!(data.entities.len(), 1);
        assert_eq!(data.waypoints.len(), 1);

        assert!(matches!(
            data.delete_map("m1"),
            Err(MapDataError::NotFound { .. })
        ));
    }

    #[test]
    fn test_paint_overwrites_single_cell() {
        let mut data = sample();
        data.paint_terrain("m1", 2, 1, "WATER");
        data.paint_terrain("m1", 2, 1, "SAND");

        let cells: Vec<_> = data
            .terrain
            .iter()
            .filter(|t| t.is_cell("m1", 2, 1))
            .collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].primary_terrain(), Some("SAND"));
    }

    #[test]
    fn test_paint_does_not_merge_into_larger_rect() {
        let mut data = sample();
        data.terrain.push(TerrainRect {
            map_id: "m1".to_string(),
            x1: 0,
            y1: 0,
            x2: 3,
            y2: 2,
            terrain_types: vec!["SNOW".to_string()],
            extra: Record::new(),
        });
        data.paint_terrain("m1", 1, 1, "WATER");

        assert_eq!(data.terrain.len(), 2);
        assert_eq!(data.terrain[0].primary_terrain(), Some("SNOW"));
    }

    #[test]
    fn test_grid_defaults_without_rects() {
        let data = sample();
        let map = data.map("m1").unwrap();
        let grid = data.build_terrain_grid(map);
        assert_eq!((grid.width(), grid.height()), (4, 3));
        assert!(grid.rows().iter().flatten().all(|t| *t == "GRASS"));
    }

    #[test]
    fn test_grid_of_oversized_map_does_not_overflow() {
        let mut data = MapData::new();
        let map = GameMap::new("big", "Big", 70000, 70000);
        data.terrain.push(TerrainRect::single_cell("big", 5, 5, "WATER"));

        let grid = data.build_terrain_grid(&map);
        assert_eq!(grid.width(), crate::records::MAX_MAP_DIMENSION);
        assert_eq!(grid.get(5, 5), Some("WATER"));
    }

    #[test]
    fn test_grid_later_rect_wins() {
        let mut data = sample();
        data.terrain.push(TerrainRect {
            map_id: "m1".to_string(),
            x1: 0,
            y1: 0,
            x2: 1,
            y2: 1,
            terrain_types: vec!["WATER".to_string()],
            extra: Record::new(),
        });
        data.terrain.push(TerrainRect {
            map_id: "m1".to_string(),
            x1: 1,
            y1: 1,
            x2: 9,
            y2: 9,
            terrain_types: vec!["ROCK".to_string(), "WATER".to_string()],
            extra: Record::new(),
        });
        // A rect with no terrain list paints the default
        data.terrain.push(TerrainRect {
            map_id: "m1".to_string(),
            x1: 0,
            y1: 0,
            x2: 0,
            y2: 0,
            terrain_types: Vec::new(),
            extra: Record::new(),
        });
        let map = data.map("m1").unwrap().clone();
        let grid = data.build_terrain_grid(&map);

        assert_eq!(grid.get(0, 0), Some("GRASS"));
        assert_eq!(grid.get(1, 0), Some("WATER"));
        assert_eq!(grid.get(1, 1), Some("ROCK"));
        assert_eq!(grid.get(3, 2), Some("ROCK"));
        assert_eq!(grid.get(0, 2), Some("GRASS"));
    }

    #[test]
    fn test_place_entity_collision() {
        let mut data = sample();
        let placed = data
            .place_entity("m1", 1, 1, EntityType::Enemy, "goblin")
            .unwrap();
        assert_eq!(placed.instance_id, "goblin_1_1");
        assert_eq!(placed.connection_prompt, None);

        let err = data
            .place_entity("m1", 1, 1, EntityType::Enemy, "orc")
            .unwrap_err();
        assert_eq!(
            err,
            MapDataError::CellOccupied {
                x: 1,
                y: 1,
                existing: EntityType::Enemy
            }
        );

        // Same cell on another map is free
        assert!(data
            .place_entity("m2", 1, 1, EntityType::Enemy, "orc")
            .is_ok());
        assert_eq!(data.entities.len(), 2);
    }

    #[test]
    fn test_waypoint_placement_prompts_connections() {
        let mut data = sample();
        let placed = data
            .place_entity("m1", 0, 0, EntityType::Waypoint, "wp1")
            .unwrap();
        assert_eq!(placed.connection_prompt.as_deref(), Some("wp1"));
        assert_eq!(placed.instance_id, "");
    }

    #[test]
    fn test_delete_entity_at() {
        let mut data = sample();
        data.place_entity("m1", 3, 2, EntityType::Npc, "smith").unwrap();

        let removed = data.delete_entity_at("m1", 3, 2).unwrap();
        assert_eq!(removed.entity_id, "smith");
        assert!(data.entity_at("m1", 3, 2).is_none());

        assert!(matches!(
            data.delete_entity_at("m1", 3, 2),
            Err(MapDataError::NotFound { kind: "entity", .. })
        ));
    }

    #[test]
    fn test_connections_are_directed_and_deduplicated() {
        let mut data = sample();
        data.set_waypoint_connections("wp1", ["wp2", "wp2"]).unwrap();

        assert_eq!(data.waypoint("wp1").unwrap().connected_waypoint_ids, vec!["wp2"]);
        assert!(data.waypoint("wp2").unwrap().connected_waypoint_ids.is_empty());

        let err = data.set_waypoint_connections("wp9", Vec::<String>::new());
        assert!(matches!(err, Err(MapDataError::NotFound { kind: "waypoint", .. })));
    }

    #[test]
    fn test_entity_id_choices() {
        let mut data = sample();
        data.enemies.push(CatalogEntry {
            id: "goblin".to_string(),
            name: "Goblin".to_string(),
        });

        assert_eq!(data.entity_ids_for(EntityType::Waypoint), vec!["wp1", "wp2"]);
        assert_eq!(data.entity_ids_for(EntityType::Enemy), vec!["goblin"]);
        assert!(data.entity_ids_for(EntityType::Npc).is_empty());
        assert_eq!(data.entity_ids_for(EntityType::Campfire), vec!["campfire"]);
    }

    #[test]
    fn test_dirty_tracking_and_save() {
        let mut data = sample();
        assert!(data.is_dirty());

        let mut store = MemoryStore::new();
        data.save(&mut store).unwrap();
        assert!(!data.is_dirty());
        assert!(store.contains(Table::Maps));
        assert!(!store.contains(Table::Npcs));

        data.paint_terrain("m1", 0, 0, "WALL");
        assert!(data.is_dirty());
    }

    #[test]
    fn test_undecodable_rows_survive_save() {
        let mut store = MemoryStore::new()
            .with_rows(
                Table::Maps,
                &["id", "name", "width", "height", "recommendedLevel"],
                &[&["m1", "Meadow", "4", "4", "1"], &["cave", "Cave", "5", "5", "high"]],
            )
            .with_rows(
                Table::MapEntities,
                &["mapId", "x", "y", "entityType", "entityId", "instanceId"],
                &[&["m1", "0", "0", "CHEST", "loot", ""]],
            );

        let mut data = MapData::load(&store).unwrap();
        assert_eq!(data.maps.len(), 1);
        assert!(data.entities.is_empty());
        assert!(!data.is_dirty());
        assert_eq!(data.unparsed_rows(Table::Maps).count(), 1);

        data.paint_terrain("m1", 1, 1, "WATER");
        data.save(&mut store).unwrap();

        let maps = store.read_records(Table::Maps).unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[1]["id"], "cave");
        assert_eq!(maps[1]["recommendedLevel"], "high");
        let entities = store.read_records(Table::MapEntities).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0]["entityType"], "CHEST");
    }

    #[test]
    fn test_delete_map_drops_its_undecodable_rows() {
        let store = MemoryStore::new()
            .with_rows(
                Table::Maps,
                &["id", "name", "width", "height"],
                &[&["m1", "Meadow", "4", "4"], &["m2", "Cave", "2", "2"]],
            )
            .with_rows(
                Table::MapEntities,
                &["mapId", "x", "y", "entityType", "entityId", "instanceId"],
                &[&["m1", "0", "0", "CHEST", "loot", ""], &["m2", "1", "1", "CHEST", "gold", ""]],
            );

        let mut data = MapData::load(&store).unwrap();
        data.delete_map("m1").unwrap();

        let kept: Vec<_> = data.unparsed_rows(Table::MapEntities).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["mapId"], "m2");
    }

    #[test]
    fn test_update_map_keeps_unmodelled_columns() {
        let store = MemoryStore::new().with_rows(
            Table::Maps,
            &["id", "name", "width", "height", "music"],
            &[&["m1", "Meadow", "4", "4", "calm.ogg"]],
        );
        let mut data = MapData::load(&store).unwrap();

        let mut edited = GameMap::new("m1", "Sunny Meadow", 6, 4);
        edited.is_safe = false;
        data.update_map(edited).unwrap();

        let map = data.map("m1").unwrap();
        assert_eq!(map.name, "Sunny Meadow");
        assert_eq!(map.extra["music"], "calm.ogg");
        assert_eq!(map.to_record()["music"], "calm.ogg");
    }
}
