//! Core data structures and editing logic for clawmap
//!
//! This crate holds everything the editor does that is not drawing widgets:
//! - `RecordStore` - Tabular record access (`CsvStore` for a data directory, `MemoryStore` for tests)
//! - `GameMap`, `TerrainRect`, `EntityPlacement`, `Waypoint` - Typed table rows
//! - `MapData` - In-memory tables with the map, terrain, entity and waypoint operations
//! - `GridRenderer` - Projects a map onto canvas pixels as `DrawCommand`s
//! - `InteractionController` - Turns canvas pointer events into edits
//! - `MapForm`, `WaypointConnectionsForm` - Property dialog state and validation

mod data;
mod forms;
mod records;
mod render;
mod store;
mod terrain;
mod tools;

pub use data::{MapData, MapDataError, PlacedEntity};
pub use forms::{ConnectionToggle, MapForm, WaypointConnectionsForm};
pub use records::{
    encode_bool, instance_id_for, parse_bool, CatalogEntry, EntityPlacement, EntityType,
    FromRecord, GameMap, RecordError, TableRecord, TerrainRect, Waypoint, CAMPFIRE_ENTITY_ID,
    CONNECTION_LIST_SEPARATOR, DEFAULT_TERRAIN, MAX_MAP_DIMENSION, TERRAIN_LIST_SEPARATOR,
};
pub use render::{DrawCommand, GridRenderer, AXIS_LABEL_MARGIN_X, AXIS_LABEL_MARGIN_Y};
pub use store::{CsvStore, MemoryStore, Record, RecordStore, StoreError, Table};
pub use terrain::{entity_color, terrain_color, Rgb, TerrainGrid, TerrainKind};
pub use tools::{
    canvas_to_cell, InteractionController, Notice, NoticeLevel, PointerEvent, ToolMode,
    ToolOutcome,
};
