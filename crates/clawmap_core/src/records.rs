//! Typed records for each map table
//!
//! Every table row is decoded from a string [`Record`] into an explicit struct
//! with parsed numbers and booleans, and only turned back into strings when the
//! table is written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::{Record, Table};

/// Separator inside `terrainTypes`
pub const TERRAIN_LIST_SEPARATOR: &str = ",";
/// Separator inside `connectedWaypointIds`
pub const CONNECTION_LIST_SEPARATOR: &str = ";";
/// Terrain used when a map row has no `defaultTerrain`
pub const DEFAULT_TERRAIN: &str = "GRASS";
/// Entity id used for every campfire placement
pub const CAMPFIRE_ENTITY_ID: &str = "campfire";
/// Largest accepted map width or height, in cells
pub const MAX_MAP_DIMENSION: u32 = 1024;

/// Errors raised while decoding a string record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' has invalid value '{value}' (expected {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Decode a typed value from a string record
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> Result<Self, RecordError>;
}

/// A record type backed by a writable table
pub trait TableRecord: FromRecord {
    const TABLE: Table;
    /// Header used when the table file does not exist yet
    const FIELDS: &'static [&'static str];

    fn to_record(&self) -> Record;

    fn default_field_order() -> Vec<String> {
        Self::FIELDS.iter().map(|f| f.to_string()).collect()
    }
}

fn required<'a>(record: &'a Record, field: &'static str) -> Result<&'a str, RecordError> {
    record
        .get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(RecordError::MissingField(field))
}

fn optional<'a>(record: &'a Record, field: &str) -> &'a str {
    record.get(field).map(String::as_str).unwrap_or("")
}

fn parse_number<T: FromStr>(
    record: &Record,
    field: &'static str,
    expected: &'static str,
) -> Result<T, RecordError> {
    let value = required(record, field)?;
    value.parse().map_err(|_| RecordError::InvalidValue {
        field,
        value: value.to_string(),
        expected,
    })
}

/// `"true"` in any case is true; anything else is false
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Lowercase boolean encoding used by the tables
pub fn encode_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

fn split_list(value: &str, separator: &str) -> Vec<String> {
    value
        .split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fields of a record outside `known`, carried so a save writes them back as read
fn extra_fields(record: &Record, known: &[&str]) -> Record {
    record
        .iter()
        .filter(|(field, _)| !known.contains(&field.as_str()))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}

/// Typed fields written over the carried extra fields
fn to_record(extra: &Record, pairs: Vec<(&str, String)>) -> Record {
    let mut record = extra.clone();
    record.extend(pairs.into_iter().map(|(k, v)| (k.to_string(), v)));
    record
}

fn parse_dimension(record: &Record, field: &'static str) -> Result<u32, RecordError> {
    const EXPECTED: &str = "an integer from 1 to 1024";
    let value: u32 = parse_number(record, field, EXPECTED)?;
    if value == 0 || value > MAX_MAP_DIMENSION {
        return Err(RecordError::InvalidValue {
            field,
            value: value.to_string(),
            expected: EXPECTED,
        });
    }
    Ok(value)
}

// ============================================================================
// Maps
// ============================================================================

/// A game map (row of `maps.csv`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMap {
    pub id: String,
    pub name: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub is_safe: bool,
    pub recommended_level: i32,
    pub default_terrain: String,
    /// Columns the editor does not model, written back unchanged
    #[serde(skip)]
    pub extra: Record,
}

impl GameMap {
    /// Create a safe, level 1 map with the default terrain
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            width,
            height,
            is_safe: true,
            recommended_level: 1,
            default_terrain: DEFAULT_TERRAIN.to_string(),
            extra: Record::new(),
        }
    }

    /// Whether a cell lies inside `[0,width) x [0,height)`
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

impl FromRecord for GameMap {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        let width = parse_dimension(record, "width")?;
        let height = parse_dimension(record, "height")?;

        let recommended_level = if optional(record, "recommendedLevel").trim().is_empty() {
            1
        } else {
            parse_number(record, "recommendedLevel", "an integer")?
        };

        let default_terrain = match optional(record, "defaultTerrain").trim() {
            "" => DEFAULT_TERRAIN.to_string(),
            tag => tag.to_string(),
        };

        Ok(Self {
            id: required(record, "id")?.to_string(),
            name: optional(record, "name").to_string(),
            description: optional(record, "description").to_string(),
            width,
            height,
            // A missing column means a safe map, like the new-map form default
            is_safe: record.get("isSafe").map(|v| parse_bool(v)).unwrap_or(true),
            recommended_level,
            default_terrain,
            extra: extra_fields(record, Self::FIELDS),
        })
    }
}

impl TableRecord for GameMap {
    const TABLE: Table = Table::Maps;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "description",
        "width",
        "height",
        "isSafe",
        "recommendedLevel",
        "defaultTerrain",
    ];

    fn to_record(&self) -> Record {
        to_record(
            &self.extra,
            vec![
                ("id", self.id.clone()),
                ("name", self.name.clone()),
                ("description", self.description.clone()),
                ("width", self.width.to_string()),
                ("height", self.height.to_string()),
                ("isSafe", encode_bool(self.is_safe)),
                ("recommendedLevel", self.recommended_level.to_string()),
                ("defaultTerrain", self.default_terrain.clone()),
            ],
        )
    }
}

// ============================================================================
// Terrain rectangles
// ============================================================================

/// An inclusive cell range painted with a terrain (row of `map_terrain.csv`)
///
/// `(x1, y1)` is the lower-left corner, `(x2, y2)` the upper-right one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainRect {
    pub map_id: String,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Only the first entry is used for painting
    pub terrain_types: Vec<String>,
    #[serde(skip)]
    pub extra: Record,
}

impl TerrainRect {
    /// A 1x1 rectangle covering a single cell
    pub fn single_cell(map_id: impl Into<String>, x: i32, y: i32, terrain: impl Into<String>) -> Self {
        Self {
            map_id: map_id.into(),
            x1: x,
            y1: y,
            x2: x,
            y2: y,
            terrain_types: vec![terrain.into()],
            extra: Record::new(),
        }
    }

    /// The terrain this rectangle paints, if any
    pub fn primary_terrain(&self) -> Option<&str> {
        self.terrain_types.first().map(String::as_str)
    }

    /// Whether this is exactly the 1x1 rectangle at `(x, y)` on `map_id`
    pub fn is_cell(&self, map_id: &str, x: i32, y: i32) -> bool {
        self.map_id == map_id && self.x1 == x && self.y1 == y && self.x2 == x && self.y2 == y
    }
}

impl FromRecord for TerrainRect {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            map_id: required(record, "mapId")?.to_string(),
            x1: parse_number(record, "x1", "an integer")?,
            y1: parse_number(record, "y1", "an integer")?,
            x2: parse_number(record, "x2", "an integer")?,
            y2: parse_number(record, "y2", "an integer")?,
            terrain_types: split_list(optional(record, "terrainTypes"), TERRAIN_LIST_SEPARATOR),
            extra: extra_fields(record, Self::FIELDS),
        })
    }
}

impl TableRecord for TerrainRect {
    const TABLE: Table = Table::MapTerrain;
    const FIELDS: &'static [&'static str] = &["mapId", "x1", "y1", "x2", "y2", "terrainTypes"];

    fn to_record(&self) -> Record {
        to_record(
            &self.extra,
            vec![
                ("mapId", self.map_id.clone()),
                ("x1", self.x1.to_string()),
                ("y1", self.y1.to_string()),
                ("x2", self.x2.to_string()),
                ("y2", self.y2.to_string()),
                (
                    "terrainTypes",
                    self.terrain_types.join(TERRAIN_LIST_SEPARATOR),
                ),
            ],
        )
    }
}

// ============================================================================
// Entity placements
// ============================================================================

/// Kind of entity that can be placed on a map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    #[default]
    Waypoint,
    Npc,
    Enemy,
    Campfire,
}

impl EntityType {
    /// Tag stored in the `entityType` column
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Waypoint => "WAYPOINT",
            EntityType::Npc => "NPC",
            EntityType::Enemy => "ENEMY",
            EntityType::Campfire => "CAMPFIRE",
        }
    }

    /// Returns all entity types for UI enumeration
    pub fn all() -> &'static [EntityType] {
        &[
            EntityType::Waypoint,
            EntityType::Npc,
            EntityType::Enemy,
            EntityType::Campfire,
        ]
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RecordError::InvalidValue {
                field: "entityType",
                value: s.to_string(),
                expected: "WAYPOINT, NPC, ENEMY or CAMPFIRE",
            })
    }
}

/// An entity occupying one map cell (row of `map_entities.csv`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPlacement {
    pub map_id: String,
    pub x: i32,
    pub y: i32,
    pub entity_type: EntityType,
    pub entity_id: String,
    /// `"{entityId}_{x}_{y}"` for enemies, empty otherwise
    pub instance_id: String,
    #[serde(skip)]
    pub extra: Record,
}

impl EntityPlacement {
    pub fn new(
        map_id: impl Into<String>,
        x: i32,
        y: i32,
        entity_type: EntityType,
        entity_id: impl Into<String>,
    ) -> Self {
        let entity_id = entity_id.into();
        let instance_id = instance_id_for(entity_type, &entity_id, x, y);
        Self {
            map_id: map_id.into(),
            x,
            y,
            entity_type,
            entity_id,
            instance_id,
            extra: Record::new(),
        }
    }

    pub fn is_at(&self, map_id: &str, x: i32, y: i32) -> bool {
        self.map_id == map_id && self.x == x && self.y == y
    }
}

/// Instance id for a placement; distinguishes several copies of one enemy template
pub fn instance_id_for(entity_type: EntityType, entity_id: &str, x: i32, y: i32) -> String {
    match entity_type {
        EntityType::Enemy => format!("{}_{}_{}", entity_id, x, y),
        _ => String::new(),
    }
}

impl FromRecord for EntityPlacement {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            map_id: required(record, "mapId")?.to_string(),
            x: parse_number(record, "x", "an integer")?,
            y: parse_number(record, "y", "an integer")?,
            entity_type: required(record, "entityType")?.parse()?,
            entity_id: required(record, "entityId")?.to_string(),
            instance_id: optional(record, "instanceId").to_string(),
            extra: extra_fields(record, Self::FIELDS),
        })
    }
}

impl TableRecord for EntityPlacement {
    const TABLE: Table = Table::MapEntities;
    const FIELDS: &'static [&'static str] =
        &["mapId", "x", "y", "entityType", "entityId", "instanceId"];

    fn to_record(&self) -> Record {
        to_record(
            &self.extra,
            vec![
                ("mapId", self.map_id.clone()),
                ("x", self.x.to_string()),
                ("y", self.y.to_string()),
                ("entityType", self.entity_type.as_str().to_string()),
                ("entityId", self.entity_id.clone()),
                ("instanceId", self.instance_id.clone()),
            ],
        )
    }
}

// ============================================================================
// Waypoints
// ============================================================================

/// A named travel point (row of `waypoints.csv`)
///
/// Connections are directed: listing B here does not make B list this waypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub id: String,
    pub map_id: String,
    pub name: String,
    pub description: String,
    pub x: i32,
    pub y: i32,
    pub connected_waypoint_ids: Vec<String>,
    #[serde(skip)]
    pub extra: Record,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, map_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            map_id: map_id.into(),
            name: name.into(),
            description: String::new(),
            x: 0,
            y: 0,
            connected_waypoint_ids: Vec::new(),
            extra: Record::new(),
        }
    }

    pub fn is_connected_to(&self, waypoint_id: &str) -> bool {
        self.connected_waypoint_ids.iter().any(|id| id == waypoint_id)
    }
}

impl FromRecord for Waypoint {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        // Coordinates are informational for the editor; tolerate blanks
        let coord = |field: &'static str| -> Result<i32, RecordError> {
            if optional(record, field).trim().is_empty() {
                Ok(0)
            } else {
                parse_number(record, field, "an integer")
            }
        };

        Ok(Self {
            id: required(record, "id")?.to_string(),
            map_id: optional(record, "mapId").to_string(),
            name: optional(record, "name").to_string(),
            description: optional(record, "description").to_string(),
            x: coord("x")?,
            y: coord("y")?,
            connected_waypoint_ids: split_list(
                optional(record, "connectedWaypointIds"),
                CONNECTION_LIST_SEPARATOR,
            ),
            extra: extra_fields(record, Self::FIELDS),
        })
    }
}

impl TableRecord for Waypoint {
    const TABLE: Table = Table::Waypoints;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "mapId",
        "name",
        "description",
        "x",
        "y",
        "connectedWaypointIds",
    ];

    fn to_record(&self) -> Record {
        to_record(
            &self.extra,
            vec![
                ("id", self.id.clone()),
                ("mapId", self.map_id.clone()),
                ("name", self.name.clone()),
                ("description", self.description.clone()),
                ("x", self.x.to_string()),
                ("y", self.y.to_string()),
                (
                    "connectedWaypointIds",
                    self.connected_waypoint_ids.join(CONNECTION_LIST_SEPARATOR),
                ),
            ],
        )
    }
}

// ============================================================================
// Catalogs
// ============================================================================

/// Read-only NPC or enemy entry offering a valid `entityId`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl FromRecord for CatalogEntry {
    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            id: required(record, "id")?.to_string(),
            name: optional(record, "name").to_string(),
        })
    }
}
