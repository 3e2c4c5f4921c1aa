//! Interaction controller - turns canvas pointer input into map edits
//!
//! The active [`ToolMode`] is chosen from outside (tool radio buttons) and
//! never changes on its own. Pointer-down events are handled in every mode,
//! pointer-drag events only while painting terrain.

use serde::{Deserialize, Serialize};

use crate::data::{MapData, MapDataError, PlacedEntity};
use crate::records::{EntityPlacement, EntityType, GameMap, DEFAULT_TERRAIN};

/// Available editing tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    PaintTerrain,
    PlaceEntity,
    DeleteEntity,
}

impl ToolMode {
    pub fn label(&self) -> &'static str {
        match self {
            ToolMode::PaintTerrain => "Terrain",
            ToolMode::PlaceEntity => "Entity",
            ToolMode::DeleteEntity => "Delete Entity",
        }
    }

    /// Returns all tools for UI enumeration
    pub fn all() -> &'static [ToolMode] {
        &[
            ToolMode::PaintTerrain,
            ToolMode::PlaceEntity,
            ToolMode::DeleteEntity,
        ]
    }
}

/// Kind of pointer event on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down,
    Drag,
}

/// Convert canvas pixels to a map cell, inverting the renderer's vertical flip.
///
/// Returns `None` when the position falls outside `[0,width) x [0,height)`.
pub fn canvas_to_cell(canvas_x: f32, canvas_y: f32, cell_size: f32, map: &GameMap) -> Option<(i32, i32)> {
    if cell_size <= 0.0 {
        return None;
    }
    let x = (canvas_x / cell_size).floor() as i32;
    let y = map.height as i32 - 1 - (canvas_y / cell_size).floor() as i32;
    map.contains(x, y).then_some((x, y))
}

/// What a handled pointer event did to the data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Outside the map, or a drag outside paint mode
    Ignored,
    Painted { x: i32, y: i32 },
    Placed {
        x: i32,
        y: i32,
        placed: PlacedEntity,
    },
    Deleted(EntityPlacement),
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message to show the user after a refused operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&MapDataError> for Notice {
    fn from(error: &MapDataError) -> Self {
        match error {
            MapDataError::CellOccupied { existing, .. } => {
                Notice::warning(format!("An entity already exists here: {}", existing))
            }
            MapDataError::NotFound { kind: "entity", .. } => {
                Notice::info("There is no entity at this position")
            }
            MapDataError::MissingSelection(_) => Notice::warning(error.to_string()),
            MapDataError::NotFound { .. }
            | MapDataError::DuplicateId(_)
            | MapDataError::InvalidField { .. } => Notice::error(error.to_string()),
        }
    }
}

/// Tool state plus the current brush selections
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    pub tool: ToolMode,
    pub cell_size: f32,
    /// Terrain tag used by the paint tool
    pub terrain: String,
    pub entity_type: EntityType,
    /// Catalog id used by the place tool; empty means nothing selected
    pub entity_id: String,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self {
            tool: ToolMode::PaintTerrain,
            cell_size: 30.0,
            terrain: DEFAULT_TERRAIN.to_string(),
            entity_type: EntityType::Waypoint,
            entity_id: String::new(),
        }
    }
}

impl InteractionController {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            ..Default::default()
        }
    }

    /// Switch the entity type and pick the first valid id for it
    pub fn select_entity_type(&mut self, data: &MapData, entity_type: EntityType) {
        self.entity_type = entity_type;
        self.entity_id = data
            .entity_ids_for(entity_type)
            .into_iter()
            .next()
            .unwrap_or_default();
    }

    /// Handle one pointer event at canvas coordinates on `map_id`
    pub fn handle_pointer(
        &self,
        data: &mut MapData,
        map_id: &str,
        event: PointerEvent,
        canvas_x: f32,
        canvas_y: f32,
    ) -> Result<ToolOutcome, MapDataError> {
        if event == PointerEvent::Drag && self.tool != ToolMode::PaintTerrain {
            return Ok(ToolOutcome::Ignored);
        }

        let map = data.map(map_id).ok_or(MapDataError::MissingSelection("map"))?;
        let Some((x, y)) = canvas_to_cell(canvas_x, canvas_y, self.cell_size, map) else {
            return Ok(ToolOutcome::Ignored);
        };

        self.apply_at(data, map_id, x, y)
    }

    /// Apply the active tool to a cell already known to be inside the map
    pub fn apply_at(
        &self,
        data: &mut MapData,
        map_id: &str,
        x: i32,
        y: i32,
    ) -> Result<ToolOutcome, MapDataError> {
        match self.tool {
            ToolMode::PaintTerrain => {
                data.paint_terrain(map_id, x, y, &self.terrain);
                Ok(ToolOutcome::Painted { x, y })
            }
            ToolMode::PlaceEntity => {
                if self.entity_id.trim().is_empty() {
                    return Err(MapDataError::MissingSelection("entity id"));
                }
                let placed = data.place_entity(map_id, x, y, self.entity_type, &self.entity_id)?;
                Ok(ToolOutcome::Placed { x, y, placed })
            }
            ToolMode::DeleteEntity => data
                .delete_entity_at(map_id, x, y)
                .map(ToolOutcome::Deleted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CatalogEntry, Waypoint};

    fn setup() -> MapData {
        let mut data = MapData::new();
        data.create_map(GameMap::new("m1", "Meadow", 3, 2)).unwrap();
        data.waypoints.push(Waypoint::new("wp1", "m1", "Gate"));
        data.enemies.push(CatalogEntry {
            id: "goblin".to_string(),
            name: "Goblin".to_string(),
        });
        data
    }

    #[test]
    fn test_canvas_to_cell_inverts_flip() {
        let map = GameMap::new("m1", "", 3, 2);
        assert_eq!(canvas_to_cell(5.0, 15.0, 10.0, &map), Some((0, 0)));
        assert_eq!(canvas_to_cell(29.9, 0.0, 10.0, &map), Some((2, 1)));
        assert_eq!(canvas_to_cell(30.0, 0.0, 10.0, &map), None);
        assert_eq!(canvas_to_cell(5.0, 20.0, 10.0, &map), None);
        assert_eq!(canvas_to_cell(-1.0, 5.0, 10.0, &map), None);
    }

    #[test]
    fn test_paint_on_down_and_drag() {
        let mut data = setup();
        let mut controller = InteractionController::new(10.0);
        controller.terrain = "WATER".to_string();

        let down = controller
            .handle_pointer(&mut data, "m1", PointerEvent::Down, 5.0, 15.0)
            .unwrap();
        assert_eq!(down, ToolOutcome::Painted { x: 0, y: 0 });

        let drag = controller
            .handle_pointer(&mut data, "m1", PointerEvent::Drag, 15.0, 15.0)
            .unwrap();
        assert_eq!(drag, ToolOutcome::Painted { x: 1, y: 0 });
        assert_eq!(data.terrain.len(), 2);
    }

    #[test]
    fn test_drag_ignored_outside_paint_mode() {
        let mut data = setup();
        let mut controller = InteractionController::new(10.0);
        controller.tool = ToolMode::PlaceEntity;
        controller.select_entity_type(&data, EntityType::Enemy);

        let drag = controller
            .handle_pointer(&mut data, "m1", PointerEvent::Drag, 5.0, 5.0)
            .unwrap();
        assert_eq!(drag, ToolOutcome::Ignored);
        assert!(data.entities.is_empty());
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut data = setup();
        let controller = InteractionController::new(10.0);
        let outcome = controller
            .handle_pointer(&mut data, "m1", PointerEvent::Down, 45.0, 5.0)
            .unwrap();
        assert_eq!(outcome, ToolOutcome::Ignored);
        assert!(data.terrain.is_empty());
    }

    #[test]
    fn test_place_then_occupied_warning() {
        let mut data = setup();
        let mut controller = InteractionController::new(10.0);
        controller.tool = ToolMode::PlaceEntity;
        controller.select_entity_type(&data, EntityType::Enemy);
        assert_eq!(controller.entity_id, "goblin");

        let outcome = controller.apply_at(&mut data, "m1", 1, 1).unwrap();
        match outcome {
            ToolOutcome::Placed { placed, .. } => assert_eq!(placed.instance_id, "goblin_1_1"),
            other => panic!("Expected placement, got {:?}", other),
        }

        let err = controller.apply_at(&mut data, "m1", 1, 1).unwrap_err();
        let notice = Notice::from(&err);
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.message.contains("ENEMY"));
    }

    #[test]
    fn test_place_requires_entity_id() {
        let mut data = setup();
        let mut controller = InteractionController::new(10.0);
        controller.tool = ToolMode::PlaceEntity;
        controller.select_entity_type(&data, EntityType::Npc);
        assert!(controller.entity_id.is_empty());

        let err = controller.apply_at(&mut data, "m1", 0, 0).unwrap_err();
        assert_eq!(err, MapDataError::MissingSelection("entity id"));
    }

    #[test]
    fn test_delete_empty_cell_is_info() {
        let mut data = setup();
        let mut controller = InteractionController::new(10.0);
        controller.tool = ToolMode::DeleteEntity;

        let err = controller.apply_at(&mut data, "m1", 2, 1).unwrap_err();
        assert_eq!(Notice::from(&err).level, NoticeLevel::Info);
    }

    #[test]
    fn test_unknown_map_is_missing_selection() {
        let mut data = setup();
        let controller = InteractionController::new(10.0);
        let err = controller
            .handle_pointer(&mut data, "nope", PointerEvent::Down, 0.0, 0.0)
            .unwrap_err();
        assert_eq!(err, MapDataError::MissingSelection("map"));
    }
}
