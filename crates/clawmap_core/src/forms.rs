//! Property dialog state: map metadata and waypoint connection forms
//!
//! Forms hold raw text the way the user typed it; validation happens only on
//! commit, so a half-typed number never touches the data model.

use crate::data::{MapData, MapDataError};
use crate::records::{GameMap, DEFAULT_TERRAIN, MAX_MAP_DIMENSION};
use crate::store::Record;

/// Editable fields of the new-map / map-properties dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub width: String,
    pub height: String,
    pub is_safe: bool,
    pub recommended_level: String,
    pub default_terrain: String,
}

impl Default for MapForm {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            width: "10".to_string(),
            height: "10".to_string(),
            is_safe: true,
            recommended_level: "1".to_string(),
            default_terrain: DEFAULT_TERRAIN.to_string(),
        }
    }
}

fn parse_dimension(field: &'static str, value: &str) -> Result<u32, MapDataError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 && n <= MAX_MAP_DIMENSION => Ok(n),
        _ => Err(MapDataError::InvalidField {
            field,
            message: format!(
                "'{}' is not an integer from 1 to {}",
                value.trim(),
                MAX_MAP_DIMENSION
            ),
        }),
    }
}

impl MapForm {
    /// Prefill from an existing map for the properties dialog
    pub fn from_map(map: &GameMap) -> Self {
        Self {
            id: map.id.clone(),
            name: map.name.clone(),
            description: map.description.clone(),
            width: map.width.to_string(),
            height: map.height.to_string(),
            is_safe: map.is_safe,
            recommended_level: map.recommended_level.to_string(),
            default_terrain: map.default_terrain.clone(),
        }
    }

    /// Validate and build the map
    pub fn to_map(&self) -> Result<GameMap, MapDataError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(MapDataError::InvalidField {
                field: "id",
                message: "must not be empty".to_string(),
            });
        }

        let width = parse_dimension("width", &self.width)?;
        let height = parse_dimension("height", &self.height)?;
        let recommended_level =
            self.recommended_level
                .trim()
                .parse::<i32>()
                .map_err(|_| MapDataError::InvalidField {
                    field: "recommendedLevel",
                    message: format!("'{}' is not an integer", self.recommended_level.trim()),
                })?;

        let default_terrain = match self.default_terrain.trim() {
            "" => DEFAULT_TERRAIN.to_string(),
            tag => tag.to_string(),
        };

        Ok(GameMap {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            width,
            height,
            is_safe: self.is_safe,
            recommended_level,
            default_terrain,
            extra: Record::new(),
        })
    }

    /// Create a new map from the form; returns the new id
    pub fn commit_new(&self, data: &mut MapData) -> Result<String, MapDataError> {
        let map = self.to_map()?;
        let id = map.id.clone();
        data.create_map(map)?;
        Ok(id)
    }

    /// Apply the form to the existing map with the same id
    pub fn commit_edit(&self, data: &mut MapData) -> Result<(), MapDataError> {
        data.update_map(self.to_map()?)
    }
}

/// One checkbox of the connection dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionToggle {
    pub waypoint_id: String,
    pub label: String,
    pub checked: bool,
}

/// Connection checklist for one waypoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaypointConnectionsForm {
    pub waypoint_id: String,
    pub toggles: Vec<ConnectionToggle>,
}

impl WaypointConnectionsForm {
    /// List every other waypoint, pre-checked when already connected
    pub fn new(data: &MapData, waypoint_id: &str) -> Result<Self, MapDataError> {
        let waypoint = data.waypoint(waypoint_id).ok_or_else(|| MapDataError::NotFound {
            kind: "waypoint",
            id: waypoint_id.to_string(),
        })?;

        let toggles = data
            .waypoints
            .iter()
            .filter(|other| other.id != waypoint.id)
            .map(|other| ConnectionToggle {
                waypoint_id: other.id.clone(),
                label: format!(
                    "{} ({} - {})",
                    other.id,
                    other.name,
                    data.map_name(&other.map_id)
                ),
                checked: waypoint.is_connected_to(&other.id),
            })
            .collect();

        Ok(Self {
            waypoint_id: waypoint_id.to_string(),
            toggles,
        })
    }

    pub fn checked_ids(&self) -> Vec<String> {
        self.toggles
            .iter()
            .filter(|t| t.checked)
            .map(|t| t.waypoint_id.clone())
            .collect()
    }

    /// Replace the waypoint's connections with the checked ids
    pub fn commit(&self, data: &mut MapData) -> Result<(), MapDataError> {
        data.set_waypoint_connections(&self.waypoint_id, self.checked_ids())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Waypoint;

    #[test]
    fn test_new_map_defaults() {
        let form = MapForm {
            id: "village".to_string(),
            ..Default::default()
        };
        let map = form.to_map().unwrap();
        assert_eq!((map.width, map.height), (10, 10));
        assert!(map.is_safe);
        assert_eq!(map.recommended_level, 1);
        assert_eq!(map.default_terrain, "GRASS");
    }

    #[test]
    fn test_map_form_validation() {
        let empty_id = MapForm::default().to_map().unwrap_err();
        assert!(matches!(empty_id, MapDataError::InvalidField { field: "id", .. }));

        let zero_width = MapForm {
            id: "m".to_string(),
            width: "0".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            zero_width.to_map(),
            Err(MapDataError::InvalidField { field: "width", .. })
        ));

        let huge_height = MapForm {
            id: "m".to_string(),
            height: "70000".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            huge_height.to_map(),
            Err(MapDataError::InvalidField { field: "height", .. })
        ));

        let bad_level = MapForm {
            id: "m".to_string(),
            recommended_level: "high".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            bad_level.to_map(),
            Err(MapDataError::InvalidField {
                field: "recommendedLevel",
                ..
            })
        ));
    }

    #[test]
    fn test_commit_new_and_edit() {
        let mut data = MapData::new();
        let form = MapForm {
            id: " cave ".to_string(),
            name: "Cave".to_string(),
            width: "6".to_string(),
            ..Default::default()
        };
        assert_eq!(form.commit_new(&mut data).unwrap(), "cave");
        assert_eq!(
            form.commit_new(&mut data),
            Err(MapDataError::DuplicateId("cave".to_string()))
        );

        let mut edit = MapForm::from_map(data.map("cave").unwrap());
        edit.is_safe = false;
        edit.default_terrain = "ROCK".to_string();
        edit.commit_edit(&mut data).unwrap();

        let map = data.map("cave").unwrap();
        assert!(!map.is_safe);
        assert_eq!(map.default_terrain, "ROCK");
        assert_eq!(map.width, 6);
    }

    #[test]
    fn test_connection_form_labels_and_commit() {
        let mut data = MapData::new();
        data.create_map(GameMap::new("m1", "Meadow", 4, 4)).unwrap();
        let mut gate = Waypoint::new("wp1", "m1", "Gate");
        gate.connected_waypoint_ids = vec!["wp2".to_string()];
        data.waypoints.push(gate);
        data.waypoints.push(Waypoint::new("wp2", "m1", "Well"));
        data.waypoints.push(Waypoint::new("wp3", "lost", "Ruins"));

        let mut form = WaypointConnectionsForm::new(&data, "wp1").unwrap();
        let labels: Vec<_> = form.toggles.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["wp2 (Well - Meadow)", "wp3 (Ruins - lost)"]);
        assert_eq!(form.checked_ids(), vec!["wp2"]);

        form.toggles[0].checked = false;
        form.toggles[1].checked = true;
        form.commit(&mut data).unwrap();
        assert_eq!(data.waypoint("wp1").unwrap().connected_waypoint_ids, vec!["wp3"]);
        assert!(data.waypoint("wp3").unwrap().connected_waypoint_ids.is_empty());

        assert!(WaypointConnectionsForm::new(&data, "nope").is_err());
    }
}
