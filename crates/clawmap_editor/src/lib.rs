//! clawmap_editor - Desktop editor for ClawWorld map tables
//!
//! This crate wraps `clawmap_core` in a Bevy + egui application:
//! - Data folder management (open, reload, save, recent folders)
//! - Map list with create/delete/properties dialogs
//! - Canvas with terrain painting and entity placement/deletion
//! - Waypoint connection editing
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use clawmap_editor::EditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_data_dir("game/data"))
//!         .run();
//! }
//! ```

pub mod commands;
pub mod preferences;
pub mod project;
pub mod ui;

pub use clawmap_core;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use clawmap_core::{InteractionController, MapForm, Notice, ToolMode, WaypointConnectionsForm};
use std::path::PathBuf;

use commands::handle_keyboard_shortcuts;
use preferences::EditorPreferences;
use project::Project;
use ui::{EditorUiPlugin, PendingAction};

/// Data folder used when neither the plugin nor the preferences name one
pub const DEFAULT_DATA_DIR: &str = "data";

/// Configuration for initial editor state
///
/// Values left as `None` fall back to the saved preferences.
#[derive(Clone, Debug, Default)]
pub struct EditorStateConfig {
    /// Data folder to open on startup
    pub data_dir: Option<PathBuf>,
    /// Canvas cell size in pixels
    pub cell_size: Option<f32>,
    pub initial_tool: Option<ToolMode>,
}

/// Main editor plugin
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use clawmap_editor::{clawmap_core::ToolMode, EditorPlugin};
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         EditorPlugin::new()
///             .with_data_dir("game/data")
///             .with_cell_size(24.0)
///             .with_initial_tool(ToolMode::PlaceEntity)
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct EditorPlugin {
    pub initial_state: EditorStateConfig,
}

impl EditorPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open this data folder on startup instead of the last used one
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.initial_state.data_dir = Some(path.into());
        self
    }

    /// Set the canvas cell size (8 to 96 pixels)
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.initial_state.cell_size = Some(cell_size.clamp(8.0, 96.0));
        self
    }

    pub fn with_initial_tool(mut self, tool: ToolMode) -> Self {
        self.initial_state.initial_tool = Some(tool);
        self
    }
}

/// Startup data folder chosen when the plugin was built
#[derive(Resource, Debug, Clone)]
struct StartupDataDir {
    path: PathBuf,
    /// Set when the folder came from the plugin config rather than a fallback
    explicit: bool,
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        let preferences = EditorPreferences::load();
        bevy::log::info!("Loaded editor preferences");

        // Plugin config takes precedence over saved preferences
        let mut editor_state = EditorState::default();
        editor_state.controller.cell_size =
            self.initial_state.cell_size.unwrap_or(preferences.cell_size);
        editor_state.controller.tool = self
            .initial_state
            .initial_tool
            .unwrap_or(preferences.default_tool);

        let startup_dir = match &self.initial_state.data_dir {
            Some(path) => StartupDataDir {
                path: path.clone(),
                explicit: true,
            },
            None => {
                let last = preferences
                    .last_data_dir()
                    .filter(|_| preferences.auto_open_last_data_dir)
                    .map(|recent| PathBuf::from(&recent.path));
                StartupDataDir {
                    path: last.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
                    explicit: false,
                }
            }
        };
        bevy::log::info!("EditorPlugin: startup data folder {:?}", startup_dir.path);

        app.add_plugins(EguiPlugin::default())
            .add_plugins(EditorUiPlugin)
            .insert_resource(editor_state)
            .insert_resource(preferences)
            .insert_resource(startup_dir)
            .insert_resource(Project::default())
            .add_systems(Startup, (setup_editor_camera, open_startup_data_dir))
            .add_systems(Update, handle_keyboard_shortcuts)
            .add_systems(Update, handle_recent_data_dirs);
    }
}

/// Spawns the editor camera if one doesn't exist
fn setup_editor_camera(mut commands: Commands, camera_query: Query<&Camera2d>) {
    if camera_query.is_empty() {
        commands.spawn(Camera2d);
    }
}

fn open_startup_data_dir(
    startup_dir: Res<StartupDataDir>,
    mut project: ResMut<Project>,
    mut editor_state: ResMut<EditorState>,
) {
    let path = &startup_dir.path;
    if !path.is_dir() {
        if startup_dir.explicit {
            editor_state.error_message = Some(format!("Data folder not found: {}", path.display()));
        } else {
            warn!("Data folder {:?} not found, starting empty", path);
        }
        return;
    }

    match Project::open(path) {
        Ok(loaded) => {
            *project = loaded;
            editor_state.select_first_map(&project);
            editor_state.pending_add_recent_data_dir = Some(path.clone());
        }
        Err(e) => {
            editor_state.error_message = Some(format!("Failed to load data folder: {}", e));
        }
    }
}

/// System to handle recent data folder updates
fn handle_recent_data_dirs(
    mut editor_state: ResMut<EditorState>,
    mut preferences: ResMut<EditorPreferences>,
    mut project: ResMut<Project>,
) {
    if let Some(path) = editor_state.pending_add_recent_data_dir.take() {
        preferences.add_recent_data_dir(path, project.name());
        if let Err(e) = preferences.save() {
            error!("Failed to save preferences: {}", e);
        }
    }

    if let Some(path) = editor_state.pending_open_recent_data_dir.take() {
        match Project::open(&path) {
            Ok(loaded) => {
                *project = loaded;
                editor_state.select_first_map(&project);
                preferences.add_recent_data_dir(path, project.name());
            }
            Err(e) => {
                editor_state.error_message = Some(format!("Failed to load data folder: {}", e));
                preferences.remove_recent_data_dir(&path.to_string_lossy());
            }
        }
        if let Err(e) = preferences.save() {
            error!("Failed to save preferences: {}", e);
        }
    }

    if editor_state.pending_clear_recent_data_dirs {
        editor_state.pending_clear_recent_data_dirs = false;
        preferences.clear_recent_data_dirs();
        if let Err(e) = preferences.save() {
            error!("Failed to save preferences: {}", e);
        }
    }
}

/// Global editor state
#[derive(Resource)]
pub struct EditorState {
    // Selection
    pub selected_map: Option<String>,

    // Tools
    pub controller: InteractionController,
    /// Last cell touched by the current drag, so a held pointer edits each cell once
    pub last_painted_cell: Option<(i32, i32)>,

    // Map dialogs
    pub show_new_map_dialog: bool,
    pub new_map_form: MapForm,
    pub show_map_properties_dialog: bool,
    pub map_properties_form: MapForm,
    /// Map awaiting delete confirmation
    pub pending_delete_map: Option<String>,
    /// Validation error shown inside the open map dialog
    pub form_error: Option<String>,

    // Waypoint dialogs
    /// Waypoint just placed; asks whether to edit its connections
    pub waypoint_prompt: Option<String>,
    pub connections_form: Option<WaypointConnectionsForm>,

    // Other dialogs
    pub show_settings_dialog: bool,
    pub show_about_dialog: bool,
    pub error_message: Option<String>,
    pub notice: Option<Notice>,

    // Recent data folder handling
    pub pending_add_recent_data_dir: Option<PathBuf>,
    pub pending_open_recent_data_dir: Option<PathBuf>,
    pub pending_clear_recent_data_dirs: bool,

    pub pending_action: Option<PendingAction>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            selected_map: None,

            controller: InteractionController::default(),
            last_painted_cell: None,

            show_new_map_dialog: false,
            new_map_form: MapForm::default(),
            show_map_properties_dialog: false,
            map_properties_form: MapForm::default(),
            pending_delete_map: None,
            form_error: None,

            waypoint_prompt: None,
            connections_form: None,

            show_settings_dialog: false,
            show_about_dialog: false,
            error_message: None,
            notice: None,

            pending_add_recent_data_dir: None,
            pending_open_recent_data_dir: None,
            pending_clear_recent_data_dirs: false,

            pending_action: None,
        }
    }
}

impl EditorState {
    /// Select the first map of a freshly loaded project and reset the entity id choice
    pub fn select_first_map(&mut self, project: &Project) {
        self.selected_map = project.data.maps.first().map(|m| m.id.clone());
        let entity_type = self.controller.entity_type;
        self.controller.select_entity_type(&project.data, entity_type);
        self.last_painted_cell = None;
    }

    /// Whether a modal window currently owns the keyboard
    pub fn any_dialog_open(&self) -> bool {
        self.show_new_map_dialog
            || self.show_map_properties_dialog
            || self.pending_delete_map.is_some()
            || self.waypoint_prompt.is_some()
            || self.connections_form.is_some()
            || self.show_settings_dialog
            || self.error_message.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawmap_core::{CatalogEntry, EntityType, GameMap};

    #[test]
    fn test_plugin_builder() {
        let plugin = EditorPlugin::new()
            .with_data_dir("game/data")
            .with_cell_size(500.0)
            .with_initial_tool(ToolMode::DeleteEntity);
        assert_eq!(
            plugin.initial_state.data_dir,
            Some(PathBuf::from("game/data"))
        );
        assert_eq!(plugin.initial_state.cell_size, Some(96.0));
        assert_eq!(plugin.initial_state.initial_tool, Some(ToolMode::DeleteEntity));
    }

    #[test]
    fn test_select_first_map() {
        let mut project = Project::default();
        project
            .data
            .create_map(GameMap::new("m1", "Meadow", 2, 2))
            .unwrap();
        project.data.enemies.push(CatalogEntry {
            id: "goblin".to_string(),
            name: "Goblin".to_string(),
        });

        let mut state = EditorState::default();
        state.controller.entity_type = EntityType::Enemy;
        state.last_painted_cell = Some((1, 1));
        state.select_first_map(&project);

        assert_eq!(state.selected_map.as_deref(), Some("m1"));
        assert_eq!(state.controller.entity_id, "goblin");
        assert_eq!(state.last_painted_cell, None);
        assert!(!state.any_dialog_open());
    }
}
