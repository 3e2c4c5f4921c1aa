//! Standalone ClawWorld map editor binary
//!
//! Run with: clawmap_editor [DATA_DIR]

use bevy::prelude::*;
use bevy::window::WindowResolution;
use clawmap_editor::EditorPlugin;

fn main() {
    let mut editor = EditorPlugin::new();
    if let Some(data_dir) = std::env::args().nth(1) {
        editor = editor.with_data_dir(data_dir);
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "ClawWorld Map Editor".to_string(),
                resolution: WindowResolution::new(1280, 800).with_scale_factor_override(1.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(editor)
        .run();
}
