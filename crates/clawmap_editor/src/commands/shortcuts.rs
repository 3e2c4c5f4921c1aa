//! Keyboard shortcut handling

use bevy::prelude::*;
use clawmap_core::ToolMode;

use crate::ui::PendingAction;
use crate::EditorState;

/// Handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor_state: ResMut<EditorState>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);

    if ctrl {
        // Ctrl+S - Save
        if keyboard.just_pressed(KeyCode::KeyS) {
            editor_state.pending_action = Some(PendingAction::Save);
        }
        // Ctrl+O - Open data folder
        if keyboard.just_pressed(KeyCode::KeyO) {
            editor_state.pending_action = Some(PendingAction::Open);
        }
        return;
    }

    // Digits would otherwise land in dialog text fields too
    if editor_state.any_dialog_open() {
        return;
    }

    let tool = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(ToolMode::PaintTerrain)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(ToolMode::PlaceEntity)
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        Some(ToolMode::DeleteEntity)
    } else {
        None
    };
    if let Some(tool) = tool {
        editor_state.controller.tool = tool;
    }
}
