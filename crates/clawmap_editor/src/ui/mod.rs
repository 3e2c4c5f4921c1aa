//! Editor UI components using bevy_egui
//!
//! This module provides the panels, canvas and dialogs of the editor.

mod canvas;
mod dialogs;
mod map_list;
mod menu_bar;
mod settings_dialog;
mod toolbar;

pub use canvas::{apply_tool_result, dispatch_pointer, render_canvas, rgb_to_color32};
pub use dialogs::*;
pub use map_list::{render_map_list, MapListResult};
pub use menu_bar::render_menu_bar;
pub use settings_dialog::render_settings_dialog;
pub use toolbar::render_tool_panel;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use clawmap_core::{MapForm, NoticeLevel};

use crate::preferences::EditorPreferences;
use crate::project::Project;
use crate::EditorState;

/// Main UI plugin
pub struct EditorUiPlugin;

impl Plugin for EditorUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiState>()
            .add_systems(Update, process_exit_action)
            .add_systems(EguiPrimaryContextPass, render_ui);
    }
}

/// UI state for panel sizes
#[derive(Resource)]
pub struct UiState {
    pub map_list_width: f32,
    pub tool_panel_width: f32,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            map_list_width: 200.0,
            tool_panel_width: 220.0,
        }
    }
}

/// Main UI rendering system
fn render_ui(
    mut contexts: EguiContexts,
    mut ui_state: ResMut<UiState>,
    mut editor_state: ResMut<EditorState>,
    mut project: ResMut<Project>,
    mut preferences: ResMut<EditorPreferences>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    render_menu_bar(ctx, &mut editor_state, &project, &preferences);

    if render_settings_dialog(
        ctx,
        &mut editor_state.show_settings_dialog,
        &mut preferences,
    ) {
        editor_state.controller.cell_size = preferences.cell_size;
    }

    // Left panel - map list
    let mut map_list_result = MapListResult::default();
    egui::SidePanel::left("map_list")
        .resizable(true)
        .default_width(ui_state.map_list_width)
        .show(ctx, |ui| {
            ui_state.map_list_width = ui.available_width();
            map_list_result = render_map_list(ui, &mut editor_state, &project);
        });

    if map_list_result.new_map {
        editor_state.new_map_form = MapForm::default();
        editor_state.form_error = None;
        editor_state.show_new_map_dialog = true;
    }
    if let Some(map_id) = map_list_result.edit_properties {
        if let Some(map) = project.map(&map_id) {
            editor_state.map_properties_form = MapForm::from_map(map);
            editor_state.form_error = None;
            editor_state.show_map_properties_dialog = true;
        }
    }
    if let Some(map_id) = map_list_result.delete_map {
        editor_state.pending_delete_map = Some(map_id);
    }

    // Right panel - tools
    egui::SidePanel::right("tool_panel")
        .resizable(true)
        .default_width(ui_state.tool_panel_width)
        .show(ctx, |ui| {
            ui_state.tool_panel_width = ui.available_width();
            egui::ScrollArea::vertical()
                .id_salt("tool_panel_scroll")
                .show(ui, |ui| {
                    render_tool_panel(ui, &mut editor_state, &project);
                });
        });

    // Bottom - status bar
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        render_status_bar(ui, &mut editor_state);
    });

    // Central area - canvas
    egui::CentralPanel::default().show(ctx, |ui| {
        render_canvas(ui, &mut editor_state, &mut project);
    });

    render_dialogs(ctx, &mut editor_state, &mut project);
}

fn render_status_bar(ui: &mut egui::Ui, editor_state: &mut EditorState) {
    ui.horizontal(|ui| {
        ui.label(format!("Tool: {}", editor_state.controller.tool.label()));
        ui.separator();

        let mut dismiss = false;
        if let Some(notice) = &editor_state.notice {
            let color = match notice.level {
                NoticeLevel::Info => egui::Color32::LIGHT_BLUE,
                NoticeLevel::Warning => egui::Color32::YELLOW,
                NoticeLevel::Error => egui::Color32::LIGHT_RED,
            };
            ui.colored_label(color, &notice.message);
            if ui.small_button("x").clicked() {
                dismiss = true;
            }
        }
        if dismiss {
            editor_state.notice = None;
        }
    });
}

/// System to close the app when Exit was chosen from the menu
fn process_exit_action(
    mut editor_state: ResMut<EditorState>,
    mut app_exit: MessageWriter<AppExit>,
) {
    if editor_state.pending_action == Some(PendingAction::Exit) {
        editor_state.pending_action = None;
        app_exit.write(AppExit::Success);
    }
}
