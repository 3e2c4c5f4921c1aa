//! Menu bar UI

use bevy_egui::egui;
use std::path::PathBuf;

use super::PendingAction;
use crate::preferences::EditorPreferences;
use crate::project::Project;
use crate::EditorState;

/// Render the menu bar
pub fn render_menu_bar(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    project: &Project,
    preferences: &EditorPreferences,
) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Data Folder...").clicked() {
                    editor_state.pending_action = Some(PendingAction::Open);
                    ui.close();
                }

                ui.menu_button("Open Recent", |ui| {
                    if preferences.recent_data_dirs.is_empty() {
                        ui.label("(No recent folders)");
                    } else {
                        for recent in &preferences.recent_data_dirs {
                            if ui
                                .button(&recent.name)
                                .on_hover_text(&recent.path)
                                .clicked()
                            {
                                editor_state.pending_open_recent_data_dir =
                                    Some(PathBuf::from(&recent.path));
                                ui.close();
                            }
                        }
                        ui.separator();
                        if ui.button("Clear Recent Folders").clicked() {
                            editor_state.pending_clear_recent_data_dirs = true;
                            ui.close();
                        }
                    }
                });

                ui.separator();
                if ui
                    .add_enabled(project.is_open(), egui::Button::new("Reload"))
                    .clicked()
                {
                    editor_state.pending_action = Some(PendingAction::Reload);
                    ui.close();
                }
                if ui
                    .add_enabled(project.is_open(), egui::Button::new("Save"))
                    .clicked()
                {
                    editor_state.pending_action = Some(PendingAction::Save);
                    ui.close();
                }
                ui.separator();
                if ui.button("Settings...").clicked() {
                    editor_state.show_settings_dialog = true;
                    ui.close();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    editor_state.pending_action = Some(PendingAction::Exit);
                    ui.close();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About...").clicked() {
                    editor_state.show_about_dialog = true;
                    ui.close();
                }
            });

            // Data folder status on the right
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dirty_indicator = if project.is_dirty() { " *" } else { "" };
                ui.label(format!("{}{}", project.name(), dirty_indicator));
            });
        });
    });
}
