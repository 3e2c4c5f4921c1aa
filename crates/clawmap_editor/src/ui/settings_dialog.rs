//! Settings/Preferences dialog

use bevy_egui::egui;
use clawmap_core::ToolMode;

use crate::preferences::EditorPreferences;

/// Render the Settings dialog
///
/// Returns true on the frame the preferences were saved.
pub fn render_settings_dialog(
    ctx: &egui::Context,
    show: &mut bool,
    preferences: &mut EditorPreferences,
) -> bool {
    if !*show {
        return false;
    }

    let mut close_dialog = false;
    let mut save_and_close = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(true)
        .default_size([380.0, 300.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Startup");
                ui.separator();

                ui.checkbox(
                    &mut preferences.auto_open_last_data_dir,
                    "Auto-open last data folder on startup",
                );

                ui.add_space(16.0);

                ui.heading("Canvas");
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Cell size:");
                    ui.add(egui::Slider::new(&mut preferences.cell_size, 8.0..=96.0).suffix(" px"));
                });

                ui.add_space(16.0);

                ui.heading("Default Tool");
                ui.separator();

                ui.horizontal_wrapped(|ui| {
                    for tool in ToolMode::all() {
                        if ui
                            .selectable_label(preferences.default_tool == *tool, tool.label())
                            .clicked()
                        {
                            preferences.default_tool = *tool;
                        }
                    }
                });

                ui.add_space(16.0);

                ui.heading("Recent Data Folders");
                ui.separator();

                if preferences.recent_data_dirs.is_empty() {
                    ui.label("No recent data folders");
                } else {
                    ui.label(format!(
                        "{} recent data folder(s)",
                        preferences.recent_data_dirs.len()
                    ));
                }
            });

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    save_and_close = true;
                }
                if ui.button("Cancel").clicked() {
                    close_dialog = true;
                }
            });
        });

    if save_and_close {
        if let Err(e) = preferences.save() {
            bevy::log::error!("Failed to save preferences: {}", e);
        }
        *show = false;
        return true;
    }

    if close_dialog {
        // Reload preferences to discard changes
        *preferences = EditorPreferences::load();
        *show = false;
    }
    false
}
