//! Dialog windows for the editor

use bevy_egui::egui;
use clawmap_core::{MapForm, Notice, TerrainKind, WaypointConnectionsForm};

use crate::project::Project;
use crate::EditorState;

/// Actions that can be triggered from menus and shortcuts
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Open,
    Reload,
    Save,
    Exit,
}

/// Render all dialogs
pub fn render_dialogs(ctx: &egui::Context, editor_state: &mut EditorState, project: &mut Project) {
    render_new_map_dialog(ctx, editor_state, project);
    render_map_properties_dialog(ctx, editor_state, project);
    render_delete_map_dialog(ctx, editor_state, project);
    render_waypoint_prompt(ctx, editor_state, project);
    render_connections_dialog(ctx, editor_state, project);
    render_about_dialog(ctx, editor_state);
    render_error_dialog(ctx, editor_state);

    // Handle pending file actions
    if let Some(action) = editor_state.pending_action.take() {
        match action {
            PendingAction::Open => {
                #[cfg(feature = "native")]
                {
                    if let Some(path) = rfd::FileDialog::new()
                        .set_title("Open data folder")
                        .pick_folder()
                    {
                        match Project::open(&path) {
                            Ok(loaded) => {
                                *project = loaded;
                                editor_state.select_first_map(project);
                                editor_state.pending_add_recent_data_dir = Some(path);
                            }
                            Err(e) => {
                                editor_state.error_message =
                                    Some(format!("Failed to load data folder: {}", e));
                            }
                        }
                    }
                }
            }
            PendingAction::Reload => {
                let selected = editor_state.selected_map.take();
                match project.reload() {
                    Ok(()) => {
                        editor_state.select_first_map(project);
                        // Keep the selection if the map still exists
                        if let Some(id) = selected.filter(|id| project.map(id).is_some()) {
                            editor_state.selected_map = Some(id);
                        }
                    }
                    Err(e) => {
                        editor_state.selected_map = selected;
                        editor_state.error_message = Some(format!("Failed to reload: {}", e));
                    }
                }
            }
            PendingAction::Save => match project.save() {
                Ok(()) => {
                    editor_state.notice = Some(Notice::info("Saved"));
                }
                Err(e) => {
                    editor_state.error_message = Some(format!("Failed to save: {}", e));
                }
            },
            _ => {
                // Put other actions back
                editor_state.pending_action = Some(action);
            }
        }
    }
}

/// Text fields shared by the new-map and properties dialogs
fn map_form_fields(ui: &mut egui::Ui, form: &mut MapForm, id_editable: bool) {
    egui::Grid::new("map_form_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("ID:");
            ui.add_enabled(id_editable, egui::TextEdit::singleline(&mut form.id));
            ui.end_row();

            ui.label("Name:");
            ui.text_edit_singleline(&mut form.name);
            ui.end_row();

            ui.label("Description:");
            ui.text_edit_multiline(&mut form.description);
            ui.end_row();

            ui.label("Width:");
            ui.add(egui::TextEdit::singleline(&mut form.width).desired_width(60.0));
            ui.end_row();

            ui.label("Height:");
            ui.add(egui::TextEdit::singleline(&mut form.height).desired_width(60.0));
            ui.end_row();

            ui.label("Safe zone:");
            ui.checkbox(&mut form.is_safe, "");
            ui.end_row();

            ui.label("Recommended level:");
            ui.add(egui::TextEdit::singleline(&mut form.recommended_level).desired_width(60.0));
            ui.end_row();

            ui.label("Default terrain:");
            egui::ComboBox::from_id_salt("map_form_default_terrain")
                .selected_text(form.default_terrain.clone())
                .show_ui(ui, |ui| {
                    for kind in TerrainKind::all() {
                        ui.selectable_value(
                            &mut form.default_terrain,
                            kind.tag().to_string(),
                            kind.tag(),
                        );
                    }
                });
            ui.end_row();
        });
}

fn render_new_map_dialog(ctx: &egui::Context, editor_state: &mut EditorState, project: &mut Project) {
    if !editor_state.show_new_map_dialog {
        return;
    }

    let mut create = false;
    let mut cancel = false;

    egui::Window::new("New Map")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            map_form_fields(ui, &mut editor_state.new_map_form, true);

            if let Some(error) = &editor_state.form_error {
                ui.colored_label(egui::Color32::RED, error);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                if ui.button("Create").clicked() {
                    create = true;
                }
            });
        });

    if create {
        // On failure the form stays open with the error shown
        match editor_state.new_map_form.commit_new(&mut project.data) {
            Ok(id) => {
                bevy::log::info!("Created map {}", id);
                editor_state.selected_map = Some(id);
                editor_state.show_new_map_dialog = false;
                editor_state.form_error = None;
            }
            Err(e) => editor_state.form_error = Some(e.to_string()),
        }
    }
    if cancel {
        editor_state.show_new_map_dialog = false;
        editor_state.form_error = None;
    }
}

fn render_map_properties_dialog(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    project: &mut Project,
) {
    if !editor_state.show_map_properties_dialog {
        return;
    }

    let mut apply = false;
    let mut cancel = false;

    egui::Window::new(format!("Map Properties - {}", editor_state.map_properties_form.id))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            map_form_fields(ui, &mut editor_state.map_properties_form, false);

            if let Some(error) = &editor_state.form_error {
                ui.colored_label(egui::Color32::RED, error);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                if ui.button("Apply").clicked() {
                    apply = true;
                }
            });
        });

    if apply {
        match editor_state.map_properties_form.commit_edit(&mut project.data) {
            Ok(()) => {
                editor_state.show_map_properties_dialog = false;
                editor_state.form_error = None;
            }
            Err(e) => editor_state.form_error = Some(e.to_string()),
        }
    }
    if cancel {
        editor_state.show_map_properties_dialog = false;
        editor_state.form_error = None;
    }
}

fn render_delete_map_dialog(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    project: &mut Project,
) {
    let Some(map_id) = editor_state.pending_delete_map.clone() else {
        return;
    };

    let mut confirm = false;
    let mut cancel = false;

    egui::Window::new("Delete Map")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "Delete map '{}'? All terrain, entities and waypoints on it are deleted too.",
                project.data.map_name(&map_id)
            ));
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                if ui.button("Delete").clicked() {
                    confirm = true;
                }
            });
        });

    if confirm {
        match project.data.delete_map(&map_id) {
            Ok(removed) => {
                bevy::log::info!("Deleted map {}", removed.id);
                if editor_state.selected_map.as_deref() == Some(map_id.as_str()) {
                    editor_state.selected_map = project.data.maps.first().map(|m| m.id.clone());
                }
                // Waypoint ids may have gone with the map
                let entity_type = editor_state.controller.entity_type;
                editor_state
                    .controller
                    .select_entity_type(&project.data, entity_type);
            }
            Err(e) => editor_state.error_message = Some(e.to_string()),
        }
        editor_state.pending_delete_map = None;
    }
    if cancel {
        editor_state.pending_delete_map = None;
    }
}

fn render_waypoint_prompt(ctx: &egui::Context, editor_state: &mut EditorState, project: &Project) {
    let Some(waypoint_id) = editor_state.waypoint_prompt.clone() else {
        return;
    };

    let mut yes = false;
    let mut no = false;

    egui::Window::new("Waypoint Connections")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!(
                "Edit the connections of waypoint '{}' now?",
                waypoint_id
            ));
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("No").clicked() {
                    no = true;
                }
                if ui.button("Yes").clicked() {
                    yes = true;
                }
            });
        });

    if yes {
        editor_state.waypoint_prompt = None;
        match WaypointConnectionsForm::new(&project.data, &waypoint_id) {
            Ok(form) => editor_state.connections_form = Some(form),
            Err(e) => editor_state.notice = Some(Notice::from(&e)),
        }
    }
    if no {
        editor_state.waypoint_prompt = None;
    }
}

fn render_connections_dialog(
    ctx: &egui::Context,
    editor_state: &mut EditorState,
    project: &mut Project,
) {
    let Some(form) = editor_state.connections_form.as_mut() else {
        return;
    };

    let mut save = false;
    let mut cancel = false;

    egui::Window::new(format!("Connections of {}", form.waypoint_id))
        .collapsible(false)
        .resizable(true)
        .default_size([360.0, 320.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .max_height(260.0)
                .show(ui, |ui| {
                    if form.toggles.is_empty() {
                        ui.label("(No other waypoints)");
                    }
                    for toggle in &mut form.toggles {
                        ui.checkbox(&mut toggle.checked, toggle.label.as_str());
                    }
                });
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                if ui.button("Save").clicked() {
                    save = true;
                }
            });
        });

    if save {
        if let Err(e) = form.commit(&mut project.data) {
            editor_state.error_message = Some(e.to_string());
        }
        editor_state.connections_form = None;
    } else if cancel {
        editor_state.connections_form = None;
    }
}

fn render_about_dialog(ctx: &egui::Context, editor_state: &mut EditorState) {
    if !editor_state.show_about_dialog {
        return;
    }

    egui::Window::new("About clawmap_editor")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("clawmap_editor");
            ui.label("Map editor for ClawWorld data tables");
            ui.separator();
            ui.label("Shortcuts:");
            ui.label("- Ctrl+S: save");
            ui.label("- Ctrl+O: open data folder");
            ui.label("- 1 / 2 / 3: terrain, entity, delete entity");
            ui.separator();
            if ui.button("Close").clicked() {
                editor_state.show_about_dialog = false;
            }
        });
}

fn render_error_dialog(ctx: &egui::Context, editor_state: &mut EditorState) {
    let Some(error_msg) = editor_state.error_message.clone() else {
        return;
    };

    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(&error_msg);
            ui.separator();
            if ui.button("OK").clicked() {
                editor_state.error_message = None;
            }
        });
}
