//! Tool panel: tool selection, brush choices and legend

use bevy_egui::egui;
use clawmap_core::{entity_color, terrain_color, EntityType, TerrainKind, ToolMode};

use super::canvas::rgb_to_color32;
use super::PendingAction;
use crate::project::Project;
use crate::EditorState;

const SWATCH_SIZE: f32 = 14.0;

/// Draw a small filled square in the current row
fn swatch(ui: &mut egui::Ui, color: egui::Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), egui::Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
    ui.painter().rect_stroke(
        rect,
        2.0,
        egui::Stroke::new(1.0, egui::Color32::GRAY),
        egui::StrokeKind::Inside,
    );
}

/// Render the right-hand tool panel
pub fn render_tool_panel(ui: &mut egui::Ui, editor_state: &mut EditorState, project: &Project) {
    ui.heading("Tools");
    ui.separator();

    for (index, tool) in ToolMode::all().iter().enumerate() {
        if ui
            .selectable_label(editor_state.controller.tool == *tool, tool.label())
            .on_hover_text(format!("Shortcut: {}", index + 1))
            .clicked()
        {
            editor_state.controller.tool = *tool;
        }
    }

    ui.add_space(12.0);
    ui.heading("Terrain");
    ui.separator();

    ui.horizontal(|ui| {
        swatch(ui, rgb_to_color32(terrain_color(&editor_state.controller.terrain)));
        egui::ComboBox::from_id_salt("terrain_select")
            .selected_text(editor_state.controller.terrain.clone())
            .show_ui(ui, |ui| {
                for kind in TerrainKind::all() {
                    ui.horizontal(|ui| {
                        swatch(ui, rgb_to_color32(kind.color()));
                        let passability = if kind.is_passable() {
                            "Passable"
                        } else {
                            "Impassable"
                        };
                        if ui
                            .selectable_label(editor_state.controller.terrain == kind.tag(), kind.tag())
                            .on_hover_text(passability)
                            .clicked()
                        {
                            editor_state.controller.terrain = kind.tag().to_string();
                        }
                    });
                }
            });
    });

    ui.add_space(12.0);
    ui.heading("Entity");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Type:");
        let mut chosen = None;
        egui::ComboBox::from_id_salt("entity_type_select")
            .selected_text(editor_state.controller.entity_type.as_str())
            .show_ui(ui, |ui| {
                for entity_type in EntityType::all() {
                    if ui
                        .selectable_label(
                            editor_state.controller.entity_type == *entity_type,
                            entity_type.as_str(),
                        )
                        .clicked()
                    {
                        chosen = Some(*entity_type);
                    }
                }
            });
        if let Some(entity_type) = chosen {
            editor_state
                .controller
                .select_entity_type(&project.data, entity_type);
        }
    });

    ui.horizontal(|ui| {
        ui.label("ID:");
        let choices = project.data.entity_ids_for(editor_state.controller.entity_type);
        let selected_text = if editor_state.controller.entity_id.is_empty() {
            "(none)".to_string()
        } else {
            editor_state.controller.entity_id.clone()
        };
        egui::ComboBox::from_id_salt("entity_id_select")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                if choices.is_empty() {
                    ui.label("(No entries)");
                }
                for id in choices {
                    let is_selected = editor_state.controller.entity_id == id;
                    if ui.selectable_label(is_selected, &id).clicked() {
                        editor_state.controller.entity_id = id;
                    }
                }
            });
    });

    ui.add_space(12.0);
    if ui
        .add_enabled(project.is_open(), egui::Button::new("Save"))
        .clicked()
    {
        editor_state.pending_action = Some(PendingAction::Save);
    }

    ui.add_space(12.0);
    ui.heading("Legend");
    ui.separator();
    for entity_type in EntityType::all() {
        ui.horizontal(|ui| {
            swatch(ui, rgb_to_color32(entity_color(*entity_type)));
            ui.label(entity_type.as_str());
        });
    }
}
