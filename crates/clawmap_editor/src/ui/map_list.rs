//! Map list panel

use bevy_egui::egui;

use crate::project::Project;
use crate::EditorState;

/// Result from map list interaction
#[derive(Default)]
pub struct MapListResult {
    pub new_map: bool,
    /// Map whose properties dialog should open
    pub edit_properties: Option<String>,
    /// Map to delete (after confirmation)
    pub delete_map: Option<String>,
}

/// Render the list of maps with its action buttons
pub fn render_map_list(
    ui: &mut egui::Ui,
    editor_state: &mut EditorState,
    project: &Project,
) -> MapListResult {
    let mut result = MapListResult::default();

    ui.heading("Maps");
    ui.separator();

    ui.horizontal(|ui| {
        if ui
            .add_enabled(project.is_open(), egui::Button::new("New"))
            .clicked()
        {
            result.new_map = true;
        }

        let selected = editor_state.selected_map.clone();
        if ui
            .add_enabled(selected.is_some(), egui::Button::new("Delete"))
            .clicked()
        {
            result.delete_map = selected.clone();
        }
        if ui
            .add_enabled(selected.is_some(), egui::Button::new("Properties"))
            .clicked()
        {
            result.edit_properties = selected;
        }
    });

    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("map_list_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if project.data.maps.is_empty() {
                ui.label("(No maps)");
            }
            for map in &project.data.maps {
                let is_selected = editor_state.selected_map.as_deref() == Some(map.id.as_str());
                let response =
                    ui.selectable_label(is_selected, format!("{} - {}", map.id, map.name));
                if response.clicked() {
                    editor_state.selected_map = Some(map.id.clone());
                    editor_state.last_painted_cell = None;
                }
                if response.double_clicked() {
                    result.edit_properties = Some(map.id.clone());
                }
            }
        });

    result
}
