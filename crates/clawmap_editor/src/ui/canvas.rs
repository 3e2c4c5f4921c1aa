//! Map canvas: replays renderer draw commands and routes pointer input to the tools

use bevy_egui::egui;
use clawmap_core::{
    DrawCommand, GridRenderer, MapData, MapDataError, Notice, PointerEvent, Rgb, ToolOutcome,
};

use crate::project::Project;
use crate::EditorState;

const LABEL_FONT_SIZE: f32 = 11.0;

pub fn rgb_to_color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Render the selected map and handle tool input on it
pub fn render_canvas(ui: &mut egui::Ui, editor_state: &mut EditorState, project: &mut Project) {
    let Some(map_id) = editor_state.selected_map.clone() else {
        ui.centered_and_justified(|ui| {
            if project.is_open() {
                ui.label("Select or create a map");
            } else {
                ui.label("Open a data folder (Ctrl+O)");
            }
        });
        return;
    };
    let Some(map) = project.map(&map_id).cloned() else {
        editor_state.selected_map = None;
        return;
    };

    let renderer = GridRenderer::new(editor_state.controller.cell_size);
    let (canvas_w, canvas_h) = renderer.canvas_size(&map);

    egui::ScrollArea::both()
        .id_salt("canvas_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                egui::vec2(canvas_w, canvas_h),
                egui::Sense::click_and_drag(),
            );
            let origin = response.rect.min;

            for command in renderer.draw(&project.data, &map) {
                paint_command(&painter, origin, command);
            }

            // Pointer down anywhere on the canvas, drag only while held
            let pressed = response.hovered() && ui.input(|i| i.pointer.primary_pressed());
            let event = if pressed {
                Some(PointerEvent::Down)
            } else if response.dragged_by(egui::PointerButton::Primary) {
                Some(PointerEvent::Drag)
            } else {
                None
            };
            if !ui.input(|i| i.pointer.primary_down()) {
                editor_state.last_painted_cell = None;
            }

            let (Some(event), Some(pos)) = (event, ui.input(|i| i.pointer.interact_pos())) else {
                return;
            };
            let local = pos - origin;
            dispatch_pointer(editor_state, &mut project.data, &map_id, event, local.x, local.y);
        });
}

/// Route one canvas pointer event to the active tool.
///
/// Ignored while a dialog is open. A drag edits each cell once.
pub fn dispatch_pointer(
    editor_state: &mut EditorState,
    data: &mut MapData,
    map_id: &str,
    event: PointerEvent,
    canvas_x: f32,
    canvas_y: f32,
) {
    if editor_state.any_dialog_open() {
        return;
    }

    if event == PointerEvent::Drag {
        let cell = data.map(map_id).and_then(|map| {
            clawmap_core::canvas_to_cell(canvas_x, canvas_y, editor_state.controller.cell_size, map)
        });
        if cell.is_some() && cell == editor_state.last_painted_cell {
            return;
        }
    }

    let result = editor_state
        .controller
        .handle_pointer(data, map_id, event, canvas_x, canvas_y);
    apply_tool_result(editor_state, result);
}

/// Record what a tool did: remember painted cells, raise the waypoint prompt or a notice
pub fn apply_tool_result(
    editor_state: &mut EditorState,
    result: Result<ToolOutcome, MapDataError>,
) {
    match result {
        Ok(ToolOutcome::Ignored) => {}
        Ok(ToolOutcome::Painted { x, y }) => {
            editor_state.last_painted_cell = Some((x, y));
        }
        Ok(ToolOutcome::Placed { x, y, placed }) => {
            editor_state.last_painted_cell = Some((x, y));
            editor_state.notice = None;
            if let Some(waypoint_id) = placed.connection_prompt {
                editor_state.waypoint_prompt = Some(waypoint_id);
            }
        }
        Ok(ToolOutcome::Deleted(entity)) => {
            editor_state.notice = Some(Notice::info(format!(
                "Deleted {} '{}' at ({}, {})",
                entity.entity_type, entity.entity_id, entity.x, entity.y
            )));
        }
        Err(e) => {
            bevy::log::debug!("Tool refused: {}", e);
            editor_state.notice = Some(Notice::from(&e));
        }
    }
}

fn paint_command(painter: &egui::Painter, origin: egui::Pos2, command: DrawCommand) {
    match command {
        DrawCommand::Rect {
            x,
            y,
            size,
            fill,
            outline,
        } => {
            let rect = egui::Rect::from_min_size(origin + egui::vec2(x, y), egui::vec2(size, size));
            painter.rect_filled(rect, 0.0, rgb_to_color32(fill));
            painter.rect_stroke(
                rect,
                0.0,
                egui::Stroke::new(1.0, rgb_to_color32(outline)),
                egui::StrokeKind::Inside,
            );
        }
        DrawCommand::Circle {
            cx,
            cy,
            radius,
            fill,
            outline,
        } => {
            painter.circle(
                origin + egui::vec2(cx, cy),
                radius,
                rgb_to_color32(fill),
                egui::Stroke::new(1.0, rgb_to_color32(outline)),
            );
        }
        DrawCommand::Label { x, y, text } => {
            painter.text(
                origin + egui::vec2(x, y),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(LABEL_FONT_SIZE),
                egui::Color32::LIGHT_GRAY,
            );
        }
    }
}
