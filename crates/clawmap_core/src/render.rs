//! Grid renderer - projects a map onto a raster canvas
//!
//! Row 0 is drawn at the bottom: cell `(x, y)` lands at
//! `(x * cell_size, (height - 1 - y) * cell_size)`. Output is a flat list of
//! [`DrawCommand`]s so any backend (the egui editor, tests) can replay it.

use crate::data::MapData;
use crate::records::GameMap;
use crate::terrain::{entity_color, terrain_color, Rgb};

/// Extra canvas width reserved for the y axis labels
pub const AXIS_LABEL_MARGIN_X: f32 = 30.0;
/// Extra canvas height reserved for the x axis labels
pub const AXIS_LABEL_MARGIN_Y: f32 = 20.0;

/// A backend-agnostic drawing primitive in canvas pixels (origin top-left)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Terrain cell
    Rect {
        x: f32,
        y: f32,
        size: f32,
        fill: Rgb,
        outline: Rgb,
    },
    /// Entity marker
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Rgb,
        outline: Rgb,
    },
    /// Axis label, centered on `(x, y)`
    Label { x: f32, y: f32, text: String },
}

/// Projects cells to canvas pixels for one cell size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRenderer {
    pub cell_size: f32,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self { cell_size: 30.0 }
    }
}

impl GridRenderer {
    pub fn new(cell_size: f32) -> Self {
        Self { cell_size }
    }

    /// Top-left corner of a cell on the canvas
    pub fn cell_origin(&self, x: i32, y: i32, map_height: u32) -> (f32, f32) {
        let draw_x = x as f32 * self.cell_size;
        let draw_y = (map_height as i32 - 1 - y) as f32 * self.cell_size;
        (draw_x, draw_y)
    }

    /// Center of a cell on the canvas
    pub fn cell_center(&self, x: i32, y: i32, map_height: u32) -> (f32, f32) {
        let (draw_x, draw_y) = self.cell_origin(x, y, map_height);
        let half = self.cell_size / 2.0;
        (draw_x + half, draw_y + half)
    }

    /// Size of the cell area alone
    pub fn grid_size(&self, map: &GameMap) -> (f32, f32) {
        (
            map.width as f32 * self.cell_size,
            map.height as f32 * self.cell_size,
        )
    }

    /// Size of the whole canvas including axis labels
    pub fn canvas_size(&self, map: &GameMap) -> (f32, f32) {
        let (w, h) = self.grid_size(map);
        (w + AXIS_LABEL_MARGIN_X, h + AXIS_LABEL_MARGIN_Y)
    }

    /// Draw terrain, then entities, then axis labels
    pub fn draw(&self, data: &MapData, map: &GameMap) -> Vec<DrawCommand> {
        let grid = data.build_terrain_grid(map);
        // The grid is capped, so oversized maps only draw their capped area
        let (columns, rows) = (grid.width() as i32, grid.height() as i32);
        let mut commands = Vec::with_capacity(columns as usize * rows as usize);

        for y in 0..rows {
            for x in 0..columns {
                let terrain = grid.get(x, y).unwrap_or(map.default_terrain.as_str());
                let (draw_x, draw_y) = self.cell_origin(x, y, map.height);
                commands.push(DrawCommand::Rect {
                    x: draw_x,
                    y: draw_y,
                    size: self.cell_size,
                    fill: terrain_color(terrain),
                    outline: Rgb::GRAY,
                });
            }
        }

        let radius = self.cell_size / 3.0;
        for entity in data.entities_on(&map.id) {
            let (cx, cy) = self.cell_center(entity.x, entity.y, map.height);
            commands.push(DrawCommand::Circle {
                cx,
                cy,
                radius,
                fill: entity_color(entity.entity_type),
                outline: Rgb::BLACK,
            });
        }

        let (grid_w, grid_h) = self.grid_size(map);
        let half = self.cell_size / 2.0;
        for x in 0..columns {
            commands.push(DrawCommand::Label {
                x: x as f32 * self.cell_size + half,
                y: grid_h + 10.0,
                text: x.to_string(),
            });
        }
        for y in 0..rows {
            let (_, cy) = self.cell_center(0, y, map.height);
            commands.push(DrawCommand::Label {
                x: grid_w + 15.0,
                y: cy,
                text: y.to_string(),
            });
        }

        commands
    }
}
