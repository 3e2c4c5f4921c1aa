//! Terrain palette, colors and the derived per-map terrain grid

use serde::{Deserialize, Serialize};

use crate::records::{EntityType, MAX_MAP_DIMENSION};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Terrains known to the game client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerrainKind {
    Grass,
    Water,
    Rock,
    Sand,
    Snow,
    Tree,
    Wall,
}

impl TerrainKind {
    /// Tag stored in terrain columns
    pub fn tag(&self) -> &'static str {
        match self {
            TerrainKind::Grass => "GRASS",
            TerrainKind::Water => "WATER",
            TerrainKind::Rock => "ROCK",
            TerrainKind::Sand => "SAND",
            TerrainKind::Snow => "SNOW",
            TerrainKind::Tree => "TREE",
            TerrainKind::Wall => "WALL",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.tag() == tag)
    }

    pub fn color(&self) -> Rgb {
        match self {
            TerrainKind::Grass => Rgb::new(0x2d, 0x5a, 0x27),
            TerrainKind::Water => Rgb::new(0x1a, 0x4a, 0x6e),
            TerrainKind::Rock => Rgb::new(0x4a, 0x4a, 0x4a),
            TerrainKind::Sand => Rgb::new(0xc2, 0xb2, 0x80),
            TerrainKind::Snow => Rgb::new(0xe8, 0xe8, 0xe8),
            TerrainKind::Tree => Rgb::new(0x1b, 0x4d, 0x1b),
            TerrainKind::Wall => Rgb::new(0x33, 0x33, 0x33),
        }
    }

    /// Whether players can walk over this terrain
    pub fn is_passable(&self) -> bool {
        !matches!(
            self,
            TerrainKind::Water | TerrainKind::Rock | TerrainKind::Tree | TerrainKind::Wall
        )
    }

    /// Returns all terrains for UI enumeration
    pub fn all() -> &'static [TerrainKind] {
        &[
            TerrainKind::Grass,
            TerrainKind::Water,
            TerrainKind::Rock,
            TerrainKind::Sand,
            TerrainKind::Snow,
            TerrainKind::Tree,
            TerrainKind::Wall,
        ]
    }
}

/// Fill color of a terrain tag; unknown tags are white
pub fn terrain_color(tag: &str) -> Rgb {
    TerrainKind::from_tag(tag)
        .map(|k| k.color())
        .unwrap_or(Rgb::WHITE)
}

/// Marker color of an entity type
pub fn entity_color(entity_type: EntityType) -> Rgb {
    match entity_type {
        EntityType::Waypoint => Rgb::new(0x9c, 0x27, 0xb0),
        EntityType::Npc => Rgb::new(0x21, 0x96, 0xf3),
        EntityType::Enemy => Rgb::new(0xf4, 0x43, 0x36),
        EntityType::Campfire => Rgb::new(0xff, 0x98, 0x00),
    }
}

/// Resolved terrain tag per cell of one map, indexed `[y][x]` with row 0 at the bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    /// Row-major, `y * width + x`
    cells: Vec<String>,
}

impl TerrainGrid {
    /// A grid where every cell holds `fill`.
    ///
    /// Each side is capped at [`MAX_MAP_DIMENSION`]; cells beyond it resolve to `None`.
    pub fn filled(width: u32, height: u32, fill: &str) -> Self {
        if width > MAX_MAP_DIMENSION || height > MAX_MAP_DIMENSION {
            tracing::warn!(
                "Terrain grid {}x{} capped at {} cells per side",
                width,
                height,
                MAX_MAP_DIMENSION
            );
        }
        let width = width.min(MAX_MAP_DIMENSION);
        let height = height.min(MAX_MAP_DIMENSION);
        Self {
            width,
            height,
            cells: vec![fill.to_string(); width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Terrain at a cell, `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<&str> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        self.cells.get(self.index(x, y)).map(String::as_str)
    }

    /// Fill the inclusive range, clamped to the grid
    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, terrain: &str) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let min_x = x1.max(0);
        let min_y = y1.max(0);
        let max_x = x2.min(self.width as i32 - 1);
        let max_y = y2.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let index = self.index(x, y);
                if let Some(cell) = self.cells.get_mut(index) {
                    *cell = terrain.to_string();
                }
            }
        }
    }

    /// Rows in storage order: `rows()[y][x]`, row 0 first
    pub fn rows(&self) -> Vec<Vec<&str>> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .take(self.height as usize)
            .map(|row| row.iter().map(String::as_str).collect())
            .collect()
    }

    /// Rows in screen order, top row first (row 0 is drawn at the bottom)
    pub fn display_rows(&self) -> Vec<Vec<&str>> {
        let mut rows = self.rows();
        rows.reverse();
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_grid_is_capped() {
        let mut grid = TerrainGrid::filled(70000, 2, "GRASS");
        assert_eq!((grid.width(), grid.height()), (MAX_MAP_DIMENSION, 2));

        grid.fill_rect(0, 0, 69999, 1, "SAND");
        assert_eq!(grid.get(1023, 1), Some("SAND"));
        assert_eq!(grid.get(1024, 1), None);
    }

    #[test]
    fn test_unknown_terrain_is_white() {
        assert_eq!(terrain_color("LAVA"), Rgb::WHITE);
        assert_eq!(terrain_color("WATER"), TerrainKind::Water.color());
    }

    #[test]
    fn test_passability() {
        assert!(TerrainKind::Grass.is_passable());
        assert!(TerrainKind::Sand.is_passable());
        assert!(!TerrainKind::Water.is_passable());
        assert!(!TerrainKind::Wall.is_passable());
    }

    #[test]
    fn test_fill_rect_clamps() {
        let mut grid = TerrainGrid::filled(3, 2, "GRASS");
        grid.fill_rect(-5, 1, 10, 9, "SNOW");

        assert_eq!(grid.rows(), vec![vec!["GRASS"; 3], vec!["SNOW"; 3]]);
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, -1), None);
    }

    #[test]
    fn test_display_rows_flip() {
        let mut grid = TerrainGrid::filled(2, 2, "GRASS");
        grid.fill_rect(0, 0, 0, 0, "WATER");

        assert_eq!(grid.rows()[0][0], "WATER");
        assert_eq!(
            grid.display_rows(),
            vec![vec!["GRASS", "GRASS"], vec!["WATER", "GRASS"]]
        );
    }
}
