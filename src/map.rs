//! Coastline map - procedurally generated terrain grid

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, trace};

/// Symbol drawn over the cell the player occupies
pub const PLAYER_SYMBOL: char = 'P';

/// Column/row position on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Terrain held by a single grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Terrain {
    #[default]
    Water,
    Land,
    Landmark,
}

impl Terrain {
    pub fn symbol(self) -> char {
        match self {
            Terrain::Water => '~',
            Terrain::Land => '#',
            Terrain::Landmark => '*',
        }
    }
}

/// Fixed-size terrain grid, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    cells: Vec<Terrain>,
}

impl TerrainGrid {
    fn filled(width: u32, height: u32, terrain: Terrain) -> Self {
        Self {
            width,
            height,
            cells: vec![terrain; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && x < i64::from(self.width) && y >= 0 && y < i64::from(self.height)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos.x, pos.y) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: Position) -> Option<Terrain> {
        self.index(pos).map(|index| self.cells[index])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Terrain]> {
        // chunks() rejects a zero chunk size; an empty grid has no rows anyway.
        self.cells.chunks(self.width.max(1) as usize)
    }

    fn set(&mut self, pos: Position, terrain: Terrain) -> bool {
        match self.index(pos) {
            Some(index) => {
                self.cells[index] = terrain;
                true
            }
            None => false,
        }
    }
}

/// First land column of `row`: `floor(0.30w + sin(row / 3) * 0.05w)`.
pub fn coastline_boundary(width: u32, row: u32) -> i64 {
    let width = f64::from(width);
    let offset = width * 0.30;
    let wave = (f64::from(row) / 3.0).sin() * width * 0.05;
    (offset + wave).floor() as i64
}

/// Landmark cells in stamping order. Later entries win on collision.
pub fn landmark_positions(width: u32, height: u32) -> [Position; 3] {
    let width = i64::from(width);
    let height = i64::from(height);
    [
        Position::new(width - 5, height / 4),
        Position::new(width - 8, height / 2),
        Position::new(width - 3, height * 3 / 4),
    ]
}

/// Builds the terrain for a `width` x `height` map. Pure function of its inputs.
pub fn generate_coastline(width: u32, height: u32) -> TerrainGrid {
    let mut grid = TerrainGrid::filled(width, height, Terrain::Water);

    for row in 0..height {
        let boundary = coastline_boundary(width, row).clamp(0, i64::from(width));
        trace!(row, boundary, "coastline boundary");
        for column in boundary..i64::from(width) {
            grid.set(Position::new(column, i64::from(row)), Terrain::Land);
        }
    }

    for landmark in landmark_positions(width, height) {
        // Degenerate dimensions push landmarks off the grid; those are skipped.
        grid.set(landmark, Terrain::Landmark);
    }

    grid
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "player position {position} is outside the map, valid range is [0,{max_x}] × [0,{max_y}]"
)]
pub struct BoundsError {
    pub position: Position,
    pub max_x: i64,
    pub max_y: i64,
}

/// Generated coastline map. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoastlineMap {
    grid: TerrainGrid,
}

impl CoastlineMap {
    /// Both dimensions must be positive.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "map dimensions must be positive");
        let grid = generate_coastline(width, height);
        info!(width, height, "generated coastline map");
        Self { grid }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn terrain_at(&self, pos: Position) -> Option<Terrain> {
        self.grid.get(pos)
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        self.grid.in_bounds(x, y)
    }

    pub fn validate_bounds(&self, pos: Position) -> Result<(), BoundsError> {
        if self.in_bounds(pos.x, pos.y) {
            Ok(())
        } else {
            Err(BoundsError {
                position: pos,
                max_x: i64::from(self.width()) - 1,
                max_y: i64::from(self.height()) - 1,
            })
        }
    }

    /// Renders one line per row with the player symbol drawn over `player`.
    ///
    /// Callers are expected to check `player` with [`CoastlineMap::in_bounds`]
    /// first; an off-map player is simply not drawn.
    pub fn render(&self, player: Position) -> String {
        let mut out = String::with_capacity((self.width() as usize + 1) * self.height() as usize);
        for (row, cells) in self.grid.rows().enumerate() {
            for (column, terrain) in cells.iter().enumerate() {
                if column as i64 == player.x && row as i64 == player.y {
                    out.push(PLAYER_SYMBOL);
                } else {
                    out.push(terrain.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    /// Rendered rows without trailing newlines.
    pub fn render_rows(&self, player: Position) -> Vec<String> {
        self.render(player).lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol_at(rendered: &str, x: usize, y: usize) -> char {
        rendered.lines().nth(y).unwrap().chars().nth(x).unwrap()
    }

    #[test]
    fn test_render_dimensions() {
        for (width, height) in [(1, 1), (3, 7), (40, 20), (64, 9)] {
            let map = CoastlineMap::new(width, height);
            let rendered = map.render(Position::new(0, 0));
            let lines: Vec<&str> = rendered.lines().collect();
            assert_eq!(lines.len(), height as usize);
            assert!(lines.iter().all(|line| line.chars().count() == width as usize));
            assert!(rendered.ends_with('\n'));
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = CoastlineMap::new(40, 20);
        let b = CoastlineMap::new(40, 20);
        assert_eq!(a, b);
        assert_eq!(a.render(Position::new(3, 4)), b.render(Position::new(3, 4)));
    }

    #[test]
    fn test_in_bounds() {
        let map = CoastlineMap::new(40, 20);
        assert!(map.in_bounds(0, 0));
        assert!(map.in_bounds(39, 19));
        assert!(!map.in_bounds(40, 0));
        assert!(!map.in_bounds(0, 20));
        assert!(!map.in_bounds(-1, 5));
        assert!(!map.in_bounds(5, -1));
    }

    #[test]
    fn test_validate_bounds_reports_range() {
        let map = CoastlineMap::new(40, 20);
        assert!(map.validate_bounds(Position::new(12, 6)).is_ok());

        let err = map.validate_bounds(Position::new(45, 5)).unwrap_err();
        assert_eq!(err.max_x, 39);
        assert_eq!(err.max_y, 19);
        assert!(err.to_string().contains("[0,39] × [0,19]"));
    }

    #[test]
    fn test_land_starts_at_boundary() {
        let map = CoastlineMap::new(40, 20);
        for row in 0..20u32 {
            let boundary = coastline_boundary(40, row);
            for column in 0..40i64 {
                let terrain = map.terrain_at(Position::new(column, i64::from(row))).unwrap();
                if column < boundary {
                    assert_eq!(terrain, Terrain::Water, "row {row} column {column}");
                } else {
                    assert_ne!(terrain, Terrain::Water, "row {row} column {column}");
                }
            }
        }
    }

    #[test]
    fn test_boundary_is_smooth() {
        for width in [10u32, 40, 100] {
            let max_step = (f64::from(width) * 0.05 / 3.0).ceil() as i64 + 1;
            for row in 0..50u32 {
                let step =
                    (coastline_boundary(width, row + 1) - coastline_boundary(width, row)).abs();
                assert!(step <= max_step, "width {width} row {row} step {step}");
            }
        }
    }

    #[test]
    fn test_default_map_landmarks() {
        let map = CoastlineMap::new(40, 20);
        let rendered = map.render(Position::new(0, 0));
        for (x, y) in [(35, 5), (32, 10), (37, 15)] {
            assert_eq!(symbol_at(&rendered, x, y), '*');
        }
        let landmarks = rendered.chars().filter(|&c| c == '*').count();
        assert_eq!(landmarks, 3);
    }

    #[test]
    fn test_player_overrides_every_terrain() {
        let map = CoastlineMap::new(40, 20);
        for (x, y) in [(0, 0), (20, 3), (35, 5), (39, 19)] {
            let rendered = map.render(Position::new(x, y));
            assert_eq!(symbol_at(&rendered, x as usize, y as usize), PLAYER_SYMBOL);
            assert_eq!(rendered.chars().filter(|&c| c == PLAYER_SYMBOL).count(), 1);
        }
    }

    #[test]
    fn test_render_does_not_mutate() {
        let map = CoastlineMap::new(40, 20);
        let first = map.render(Position::new(35, 5));
        let _ = map.render(Position::new(10, 10));
        assert_eq!(map.render(Position::new(35, 5)), first);
        assert_eq!(map.terrain_at(Position::new(35, 5)), Some(Terrain::Landmark));
    }

    #[test]
    fn test_small_map_skips_offgrid_landmarks() {
        let map = CoastlineMap::new(4, 4);
        let rendered = map.render(Position::new(-1, -1));
        // (-1,1) and (-4,2) fall off the grid, (1,3) is stamped.
        assert_eq!(rendered.chars().filter(|&c| c == '*').count(), 1);
        assert_eq!(map.terrain_at(Position::new(1, 3)), Some(Terrain::Landmark));
    }

    #[test]
    fn test_symbols_are_distinct() {
        let symbols = [
            Terrain::Water.symbol(),
            Terrain::Land.symbol(),
            Terrain::Landmark.symbol(),
        ];
        assert_eq!(symbols, ['~', '#', '*']);
        assert!(!symbols.contains(&PLAYER_SYMBOL));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "map dimensions must be positive")]
    fn test_zero_width_is_rejected() {
        let _ = CoastlineMap::new(0, 20);
    }
}
