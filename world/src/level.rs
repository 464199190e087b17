//! Static level geometry parsed from character maps.
//!
//! A [`LevelMap`] is the textual blueprint; [`Level::build`] scans it once in
//! row-major order and derives the wall list, the pip set, and the creature
//! spawn markers. Pips are the only part of a level that changes during play.

use std::collections::BTreeSet;

use pip_maze_core::{CreatureKind, GridCell, Position, TileKind, PIP_INSET, PIP_SIZE};
use thiserror::Error;

/// Number of rows in the canonical level.
pub const CANONICAL_ROWS: u32 = 21;

/// Number of columns in the canonical level.
pub const CANONICAL_COLUMNS: u32 = 19;

/// The level every game starts with and returns to after a clear.
pub const CANONICAL_MAP: [&str; CANONICAL_ROWS as usize] = [
    "XXXXXXXXXXXXXXXXXXX",
    "X        X        X",
    "X XX XXX X XXX XX X",
    "X                 X",
    "X XX X XXXXX X XX X",
    "X    X       X    X",
    "XXXX XXXX XXXX XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXrXX X XXXX",
    "O       bpo       O",
    "XXXX X XXXXX X XXXX",
    "OOOX X       X XOOO",
    "XXXX X XXXXX X XXXX",
    "X        X        X",
    "X XX XXX X XXX XX X",
    "X  X     P     X  X",
    "XX X X XXXXX X X XX",
    "X    X   X   X    X",
    "X XXXXXX X XXXXXX X",
    "X                 X",
    "XXXXXXXXXXXXXXXXXXX",
];

/// Reasons a level map cannot be turned into a playable level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The map does not contain the declared number of rows.
    #[error("level map has {found} rows but {expected} were declared")]
    RowCount {
        /// Declared number of rows.
        expected: u32,
        /// Number of rows actually supplied.
        found: usize,
    },
    /// A map row does not contain the declared number of columns.
    #[error("row {row} of the level map has {found} columns but {expected} were declared")]
    ColumnCount {
        /// Zero-based index of the offending row.
        row: u32,
        /// Declared number of columns.
        expected: u32,
        /// Number of characters actually supplied.
        found: usize,
    },
    /// Tiles must span at least one pixel.
    #[error("tile size must be positive (received {tile_size})")]
    InvalidTileSize {
        /// Tile size supplied by the caller.
        tile_size: i32,
    },
    /// The board would not fit in pixel coordinates.
    #[error("a {rows}x{columns} board of {tile_size}px tiles exceeds the pixel coordinate range")]
    BoardTooLarge {
        /// Declared number of rows.
        rows: u32,
        /// Declared number of columns.
        columns: u32,
        /// Tile size supplied by the caller.
        tile_size: i32,
    },
    /// The map lacks the `P` marker.
    #[error("level map has no player spawn marker 'P'")]
    MissingPlayer,
    /// The map holds more than one `P` marker.
    #[error("level map has a second player spawn marker at row {row}, column {column}")]
    DuplicatePlayer {
        /// Row of the second marker.
        row: u32,
        /// Column of the second marker.
        column: u32,
    },
}

/// Textual blueprint of a level together with its declared dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelMap {
    rows: Vec<String>,
    row_count: u32,
    column_count: u32,
}

impl LevelMap {
    /// Creates a blueprint that must hold `row_count` rows of `column_count` characters.
    #[must_use]
    pub fn new<I, S>(rows: I, row_count: u32, column_count: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
            row_count,
            column_count,
        }
    }

    /// Creates a blueprint whose dimensions are taken from the rows themselves.
    ///
    /// The column count follows the first row; ragged rows are still reported
    /// by [`Level::build`].
    #[must_use]
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<String> = rows.into_iter().map(Into::into).collect();
        let row_count = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let column_count = rows
            .first()
            .map(|row| u32::try_from(row.chars().count()).unwrap_or(u32::MAX))
            .unwrap_or(0);
        Self {
            rows,
            row_count,
            column_count,
        }
    }

    /// Blueprint of the canonical 21×19 level.
    #[must_use]
    pub fn canonical() -> Self {
        Self::new(CANONICAL_MAP, CANONICAL_ROWS, CANONICAL_COLUMNS)
    }

    /// Raw map rows.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Declared number of rows.
    #[must_use]
    pub const fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Declared number of columns.
    #[must_use]
    pub const fn column_count(&self) -> u32 {
        self.column_count
    }
}

impl Default for LevelMap {
    fn default() -> Self {
        Self::canonical()
    }
}

/// One fixed-size cell of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    kind: TileKind,
    cell: GridCell,
    position: Position,
    width: i32,
    height: i32,
}

impl Tile {
    fn new(kind: TileKind, cell: GridCell, tile_size: i32) -> Self {
        Self {
            kind,
            cell,
            position: cell.origin(tile_size),
            width: tile_size,
            height: tile_size,
        }
    }

    /// Static classification of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Grid cell the tile occupies.
    #[must_use]
    pub const fn cell(&self) -> GridCell {
        self.cell
    }

    /// Pixel position of the tile's top-left corner.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Horizontal pixel coordinate of the tile's left edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    /// Vertical pixel coordinate of the tile's top edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Top-left corner of the pip drawn inside the tile.
    #[must_use]
    pub const fn pip_position(&self) -> Position {
        self.position.offset(PIP_INSET, PIP_INSET)
    }

    /// Side length of the pip hitbox.
    #[must_use]
    pub const fn pip_size(&self) -> i32 {
        PIP_SIZE
    }
}

/// Location where a creature enters the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatureSpawn {
    /// Creature spawned at the marker.
    pub kind: CreatureKind,
    /// Grid cell holding the marker.
    pub cell: GridCell,
}

/// Tile grid and derived sets for a single play-through of a map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    row_count: u32,
    column_count: u32,
    tile_size: i32,
    tiles: Vec<Tile>,
    walls: Vec<Tile>,
    foods: BTreeSet<GridCell>,
    spawns: Vec<CreatureSpawn>,
}

/// One spare tile past the far edge keeps a creature stepping off the board
/// and the pip inset inside `i32`.
fn extent_fits(count: u32, tile_size: i32) -> bool {
    i32::try_from(count)
        .ok()
        .and_then(|count| count.checked_add(1))
        .and_then(|count| count.checked_mul(tile_size))
        .and_then(|extent| extent.checked_add(PIP_INSET + PIP_SIZE))
        .is_some()
}

impl Level {
    /// Scans the blueprint and builds the level.
    ///
    /// `X` becomes a wall, a space becomes a food tile, `O` becomes a skip
    /// tile, and every other character (creature markers included) becomes an
    /// empty tile. Creature markers are additionally recorded as spawns.
    pub fn build(map: &LevelMap, tile_size: i32) -> Result<Self, LevelError> {
        if tile_size <= 0 {
            return Err(LevelError::InvalidTileSize { tile_size });
        }
        if !extent_fits(map.row_count(), tile_size) || !extent_fits(map.column_count(), tile_size) {
            return Err(LevelError::BoardTooLarge {
                rows: map.row_count(),
                columns: map.column_count(),
                tile_size,
            });
        }

        let expected_rows = usize::try_from(map.row_count()).unwrap_or(usize::MAX);
        if map.rows().len() != expected_rows {
            return Err(LevelError::RowCount {
                expected: map.row_count(),
                found: map.rows().len(),
            });
        }

        let expected_columns = usize::try_from(map.column_count()).unwrap_or(usize::MAX);
        let mut tiles = Vec::with_capacity(expected_rows.saturating_mul(expected_columns));
        let mut walls = Vec::new();
        let mut foods = BTreeSet::new();
        let mut spawns = Vec::new();

        for (row, line) in (0..map.row_count()).zip(map.rows()) {
            let symbols: Vec<char> = line.chars().collect();
            if symbols.len() != expected_columns {
                return Err(LevelError::ColumnCount {
                    row,
                    expected: map.column_count(),
                    found: symbols.len(),
                });
            }

            for (column, symbol) in (0..map.column_count()).zip(symbols) {
                let cell = GridCell::new(row, column);
                let tile = Tile::new(TileKind::from_map_char(symbol), cell, tile_size);
                match tile.kind() {
                    TileKind::Wall => walls.push(tile),
                    TileKind::Food => {
                        let _ = foods.insert(cell);
                    }
                    TileKind::Skip | TileKind::Empty => {}
                }
                if let Some(kind) = CreatureKind::from_marker(symbol) {
                    spawns.push(CreatureSpawn { kind, cell });
                }
                tiles.push(tile);
            }
        }

        Ok(Self {
            row_count: map.row_count(),
            column_count: map.column_count(),
            tile_size,
            tiles,
            walls,
            foods,
            spawns,
        })
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn column_count(&self) -> u32 {
        self.column_count
    }

    /// Side length of every tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Width of the board in pixels.
    #[must_use]
    pub const fn board_width(&self) -> i32 {
        self.column_count as i32 * self.tile_size
    }

    /// Height of the board in pixels.
    #[must_use]
    pub const fn board_height(&self) -> i32 {
        self.row_count as i32 * self.tile_size
    }

    /// Every wall tile in row-major order.
    #[must_use]
    pub fn walls(&self) -> &[Tile] {
        &self.walls
    }

    /// Food tiles that still hold a pip, in row-major order.
    pub fn foods(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.foods.iter().filter_map(|cell| self.tile_at(*cell))
    }

    /// Number of pips left in the level.
    #[must_use]
    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    /// Reports whether any pip is left.
    #[must_use]
    pub fn has_food(&self) -> bool {
        !self.foods.is_empty()
    }

    /// Reports whether the provided cell still holds a pip.
    #[must_use]
    pub fn holds_food(&self, cell: GridCell) -> bool {
        self.foods.contains(&cell)
    }

    /// Removes the pip at the provided cell, returning whether one was present.
    pub fn remove_food(&mut self, cell: GridCell) -> bool {
        self.foods.remove(&cell)
    }

    /// Creature markers found while scanning the map, in row-major order.
    #[must_use]
    pub fn spawns(&self) -> &[CreatureSpawn] {
        &self.spawns
    }

    /// Looks up the tile at the provided row and column.
    ///
    /// Returns `None` when either index falls outside the grid.
    #[must_use]
    pub fn tile(&self, row: i32, column: i32) -> Option<&Tile> {
        let row = u32::try_from(row).ok()?;
        let column = u32::try_from(column).ok()?;
        self.tile_at(GridCell::new(row, column))
    }

    /// Looks up the tile occupying the provided grid cell.
    #[must_use]
    pub fn tile_at(&self, cell: GridCell) -> Option<&Tile> {
        if cell.row() >= self.row_count || cell.column() >= self.column_count {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.column_count).ok()?;
        self.tiles.get(row * width + column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_map() -> LevelMap {
        LevelMap::from_rows(["XXXXX", "X P X", "XO rX", "XXXXX"])
    }

    #[test]
    fn canonical_map_registers_walls_and_pips() {
        let level = Level::build(&LevelMap::canonical(), 32).expect("canonical map is valid");

        assert_eq!(level.row_count(), 21);
        assert_eq!(level.column_count(), 19);
        assert_eq!(level.walls().len(), 196);
        assert_eq!(level.food_count(), 184);
        assert_eq!(level.board_width(), 19 * 32);
        assert_eq!(level.board_height(), 21 * 32);
        assert_eq!(level.spawns().len(), 5);
    }

    #[test]
    fn characters_map_to_tile_kinds() {
        let level = Level::build(&tiny_map(), 32).expect("valid map");

        assert_eq!(level.tile(0, 0).map(Tile::kind), Some(TileKind::Wall));
        assert_eq!(level.tile(1, 1).map(Tile::kind), Some(TileKind::Food));
        assert_eq!(level.tile(1, 2).map(Tile::kind), Some(TileKind::Empty));
        assert_eq!(level.tile(2, 1).map(Tile::kind), Some(TileKind::Skip));
        assert_eq!(level.tile(2, 3).map(Tile::kind), Some(TileKind::Empty));
        assert_eq!(level.food_count(), 3);
        assert!(!level.holds_food(GridCell::new(2, 1)));
        assert!(level.walls().iter().all(|wall| wall.kind() == TileKind::Wall));
    }

    #[test]
    fn spawns_follow_scan_order() {
        let level = Level::build(&tiny_map(), 32).expect("valid map");

        assert_eq!(
            level.spawns(),
            &[
                CreatureSpawn {
                    kind: CreatureKind::Player,
                    cell: GridCell::new(1, 2),
                },
                CreatureSpawn {
                    kind: CreatureKind::RedGhost,
                    cell: GridCell::new(2, 3),
                },
            ]
        );
    }

    #[test]
    fn tile_lookup_outside_grid_yields_none() {
        let level = Level::build(&tiny_map(), 32).expect("valid map");

        assert!(level.tile(-1, 0).is_none());
        assert!(level.tile(0, -1).is_none());
        assert!(level.tile(4, 0).is_none());
        assert!(level.tile(0, 5).is_none());
        let corner = level.tile(3, 4).expect("corner tile");
        assert_eq!(corner.position(), Position::new(128, 96));
        assert_eq!(corner.width(), 32);
        assert_eq!(corner.height(), 32);
    }

    #[test]
    fn removing_food_shrinks_the_pip_set() {
        let mut level = Level::build(&tiny_map(), 32).expect("valid map");
        let cell = GridCell::new(1, 1);

        assert!(level.remove_food(cell));
        assert!(!level.remove_food(cell));
        assert_eq!(level.food_count(), 2);
        assert!(level.foods().all(|tile| tile.cell() != cell));
        assert_eq!(level.tile_at(cell).map(Tile::kind), Some(TileKind::Food));
    }

    #[test]
    fn has_food_reports_empty_levels() {
        let mut level = Level::build(&tiny_map(), 32).expect("valid map");
        let cells: Vec<GridCell> = level.foods().map(Tile::cell).collect();
        for cell in cells {
            assert!(level.has_food());
            let _ = level.remove_food(cell);
        }
        assert!(!level.has_food());
    }

    #[test]
    fn pip_hitbox_is_inset_inside_the_tile() {
        let level = Level::build(&tiny_map(), 32).expect("valid map");
        let food = level.tile(1, 1).expect("food tile");

        assert_eq!(food.pip_position(), Position::new(46, 46));
        assert_eq!(food.pip_size(), 4);
    }

    #[test]
    fn missing_rows_are_rejected() {
        let map = LevelMap::new(["XXX", "X X"], 3, 3);
        assert_eq!(
            Level::build(&map, 32),
            Err(LevelError::RowCount {
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let map = LevelMap::new(["XXX", "X X", "XX"], 3, 3);
        assert_eq!(
            Level::build(&map, 32),
            Err(LevelError::ColumnCount {
                row: 2,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn non_positive_tile_sizes_are_rejected() {
        assert_eq!(
            Level::build(&tiny_map(), 0),
            Err(LevelError::InvalidTileSize { tile_size: 0 })
        );
    }

    #[test]
    fn boards_beyond_pixel_range_are_rejected() {
        assert_eq!(
            Level::build(&LevelMap::canonical(), 200_000_000),
            Err(LevelError::BoardTooLarge {
                rows: CANONICAL_ROWS,
                columns: CANONICAL_COLUMNS,
                tile_size: 200_000_000,
            })
        );
        assert!(Level::build(&LevelMap::canonical(), 1_000_000).is_ok());
    }
}
