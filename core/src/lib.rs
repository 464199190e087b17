#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pip Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened during the step. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown by adapters that open a window.
pub const WINDOW_TITLE: &str = "Pip Maze";

/// Side length of a square tile in pixels used by the canonical level.
pub const DEFAULT_TILE_SIZE: i32 = 32;

/// Interval between two simulation ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Lives granted at the start of every game.
pub const STARTING_LIVES: u32 = 3;

/// Score awarded for every pip the player overlaps.
pub const POINTS_PER_PIP: u32 = 10;

/// Offset from a food tile's origin to the top-left corner of its pip.
pub const PIP_INSET: i32 = 14;

/// Side length of the square pip hitbox in pixels.
pub const PIP_SIZE: i32 = 4;

/// Number of ticks a creature needs to cross one tile.
pub const STEPS_PER_TILE: i32 = 4;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation by exactly one fixed step.
    Tick,
    /// Points a creature in a new direction, replacing its velocity immediately.
    SetDirection {
        /// Creature that should turn.
        creature: CreatureId,
        /// Direction the creature should face afterwards.
        direction: Direction,
    },
    /// Suspends or resumes the effect of ticks.
    TogglePause,
    /// Discards the running game and starts over with default score and lives.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that a tick ran to completion or until the game ended.
    TickAdvanced {
        /// Number of ticks executed since the current game started.
        tick: u64,
    },
    /// Confirms that a creature accepted a new direction.
    DirectionChanged {
        /// Creature that turned.
        creature: CreatureId,
        /// Direction the creature now faces.
        direction: Direction,
    },
    /// Reports that a direction change targeted an unknown creature.
    DirectionRejected {
        /// Identifier supplied with the rejected command.
        creature: CreatureId,
    },
    /// Reports that the player overlapped a pip and earned points for it.
    PipEaten {
        /// Grid cell holding the pip.
        cell: GridCell,
        /// Points awarded for the pip.
        points: u32,
    },
    /// Confirms that a pip was removed from the level.
    PipRemoved {
        /// Grid cell that no longer holds a pip.
        cell: GridCell,
    },
    /// Reports that an adversary caught the player.
    LifeLost {
        /// Lives left after the catch.
        lives_remaining: u32,
    },
    /// Announces that the player ran out of lives.
    GameOver {
        /// Score reached when the game ended.
        final_score: u32,
    },
    /// Announces that every pip of a level was eaten and a fresh level was loaded.
    LevelCleared {
        /// One-based number of the level that was cleared.
        level: u32,
    },
    /// Announces a change to the paused flag.
    PauseToggled {
        /// Whether ticks are now suspended.
        paused: bool,
    },
    /// Confirms that the world started a new game from scratch.
    GameRestarted,
}

/// Cardinal movement directions available to creatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing y coordinates.
    Up,
    /// Movement toward increasing y coordinates.
    Down,
    /// Movement toward decreasing x coordinates.
    Left,
    /// Movement toward increasing x coordinates.
    Right,
}

impl Direction {
    /// All directions in the order used when drawing a random direction.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Reports whether the direction moves along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Unit step `(dx, dy)` for the direction in screen coordinates.
    #[must_use]
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Single-character token used by scripts and logs.
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = DirectionParseError;

    fn try_from(token: char) -> Result<Self, Self::Error> {
        match token {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            other => Err(DirectionParseError::UnknownToken(other.to_string())),
        }
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(first), None) => Direction::try_from(first),
            _ => Err(DirectionParseError::UnknownToken(token.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Error raised when a direction token is outside the `U`/`D`/`L`/`R` alphabet.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DirectionParseError {
    /// The token does not name a direction.
    #[error("unknown direction token {0:?}")]
    UnknownToken(String),
}

/// Role of a creature, which also selects its appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    /// The creature steered by the human.
    Player,
    /// Red adversary.
    RedGhost,
    /// Blue adversary.
    BlueGhost,
    /// Pink adversary.
    PinkGhost,
    /// Orange adversary.
    OrangeGhost,
}

impl CreatureKind {
    /// Resolves the creature spawned by a level map marker, if any.
    #[must_use]
    pub const fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'P' => Some(CreatureKind::Player),
            'r' => Some(CreatureKind::RedGhost),
            'b' => Some(CreatureKind::BlueGhost),
            'p' => Some(CreatureKind::PinkGhost),
            'o' => Some(CreatureKind::OrangeGhost),
            _ => None,
        }
    }

    /// Reports whether the creature hunts the player.
    #[must_use]
    pub const fn is_adversary(self) -> bool {
        !matches!(self, CreatureKind::Player)
    }
}

/// Unique identifier assigned to a creature within the current level.
///
/// The player always holds [`CreatureId::PLAYER`]; adversaries are numbered
/// from one in the order the level map lists them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(u32);

impl CreatureId {
    /// Identifier reserved for the player.
    pub const PLAYER: CreatureId = CreatureId(0);

    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the identifier names the player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

/// Location of a single grid cell expressed as row and column indices.
///
/// Ordering is row-major, matching the order in which level maps are scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    row: u32,
    column: u32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Pixel position of the cell's top-left corner for the provided tile size.
    #[must_use]
    pub const fn origin(&self, tile_size: i32) -> Position {
        Position::new(self.column as i32 * tile_size, self.row as i32 * tile_size)
    }
}

/// Pixel-space coordinate pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the provided delta.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Static classification of a level tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Impassable obstacle.
    Wall,
    /// Walkable cell without a pip, typically a spawn marker.
    Empty,
    /// Walkable cell that started the level with a pip.
    Food,
    /// Tunnel placeholder that is never drawn, never blocks and never holds food.
    Skip,
}

impl TileKind {
    /// Classifies a level map character.
    #[must_use]
    pub const fn from_map_char(symbol: char) -> Self {
        match symbol {
            'X' => TileKind::Wall,
            ' ' => TileKind::Food,
            'O' => TileKind::Skip,
            _ => TileKind::Empty,
        }
    }
}

/// Immutable representation of a single creature's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CreatureSnapshot {
    /// Identifier assigned to the creature.
    pub id: CreatureId,
    /// Role and appearance of the creature.
    pub kind: CreatureKind,
    /// Current pixel position.
    pub position: Position,
    /// Direction the creature currently faces.
    pub direction: Direction,
}

/// Read-only snapshot describing every creature within the level.
#[derive(Clone, Debug, Default)]
pub struct CreatureView {
    snapshots: Vec<CreatureSnapshot>,
}

impl CreatureView {
    /// Creates a new creature view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CreatureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots, player first.
    pub fn iter(&self) -> impl Iterator<Item = &CreatureSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the player, if the view captured one.
    #[must_use]
    pub fn player(&self) -> Option<&CreatureSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id.is_player())
    }

    /// Iterator over the adversary snapshots in list order.
    pub fn adversaries(&self) -> impl Iterator<Item = &CreatureSnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| !snapshot.id.is_player())
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CreatureSnapshot> {
        self.snapshots
    }
}
