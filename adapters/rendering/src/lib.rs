#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Pip Maze adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use pip_maze_core::{CreatureKind, Direction, Position, PIP_INSET, PIP_SIZE};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Fixed colors used by every backend.
pub mod palette {
    use super::Color;

    /// Frame background.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0, 0, 0);
    /// Wall tiles.
    pub const WALL: Color = Color::from_rgb_u8(0x21, 0x21, 0xde);
    /// Pips.
    pub const PIP: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// HUD text.
    pub const TEXT: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// The player.
    pub const PLAYER: Color = Color::from_rgb_u8(0xff, 0xe0, 0x00);
    /// Red adversary.
    pub const RED_GHOST: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
    /// Blue adversary.
    pub const BLUE_GHOST: Color = Color::from_rgb_u8(0x00, 0xff, 0xff);
    /// Pink adversary.
    pub const PINK_GHOST: Color = Color::from_rgb_u8(0xff, 0xb8, 0xff);
    /// Orange adversary.
    pub const ORANGE_GHOST: Color = Color::from_rgb_u8(0xff, 0xb8, 0x52);
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction key released on this frame, if any.
    pub direction: Option<Direction>,
    /// Whether the pause key was released on this frame.
    pub pause_pressed: bool,
    /// Whether any key at all was released on this frame.
    pub any_key_pressed: bool,
}

/// Describes the board dimensions rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a single tile expressed in board pixels.
    pub tile_length: f32,
}

impl BoardPresentation {
    /// Creates a new board descriptor.
    ///
    /// Returns an error when `tile_size` is not positive.
    pub fn new(columns: u32, rows: u32, tile_size: i32) -> Result<Self, RenderingError> {
        if tile_size <= 0 {
            return Err(RenderingError::InvalidTileSize { tile_size });
        }

        Ok(Self {
            columns,
            rows,
            tile_length: tile_size as f32,
        })
    }

    /// Calculates the total width of the board.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the board.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Side length of a pip in board pixels.
    #[must_use]
    pub const fn pip_length(&self) -> f32 {
        PIP_SIZE as f32
    }

    /// Converts a world pixel position into board space.
    #[must_use]
    pub fn to_board_space(&self, position: Position) -> Vec2 {
        Vec2::new(position.x as f32, position.y as f32)
    }

    /// Top-left corner of the pip drawn inside the food tile at `tile_origin`.
    #[must_use]
    pub fn pip_origin(&self, tile_origin: Position) -> Vec2 {
        self.to_board_space(tile_origin.offset(PIP_INSET, PIP_INSET))
    }
}

/// Describes a creature drawn on the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreaturePresentation {
    /// Role of the creature, which selects its color.
    pub kind: CreatureKind,
    /// Top-left corner in board space.
    pub origin: Vec2,
    /// Direction the creature faces.
    pub facing: Direction,
}

impl CreaturePresentation {
    /// Creates a new creature descriptor.
    #[must_use]
    pub const fn new(kind: CreatureKind, origin: Vec2, facing: Direction) -> Self {
        Self {
            kind,
            origin,
            facing,
        }
    }

    /// Color used to fill the creature's body.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self.kind {
            CreatureKind::Player => palette::PLAYER,
            CreatureKind::RedGhost => palette::RED_GHOST,
            CreatureKind::BlueGhost => palette::BLUE_GHOST,
            CreatureKind::PinkGhost => palette::PINK_GHOST,
            CreatureKind::OrangeGhost => palette::ORANGE_GHOST,
        }
    }

    /// Center of the body for a square footprint of `tile_length`.
    #[must_use]
    pub fn center(&self, tile_length: f32) -> Vec2 {
        self.origin + Vec2::splat(tile_length * 0.5)
    }

    /// Point halfway between the center and the edge the creature faces.
    #[must_use]
    pub fn facing_marker(&self, tile_length: f32) -> Vec2 {
        let (dx, dy) = self.facing.unit();
        self.center(tile_length) + Vec2::new(dx as f32, dy as f32) * (tile_length * 0.25)
    }
}

/// Text overlay drawn above the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
    /// Lives left.
    pub lives: u32,
    /// Score of the running game.
    pub score: u32,
    /// Best score of the session.
    pub high_score: u32,
    /// Level being played.
    pub level: u32,
    /// Whether ticks are suspended.
    pub paused: bool,
    /// Whether the player ran out of lives.
    pub game_over: bool,
}

impl HudPresentation {
    /// Status line shown in the top-left corner.
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.game_over {
            format!("GAME OVER: {}", self.score)
        } else {
            format!("x{} SCORE: {}", self.lives, self.score)
        }
    }

    /// Secondary line listing the level and the session best.
    #[must_use]
    pub fn detail_line(&self) -> String {
        format!("LEVEL: {} HIGH: {}", self.level, self.high_score)
    }

    /// Centered banner, if the game is paused or over. Game over wins over pause.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        if self.game_over {
            Some("Press any key to RESTART")
        } else if self.paused {
            Some("GAME IS PAUSED")
        } else {
            None
        }
    }
}

/// Scene description combining the board, its static walls and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board that composes the play area.
    pub board: BoardPresentation,
    /// Top-left corners of every wall tile.
    pub walls: Vec<Vec2>,
    /// Top-left corners of every pip still in the level.
    pub pips: Vec<Vec2>,
    /// Creatures in draw order; adversaries are drawn above the player.
    pub creatures: Vec<CreaturePresentation>,
    /// Text overlay.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        board: BoardPresentation,
        walls: Vec<Vec2>,
        pips: Vec<Vec2>,
        creatures: Vec<CreaturePresentation>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            board,
            walls,
            pips,
            creatures,
            hud,
        }
    }

    /// Creates a scene that only knows the board dimensions.
    #[must_use]
    pub fn empty(board: BoardPresentation) -> Self {
        Self::new(
            board,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            HudPresentation::default(),
        )
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Pip Maze scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and refreshes the scene from
    /// the world before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Tiles must span at least one pixel.
    InvalidTileSize {
        /// Provided tile size that failed validation.
        tile_size: i32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { tile_size } => {
                write!(f, "tile_size must be positive (received {tile_size})")
            }
        }
    }
}

impl Error for RenderingError {}
