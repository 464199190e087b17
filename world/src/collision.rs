//! Axis-aligned overlap tests between creatures, tiles and pips.

use crate::{creature::Creature, level::Tile};

/// Axis-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hitbox {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Hitbox {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Footprint of a creature, which always spans one tile.
    #[must_use]
    pub const fn of_creature(creature: &Creature) -> Self {
        Self::new(
            creature.x(),
            creature.y(),
            creature.tile_size(),
            creature.tile_size(),
        )
    }

    /// Full extent of a tile.
    #[must_use]
    pub const fn of_tile(tile: &Tile) -> Self {
        Self::new(tile.x(), tile.y(), tile.width(), tile.height())
    }

    /// Reduced extent of the pip held by a food tile.
    #[must_use]
    pub const fn of_pip(tile: &Tile) -> Self {
        let origin = tile.pip_position();
        Self::new(origin.x, origin.y, tile.pip_size(), tile.pip_size())
    }
}

/// Reports whether two rectangles overlap. Rectangles that merely share an edge do not.
#[must_use]
pub const fn overlaps(a: Hitbox, b: Hitbox) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Reports whether a creature overlaps a tile.
#[must_use]
pub const fn creature_hits_tile(creature: &Creature, tile: &Tile) -> bool {
    overlaps(Hitbox::of_creature(creature), Hitbox::of_tile(tile))
}

/// Reports whether two creatures overlap.
#[must_use]
pub const fn creatures_collide(a: &Creature, b: &Creature) -> bool {
    overlaps(Hitbox::of_creature(a), Hitbox::of_creature(b))
}
