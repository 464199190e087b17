//! Mobile actors: the player and the adversaries.

use pip_maze_core::{CreatureKind, Direction, Position, STEPS_PER_TILE};

use crate::level::CreatureSpawn;

/// Mutable per-actor state.
///
/// A creature always faces a direction and moves along at most one axis at a
/// time, covering a quarter of a tile per step. Legality of a step is decided
/// by the caller, which undoes illegal steps with [`Creature::step_back`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Creature {
    kind: CreatureKind,
    position: Position,
    start_position: Position,
    direction: Direction,
    velocity: (i32, i32),
    tile_size: i32,
}

impl Creature {
    /// Creates a creature facing up and standing still.
    #[must_use]
    pub const fn new(kind: CreatureKind, x: i32, y: i32, tile_size: i32) -> Self {
        let position = Position::new(x, y);
        Self {
            kind,
            position,
            start_position: position,
            direction: Direction::Up,
            velocity: (0, 0),
            tile_size,
        }
    }

    /// Creates a creature standing on the provided spawn marker.
    #[must_use]
    pub const fn from_spawn(spawn: &CreatureSpawn, tile_size: i32) -> Self {
        let origin = spawn.cell.origin(tile_size);
        Self::new(spawn.kind, origin.x, origin.y, tile_size)
    }

    /// Role and appearance of the creature.
    #[must_use]
    pub const fn kind(&self) -> CreatureKind {
        self.kind
    }

    /// Current pixel position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Position the creature returns to on [`Creature::reset`].
    #[must_use]
    pub const fn start_position(&self) -> Position {
        self.start_position
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    /// Vertical pixel coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    /// Direction the creature currently faces.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Displacement applied by the next step.
    #[must_use]
    pub const fn velocity(&self) -> (i32, i32) {
        self.velocity
    }

    /// Side length of the creature's square footprint.
    #[must_use]
    pub const fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Pixels covered by one step.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.tile_size / STEPS_PER_TILE
    }

    /// Faces the creature in a new direction and replaces its velocity.
    pub fn update_direction(&mut self, direction: Direction) {
        let (dx, dy) = direction.unit();
        let speed = self.speed();
        self.direction = direction;
        self.velocity = (dx * speed, dy * speed);
    }

    /// Applies the velocity to the position.
    pub fn step_forward(&mut self) {
        let (dx, dy) = self.velocity;
        self.position = self.position.offset(dx, dy);
    }

    /// Undoes one step.
    pub fn step_back(&mut self) {
        let (dx, dy) = self.velocity;
        self.position = self.position.offset(-dx, -dy);
    }

    /// Returns to the start position and stops. The direction is kept.
    pub fn reset(&mut self) {
        self.position = self.start_position;
        self.velocity = (0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pip_maze_core::GridCell;

    #[test]
    fn new_creatures_face_up_and_stand_still() {
        let creature = Creature::new(CreatureKind::Player, 64, 96, 32);

        assert_eq!(creature.direction(), Direction::Up);
        assert_eq!(creature.velocity(), (0, 0));
        assert_eq!(creature.position(), Position::new(64, 96));
        assert_eq!(creature.start_position(), Position::new(64, 96));
    }

    #[test]
    fn velocity_is_a_quarter_tile_along_one_axis() {
        let mut creature = Creature::new(CreatureKind::BlueGhost, 0, 0, 32);
        let expected = [
            (Direction::Up, (0, -8)),
            (Direction::Down, (0, 8)),
            (Direction::Left, (-8, 0)),
            (Direction::Right, (8, 0)),
        ];

        for (direction, velocity) in expected {
            creature.update_direction(direction);
            assert_eq!(creature.direction(), direction);
            assert_eq!(creature.velocity(), velocity);
        }
    }

    #[test]
    fn stepping_back_restores_the_prior_position() {
        for direction in Direction::ALL {
            let mut creature = Creature::new(CreatureKind::Player, 160, 160, 32);
            creature.update_direction(direction);
            creature.step_forward();
            assert_ne!(creature.position(), Position::new(160, 160));
            creature.step_back();
            assert_eq!(creature.position(), Position::new(160, 160));
        }
    }

    #[test]
    fn steps_accumulate_linearly() {
        let mut creature = Creature::new(CreatureKind::Player, 32, 32, 32);
        creature.update_direction(Direction::Right);
        for _ in 0..5 {
            creature.step_forward();
        }
        assert_eq!(creature.position(), Position::new(32 + 5 * 8, 32));
    }

    #[test]
    fn reset_restores_start_and_keeps_direction() {
        let mut creature = Creature::new(CreatureKind::OrangeGhost, 64, 64, 32);
        creature.update_direction(Direction::Down);
        creature.step_forward();
        creature.step_forward();
        creature.update_direction(Direction::Left);
        creature.step_forward();

        creature.reset();

        assert_eq!(creature.position(), Position::new(64, 64));
        assert_eq!(creature.velocity(), (0, 0));
        assert_eq!(creature.direction(), Direction::Left);
    }

    #[test]
    fn spawn_markers_translate_to_pixels() {
        let spawn = CreatureSpawn {
            kind: CreatureKind::PinkGhost,
            cell: GridCell::new(9, 9),
        };
        let creature = Creature::from_spawn(&spawn, 32);

        assert_eq!(creature.kind(), CreatureKind::PinkGhost);
        assert_eq!(creature.position(), Position::new(288, 288));
    }
}
