#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Pip Maze.
//!
//! The [`World`] owns the current level, the player, the adversaries, and the
//! score keeping. Every mutation goes through [`apply`], which makes the world
//! the single writer of game state: ticks and player commands are serialized
//! by whoever calls it. Read access goes through the [`query`] module.

pub mod collision;
pub mod creature;
mod engine;
pub mod level;

pub use creature::Creature;
pub use level::{CreatureSpawn, Level, LevelError, LevelMap, Tile};

use pip_maze_core::{
    Command, CreatureId, CreatureKind, Direction, Event, DEFAULT_TILE_SIZE, STARTING_LIVES,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Row on which adversaries moving sideways are turned upward.
pub const TUNNEL_ROW: i32 = 9;

/// Parameters required to construct a [`World`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Blueprint used for the first level and every level after a clear.
    pub map: LevelMap,
    /// Side length of a tile in pixels.
    pub tile_size: i32,
    /// Seed of the random source that picks adversary directions.
    pub seed: u64,
}

impl WorldConfig {
    /// Configuration for the canonical level with the provided seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            map: LevelMap::canonical(),
            tile_size: DEFAULT_TILE_SIZE,
            seed,
        }
    }

    /// Replaces the level blueprint.
    #[must_use]
    pub fn with_map(mut self, map: LevelMap) -> Self {
        self.map = map;
        self
    }

    /// Replaces the tile size.
    #[must_use]
    pub fn with_tile_size(mut self, tile_size: i32) -> Self {
        self.tile_size = tile_size;
        self
    }
}

#[derive(Clone, Debug)]
struct Stage {
    level: Level,
    player: Creature,
    adversaries: Vec<Creature>,
}

impl Stage {
    fn populate(level: Level) -> Result<Self, LevelError> {
        let tile_size = level.tile_size();
        let mut player = None;
        let mut adversaries = Vec::new();

        for spawn in level.spawns() {
            let creature = Creature::from_spawn(spawn, tile_size);
            if spawn.kind != CreatureKind::Player {
                adversaries.push(creature);
                continue;
            }
            if player.is_some() {
                return Err(LevelError::DuplicatePlayer {
                    row: spawn.cell.row(),
                    column: spawn.cell.column(),
                });
            }
            player = Some(creature);
        }

        let player = player.ok_or(LevelError::MissingPlayer)?;
        Ok(Self {
            level,
            player,
            adversaries,
        })
    }
}

/// Represents the authoritative Pip Maze game state.
#[derive(Clone, Debug)]
pub struct World {
    pristine: Stage,
    stage: Stage,
    rng: ChaCha8Rng,
    score: u32,
    lives: u32,
    paused: bool,
    game_over: bool,
    level_number: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world ready for simulation.
    pub fn new(config: WorldConfig) -> Result<Self, LevelError> {
        Self::with_rng(
            &config.map,
            config.tile_size,
            ChaCha8Rng::seed_from_u64(config.seed),
        )
    }

    /// Creates a new world drawing adversary directions from the provided source.
    pub fn with_rng(map: &LevelMap, tile_size: i32, rng: ChaCha8Rng) -> Result<Self, LevelError> {
        let level = Level::build(map, tile_size)?;
        let pristine = Stage::populate(level)?;
        let mut world = Self {
            stage: pristine.clone(),
            pristine,
            rng,
            score: 0,
            lives: STARTING_LIVES,
            paused: false,
            game_over: false,
            level_number: 1,
            tick_index: 0,
        };
        world.stage = world.fresh_stage();
        Ok(world)
    }

    fn fresh_stage(&mut self) -> Stage {
        let mut stage = self.pristine.clone();
        for adversary in &mut stage.adversaries {
            adversary.update_direction(random_direction(&mut self.rng));
        }
        stage
    }

    fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        if id.is_player() {
            return Some(&mut self.stage.player);
        }
        let index = usize::try_from(id.get()).ok()?.checked_sub(1)?;
        self.stage.adversaries.get_mut(index)
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.stage = self.fresh_stage();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.paused = false;
        self.game_over = false;
        self.level_number = 1;
        self.tick_index = 0;
        info!("game restarted");
        out_events.push(Event::GameRestarted);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.advance(out_events),
        Command::SetDirection {
            creature,
            direction,
        } => match world.creature_mut(creature) {
            Some(target) => {
                target.update_direction(direction);
                debug!(creature = creature.get(), %direction, "direction changed");
                out_events.push(Event::DirectionChanged {
                    creature,
                    direction,
                });
            }
            None => {
                debug!(creature = creature.get(), "direction change for unknown creature");
                out_events.push(Event::DirectionRejected { creature });
            }
        },
        Command::TogglePause => {
            world.paused = !world.paused;
            debug!(paused = world.paused, "pause toggled");
            out_events.push(Event::PauseToggled {
                paused: world.paused,
            });
        }
        Command::Restart => world.restart(out_events),
    }
}

fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use pip_maze_core::{CreatureId, CreatureSnapshot, CreatureView};

    use super::{Creature, Level, World};

    /// Provides read-only access to the current level.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.stage.level
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Creature {
        &world.stage.player
    }

    /// Provides read-only access to the adversaries in list order.
    #[must_use]
    pub fn adversaries(world: &World) -> &[Creature] {
        &world.stage.adversaries
    }

    /// Captures a read-only view of every creature in the level.
    #[must_use]
    pub fn creature_view(world: &World) -> CreatureView {
        let player = snapshot(CreatureId::PLAYER, &world.stage.player);
        let adversaries = (1..)
            .zip(&world.stage.adversaries)
            .map(|(id, creature)| snapshot(CreatureId::new(id), creature));
        CreatureView::from_snapshots(std::iter::once(player).chain(adversaries).collect())
    }

    /// Points collected in the current game.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Lives left in the current game.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Reports whether ticks are suspended.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Reports whether the player ran out of lives.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// One-based number of the level being played.
    #[must_use]
    pub fn level_number(world: &World) -> u32 {
        world.level_number
    }

    /// Ticks executed since the current game started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Pips left in the current level.
    #[must_use]
    pub fn remaining_pips(world: &World) -> usize {
        world.stage.level.food_count()
    }

    fn snapshot(id: CreatureId, creature: &Creature) -> CreatureSnapshot {
        CreatureSnapshot {
            id,
            kind: creature.kind(),
            position: creature.position(),
            direction: creature.direction(),
        }
    }
}
