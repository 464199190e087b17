//! Wiring between the world, the pure systems and the presented scene.

use std::{fmt, mem, time::Duration};

use anyhow::{Context, Result};
use pip_maze_core::{Command, Event};
use pip_maze_rendering::{BoardPresentation, CreaturePresentation, HudPresentation, Scene};
use pip_maze_system_analytics::{format_play_time, play_time, Analytics};
use pip_maze_system_controls::{Controls, PlayerInput};
use pip_maze_system_ticker::{Config as TickerConfig, Ticker};
use pip_maze_world::{self as world, query, World};

/// Owns the world and every system that drives it.
///
/// Systems observe the events produced by the previous frame, in the same
/// order as the commands they emit are applied: input first, then ticks.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    ticker: Ticker,
    tick_interval: Duration,
    controls: Controls,
    analytics: Analytics,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    pub(crate) fn new(world: World, ticker: TickerConfig) -> Self {
        Self {
            world,
            ticker: Ticker::new(ticker),
            tick_interval: ticker.tick_interval(),
            controls: Controls::new(),
            analytics: Analytics::new(),
            events: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Advances the game by one rendered frame.
    pub(crate) fn step(&mut self, frame_time: Duration, input: PlayerInput) {
        let mut commands = mem::take(&mut self.commands);
        self.controls.handle(&self.events, input, &mut commands);
        self.ticker.handle(&self.events, frame_time, &mut commands);

        self.events.clear();
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.commands = commands;
        self.analytics.handle(&self.events);
    }

    /// Applies `ticks` ticks back to back, bypassing the scheduler.
    pub(crate) fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.events.clear();
            world::apply(&mut self.world, Command::Tick, &mut self.events);
            self.analytics.handle(&self.events);
        }
    }

    /// Describes the board of the current level.
    pub(crate) fn board(&self) -> Result<BoardPresentation> {
        let level = query::level(&self.world);
        BoardPresentation::new(level.column_count(), level.row_count(), level.tile_size())
            .context("failed to describe the board")
    }

    /// Refreshes every dynamic part of `scene` from the world.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let board = scene.board;
        let level = query::level(&self.world);

        scene.walls.clear();
        scene.walls.extend(
            level
                .walls()
                .iter()
                .map(|wall| board.to_board_space(wall.position())),
        );

        scene.pips.clear();
        scene
            .pips
            .extend(level.foods().map(|food| board.pip_origin(food.position())));

        scene.creatures.clear();
        scene.creatures.extend(
            query::creature_view(&self.world)
                .iter()
                .map(|snapshot| {
                    CreaturePresentation::new(
                        snapshot.kind,
                        board.to_board_space(snapshot.position),
                        snapshot.direction,
                    )
                }),
        );

        scene.hud = HudPresentation {
            lives: query::lives(&self.world),
            score: query::score(&self.world),
            high_score: self.analytics.stats().high_score,
            level: query::level_number(&self.world),
            paused: query::is_paused(&self.world),
            game_over: query::is_game_over(&self.world),
        };
    }

    /// Snapshot of the game for the headless report.
    pub(crate) fn summary(&self) -> Summary {
        let stats = self.analytics.stats();
        Summary {
            score: query::score(&self.world),
            lives: query::lives(&self.world),
            level: query::level_number(&self.world),
            remaining_pips: query::remaining_pips(&self.world),
            ticks: query::tick_index(&self.world),
            pips_eaten: stats.pips_eaten,
            game_over: query::is_game_over(&self.world),
            play_time: play_time(query::tick_index(&self.world), self.tick_interval),
        }
    }
}

/// Final state printed by headless runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) level: u32,
    pub(crate) remaining_pips: usize,
    pub(crate) ticks: u64,
    pub(crate) pips_eaten: u64,
    pub(crate) game_over: bool,
    pub(crate) play_time: Duration,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "score: {}", self.score)?;
        writeln!(f, "lives: {}", self.lives)?;
        writeln!(f, "level: {}", self.level)?;
        writeln!(f, "remaining pips: {}", self.remaining_pips)?;
        writeln!(f, "pips eaten: {}", self.pips_eaten)?;
        writeln!(f, "ticks: {}", self.ticks)?;
        writeln!(f, "play time: {}", format_play_time(self.play_time))?;
        write!(f, "game over: {}", self.game_over)
    }
}
