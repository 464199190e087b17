#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that aggregates session statistics from world events.

pub mod metrics;

use pip_maze_core::Event;

pub use metrics::{average_score, format_play_time, play_time};

/// Statistics accumulated across every game of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Score of the game in progress.
    pub current_score: u32,
    /// Highest score reached in any game, including the running one.
    pub high_score: u32,
    /// Number of games that ended with a game over.
    pub games_played: u32,
    /// Sum of the final scores of finished games.
    pub total_final_score: u64,
    /// Pips eaten across the session.
    pub pips_eaten: u64,
    /// Levels cleared across the session.
    pub levels_cleared: u32,
    /// Lives lost across the session.
    pub lives_lost: u32,
    /// Ticks executed in the game in progress.
    pub ticks_played: u64,
}

/// Pure analytics system that folds world events into [`SessionStats`].
#[derive(Debug, Default)]
pub struct Analytics {
    stats: SessionStats,
}

impl Analytics {
    /// Creates a new analytics system with empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics gathered so far.
    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Consumes world events and updates the session statistics.
    pub fn handle(&mut self, events: &[Event]) {
        let stats = &mut self.stats;
        for event in events {
            match *event {
                Event::TickAdvanced { tick } => stats.ticks_played = tick,
                Event::PipEaten { points, .. } => {
                    stats.pips_eaten += 1;
                    stats.current_score = stats.current_score.saturating_add(points);
                    stats.high_score = stats.high_score.max(stats.current_score);
                }
                Event::LifeLost { .. } => stats.lives_lost += 1,
                Event::LevelCleared { .. } => stats.levels_cleared += 1,
                Event::GameOver { final_score } => {
                    stats.games_played += 1;
                    stats.total_final_score += u64::from(final_score);
                    stats.high_score = stats.high_score.max(final_score);
                }
                Event::GameRestarted => {
                    stats.current_score = 0;
                    stats.ticks_played = 0;
                }
                Event::DirectionChanged { .. }
                | Event::DirectionRejected { .. }
                | Event::PipRemoved { .. }
                | Event::PauseToggled { .. } => {}
            }
        }
    }
}
