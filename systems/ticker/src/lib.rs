#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step scheduler that converts elapsed frame time into tick commands.

use std::time::Duration;

use pip_maze_core::{Command, Event, DEFAULT_TICK_INTERVAL};
use tracing::debug;

/// Largest number of ticks emitted for a single frame by default.
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 5;

/// Configuration parameters required to construct the ticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    tick_interval: Duration,
    max_ticks_per_frame: u32,
}

impl Config {
    /// Creates a new configuration using the provided cadence and burst limit.
    #[must_use]
    pub const fn new(tick_interval: Duration, max_ticks_per_frame: u32) -> Self {
        Self {
            tick_interval,
            max_ticks_per_frame,
        }
    }

    /// Interval between two ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, DEFAULT_MAX_TICKS_PER_FRAME)
    }
}

/// Pure system that emits [`Command::Tick`] at a fixed cadence.
///
/// Time only accumulates while the game is running: a pause or a game over
/// observed in the event stream discards the backlog, and a restart or
/// unpause resumes scheduling from zero.
#[derive(Debug)]
pub struct Ticker {
    tick_interval: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    suspended: bool,
}

impl Ticker {
    /// Creates a new ticker using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tick_interval: config.tick_interval,
            max_ticks_per_frame: config.max_ticks_per_frame,
            accumulator: Duration::ZERO,
            suspended: false,
        }
    }

    /// Reports whether the ticker is waiting for the game to resume.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Consumes world events and the elapsed frame time to emit tick commands.
    pub fn handle(&mut self, events: &[Event], frame_time: Duration, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::PauseToggled { paused } => self.suspended = *paused,
                Event::GameOver { .. } => self.suspended = true,
                Event::GameRestarted => self.suspended = false,
                _ => {}
            }
        }

        if self.suspended {
            self.accumulator = Duration::ZERO;
            return;
        }

        self.accumulator = self.accumulator.saturating_add(frame_time);
        let ticks = self.resolve_tick_count();
        out.extend(std::iter::repeat(Command::Tick).take(ticks));
    }

    fn resolve_tick_count(&mut self) -> usize {
        if self.tick_interval.is_zero() {
            return 0;
        }

        let mut ticks = 0;
        while self.accumulator >= self.tick_interval {
            if ticks == self.max_ticks_per_frame {
                debug!(
                    backlog_ms = u64::try_from(self.accumulator.as_millis()).unwrap_or(u64::MAX),
                    "dropping tick backlog"
                );
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.tick_interval;
            ticks += 1;
        }
        usize::try_from(ticks).unwrap_or(usize::MAX)
    }
}
