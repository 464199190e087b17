#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system responsible for emitting steering, pause and restart commands.

use pip_maze_core::{Command, CreatureId, Direction, Event};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Direction requested by an arrow or WASD key released on this frame.
    pub direction: Option<Direction>,
    /// Indicates whether the pause key was released on this frame.
    pub toggle_pause: bool,
    /// Indicates whether any key at all was released on this frame.
    pub any_key: bool,
}

impl PlayerInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(direction: Option<Direction>, toggle_pause: bool, any_key: bool) -> Self {
        Self {
            direction,
            toggle_pause,
            any_key,
        }
    }
}

/// Controls system that translates player input into world commands.
///
/// While the game is over every key press requests a restart and nothing else.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    game_over: bool,
}

impl Controls {
    /// Creates a new controls system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { game_over: false }
    }

    /// Reports whether the last observed event stream ended the game.
    #[must_use]
    pub const fn awaiting_restart(&self) -> bool {
        self.game_over
    }

    /// Consumes world events and adapter-derived input to emit commands.
    pub fn handle(&mut self, events: &[Event], input: PlayerInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameOver { .. } => self.game_over = true,
                Event::GameRestarted => self.game_over = false,
                _ => {}
            }
        }

        if self.game_over {
            if input.any_key {
                out.push(Command::Restart);
            }
            return;
        }

        if let Some(direction) = input.direction {
            out.push(Command::SetDirection {
                creature: CreatureId::PLAYER,
                direction,
            });
        }

        if input.toggle_pause {
            out.push(Command::TogglePause);
        }
    }
}
