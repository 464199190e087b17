//! Fixed-step simulation executed for every [`Command::Tick`](pip_maze_core::Command::Tick).

use pip_maze_core::{Direction, Event, GridCell, POINTS_PER_PIP};
use tracing::{debug, info, trace};

use crate::{
    collision::{creature_hits_tile, creatures_collide, overlaps, Hitbox},
    random_direction, World, TUNNEL_ROW,
};

enum Catch {
    Escaped,
    Survived,
    Fatal,
}

impl World {
    /// Runs one tick. Paused and finished games ignore ticks entirely.
    pub(crate) fn advance(&mut self, out_events: &mut Vec<Event>) {
        if self.paused || self.game_over {
            return;
        }

        self.tick_index += 1;
        trace!(tick = self.tick_index, "tick");
        out_events.push(Event::TickAdvanced {
            tick: self.tick_index,
        });

        self.move_player();
        self.move_adversaries();
        match self.resolve_catch(out_events) {
            Catch::Fatal => return,
            Catch::Escaped | Catch::Survived => {}
        }
        self.consume_pips(out_events);
        self.check_level_complete(out_events);
    }

    fn move_player(&mut self) {
        let stage = &mut self.stage;
        stage.player.step_forward();
        if stage
            .level
            .walls()
            .iter()
            .any(|wall| creature_hits_tile(&stage.player, wall))
        {
            stage.player.step_back();
        }
    }

    fn move_adversaries(&mut self) {
        let stage = &mut self.stage;
        let rng = &mut self.rng;
        let tile_size = stage.level.tile_size();
        let board_width = stage.level.board_width();
        let tunnel_y = tile_size.saturating_mul(TUNNEL_ROW);

        for adversary in &mut stage.adversaries {
            if adversary.y() == tunnel_y && adversary.direction().is_horizontal() {
                adversary.update_direction(Direction::Up);
            }

            adversary.step_forward();
            let blocked = stage
                .level
                .walls()
                .iter()
                .any(|wall| creature_hits_tile(adversary, wall));
            let outside = adversary.x() <= 0 || adversary.x() + tile_size >= board_width;
            if blocked || outside {
                adversary.step_back();
                adversary.update_direction(random_direction(rng));
            }
        }
    }

    fn resolve_catch(&mut self, out_events: &mut Vec<Event>) -> Catch {
        let caught = self
            .stage
            .adversaries
            .iter()
            .any(|adversary| creatures_collide(adversary, &self.stage.player));
        if !caught {
            return Catch::Escaped;
        }

        self.lives = self.lives.saturating_sub(1);
        debug!(lives = self.lives, "player caught");
        out_events.push(Event::LifeLost {
            lives_remaining: self.lives,
        });

        if self.lives == 0 {
            self.game_over = true;
            info!(score = self.score, "game over");
            out_events.push(Event::GameOver {
                final_score: self.score,
            });
            return Catch::Fatal;
        }

        for adversary in &mut self.stage.adversaries {
            adversary.reset();
            adversary.update_direction(random_direction(&mut self.rng));
        }
        self.stage.player.reset();
        self.stage.player.update_direction(Direction::Up);
        Catch::Survived
    }

    fn consume_pips(&mut self, out_events: &mut Vec<Event>) {
        let reach = Hitbox::of_creature(&self.stage.player);
        let eaten: Vec<GridCell> = self
            .stage
            .level
            .foods()
            .filter(|tile| overlaps(reach, Hitbox::of_pip(tile)))
            .map(|tile| tile.cell())
            .collect();

        for cell in &eaten {
            self.score += POINTS_PER_PIP;
            out_events.push(Event::PipEaten {
                cell: *cell,
                points: POINTS_PER_PIP,
            });
        }

        // Only the last pip matched in scan order leaves the level.
        if let Some(&cell) = eaten.last() {
            if self.stage.level.remove_food(cell) {
                out_events.push(Event::PipRemoved { cell });
            }
        }
    }

    fn check_level_complete(&mut self, out_events: &mut Vec<Event>) {
        if self.stage.level.has_food() {
            return;
        }

        let cleared = self.level_number;
        self.level_number += 1;
        self.stage = self.fresh_stage();
        info!(level = cleared, score = self.score, "level cleared");
        out_events.push(Event::LevelCleared { level: cleared });
    }
}

#[cfg(test)]
mod tests {
    use pip_maze_core::{Command, CreatureId, Position};

    use crate::{apply, query, LevelError, LevelMap, World, WorldConfig};

    use super::*;

    fn world_from(rows: &[&str], seed: u64) -> World {
        let config = WorldConfig::new(seed).with_map(LevelMap::from_rows(rows.iter().copied()));
        World::new(config).expect("valid level")
    }

    fn steer(world: &mut World, creature: CreatureId, direction: Direction) {
        let mut events = Vec::new();
        apply(
            world,
            Command::SetDirection {
                creature,
                direction,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::DirectionChanged {
                creature,
                direction,
            }]
        );
    }

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick, &mut events);
        events
    }

    const CORRIDOR: [&str; 3] = ["XXXXX", "XP  X", "XXXXX"];
    const RED: CreatureId = CreatureId::new(1);

    #[test]
    fn eating_a_single_pip_scores_ten() {
        let mut world = world_from(&CORRIDOR, 7);
        steer(&mut world, CreatureId::PLAYER, Direction::Right);

        let first = tick(&mut world);
        assert_eq!(first, vec![Event::TickAdvanced { tick: 1 }]);

        let second = tick(&mut world);
        let cell = GridCell::new(1, 2);
        assert_eq!(
            second,
            vec![
                Event::TickAdvanced { tick: 2 },
                Event::PipEaten { cell, points: 10 },
                Event::PipRemoved { cell },
            ]
        );
        assert_eq!(query::score(&world), 10);
        assert_eq!(query::remaining_pips(&world), 1);
        assert!(!query::level(&world).holds_food(cell));
    }

    #[test]
    fn walls_stop_the_player() {
        let mut world = world_from(&CORRIDOR, 7);
        steer(&mut world, CreatureId::PLAYER, Direction::Left);

        let _ = tick(&mut world);
        assert_eq!(query::player(&world).position(), Position::new(32, 32));

        steer(&mut world, CreatureId::PLAYER, Direction::Up);
        let _ = tick(&mut world);
        assert_eq!(query::player(&world).position(), Position::new(32, 32));
    }

    #[test]
    fn player_advances_a_quarter_tile_per_tick() {
        let mut world = world_from(&["XXXXXXXX", "XP     X", "XXXXXXXX"], 7);
        steer(&mut world, CreatureId::PLAYER, Direction::Right);

        for _ in 0..3 {
            let _ = tick(&mut world);
        }

        assert_eq!(query::player(&world).position(), Position::new(56, 32));
        assert_eq!(query::tick_index(&world), 3);
    }

    #[test]
    fn overlapping_two_pips_scores_both_but_removes_the_later_one() {
        let mut world = world_from(&["XXXXX", "X  XX", "XPOXX", "XXXXX"], 7);
        steer(&mut world, CreatureId::PLAYER, Direction::Right);
        let _ = tick(&mut world);
        let _ = tick(&mut world);
        assert_eq!(query::player(&world).position(), Position::new(48, 64));

        steer(&mut world, CreatureId::PLAYER, Direction::Up);
        assert_eq!(tick(&mut world), vec![Event::TickAdvanced { tick: 3 }]);
        let events = tick(&mut world);

        let first = GridCell::new(1, 1);
        let second = GridCell::new(1, 2);
        assert_eq!(
            events,
            vec![
                Event::TickAdvanced { tick: 4 },
                Event::PipEaten {
                    cell: first,
                    points: 10,
                },
                Event::PipEaten {
                    cell: second,
                    points: 10,
                },
                Event::PipRemoved { cell: second },
            ]
        );
        assert_eq!(query::score(&world), 20);
        assert!(query::level(&world).holds_food(first));
        assert!(!query::level(&world).holds_food(second));
    }

    #[test]
    fn clearing_a_level_keeps_score_and_lives() {
        let mut world = world_from(&CORRIDOR, 7);
        steer(&mut world, CreatureId::PLAYER, Direction::Right);

        let mut events = Vec::new();
        for _ in 0..6 {
            events.extend(tick(&mut world));
        }

        assert!(events.contains(&Event::LevelCleared { level: 1 }));
        assert_eq!(query::level_number(&world), 2);
        assert_eq!(query::score(&world), 20);
        assert_eq!(query::lives(&world), 3);
        assert_eq!(query::remaining_pips(&world), 2);
        assert_eq!(query::player(&world).position(), Position::new(32, 32));
        assert_eq!(query::player(&world).velocity(), (0, 0));
    }

    #[test]
    fn caught_player_loses_a_life_and_everyone_resets() {
        let mut world = world_from(&["XXXXXX", "XPr  X", "XXXXXX"], 11);
        steer(&mut world, RED, Direction::Left);

        let events = tick(&mut world);

        assert_eq!(
            events,
            vec![
                Event::TickAdvanced { tick: 1 },
                Event::LifeLost { lives_remaining: 2 },
            ]
        );
        assert_eq!(query::lives(&world), 2);
        assert!(!query::is_game_over(&world));
        let player = query::player(&world);
        assert_eq!(player.position(), Position::new(32, 32));
        assert_eq!(player.direction(), Direction::Up);
        assert_eq!(player.velocity(), (0, -8));
        assert_eq!(query::adversaries(&world)[0].position(), Position::new(64, 32));
    }

    #[test]
    fn losing_the_last_life_ends_the_game_without_resetting() {
        let mut world = world_from(&["XXXXXX", "XPr  X", "XXXXXX"], 11);

        for _ in 0..2 {
            steer(&mut world, RED, Direction::Left);
            let _ = tick(&mut world);
        }
        assert_eq!(query::lives(&world), 1);

        steer(&mut world, RED, Direction::Left);
        let events = tick(&mut world);

        assert_eq!(
            events,
            vec![
                Event::TickAdvanced { tick: 3 },
                Event::LifeLost { lives_remaining: 0 },
                Event::GameOver { final_score: 0 },
            ]
        );
        assert!(query::is_game_over(&world));
        assert_eq!(query::adversaries(&world)[0].position(), Position::new(56, 32));

        assert!(tick(&mut world).is_empty());
        assert_eq!(query::tick_index(&world), 3);
        assert_eq!(query::adversaries(&world)[0].position(), Position::new(56, 32));
    }

    #[test]
    fn paused_worlds_ignore_ticks() {
        let mut world = world_from(&CORRIDOR, 7);
        steer(&mut world, CreatureId::PLAYER, Direction::Right);

        let mut events = Vec::new();
        apply(&mut world, Command::TogglePause, &mut events);
        assert_eq!(events, vec![Event::PauseToggled { paused: true }]);

        assert!(tick(&mut world).is_empty());
        assert_eq!(query::player(&world).position(), Position::new(32, 32));
        assert_eq!(query::tick_index(&world), 0);

        events.clear();
        apply(&mut world, Command::TogglePause, &mut events);
        assert_eq!(events, vec![Event::PauseToggled { paused: false }]);
        let _ = tick(&mut world);
        assert_eq!(query::player(&world).position(), Position::new(40, 32));
    }

    #[test]
    fn sideways_adversaries_in_the_tunnel_row_turn_up() {
        let rows = [
            "XXXXX", "XP  X", "X   X", "X   X", "X   X", "X   X", "X   X", "X   X", "X   X",
            "X r X", "XXXXX",
        ];
        let mut world = world_from(&rows, 3);
        steer(&mut world, RED, Direction::Left);

        let _ = tick(&mut world);

        let red = &query::adversaries(&world)[0];
        assert_eq!(red.direction(), Direction::Up);
        assert_eq!(red.position(), Position::new(64, 280));
    }

    #[test]
    fn adversaries_bounce_off_walls() {
        let mut world = world_from(&["XXXXXX", "XP  rX", "XXXXXX"], 5);
        steer(&mut world, RED, Direction::Right);

        let _ = tick(&mut world);

        assert_eq!(query::adversaries(&world)[0].position(), Position::new(128, 32));
    }

    #[test]
    fn adversaries_bounce_off_the_board_edge() {
        let mut world = world_from(&["XXXXXX", "Or XPX", "XXXXXX"], 5);
        steer(&mut world, RED, Direction::Left);

        for _ in 0..3 {
            let _ = tick(&mut world);
        }
        assert_eq!(query::adversaries(&world)[0].x(), 8);

        let _ = tick(&mut world);
        assert_eq!(query::adversaries(&world)[0].x(), 8);
    }

    #[test]
    fn adversaries_bounce_off_the_far_board_edge() {
        let mut world = world_from(&["XXXXXX", "XPXb O", "XXXXXX"], 5);
        steer(&mut world, RED, Direction::Right);
        let level = query::level(&world);
        let step = query::adversaries(&world)[0].speed();
        let stop = level.board_width() - level.tile_size() - step;

        for _ in 0..7 {
            let _ = tick(&mut world);
        }
        assert_eq!(query::adversaries(&world)[0].x(), stop);

        let _ = tick(&mut world);
        let blue = &query::adversaries(&world)[0];
        assert_eq!(blue.x(), stop);
        let (dx, dy) = blue.direction().unit();
        assert_eq!(blue.velocity(), (dx * step, dy * step));

        for _ in 0..20 {
            let _ = tick(&mut world);
            assert!(query::adversaries(&world)[0].x() <= stop);
        }
    }

    #[test]
    fn restart_returns_to_a_fresh_game() {
        let mut world = world_from(&CORRIDOR, 7);
        steer(&mut world, CreatureId::PLAYER, Direction::Right);
        for _ in 0..3 {
            let _ = tick(&mut world);
        }
        let mut events = Vec::new();
        apply(&mut world, Command::TogglePause, &mut events);

        events.clear();
        apply(&mut world, Command::Restart, &mut events);

        assert_eq!(events, vec![Event::GameRestarted]);
        assert_eq!(query::score(&world), 0);
        assert_eq!(query::lives(&world), 3);
        assert_eq!(query::level_number(&world), 1);
        assert_eq!(query::tick_index(&world), 0);
        assert_eq!(query::remaining_pips(&world), 2);
        assert!(!query::is_paused(&world));
        assert!(!query::is_game_over(&world));
        assert_eq!(query::player(&world).position(), Position::new(32, 32));
    }

    #[test]
    fn unknown_creatures_reject_direction_changes() {
        let mut world = world_from(&CORRIDOR, 7);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetDirection {
                creature: CreatureId::new(9),
                direction: Direction::Down,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::DirectionRejected {
                creature: CreatureId::new(9),
            }]
        );
    }

    #[test]
    fn maps_without_exactly_one_player_are_rejected() {
        let missing = WorldConfig::new(1).with_map(LevelMap::from_rows(["XXX", "X X", "XXX"]));
        assert_eq!(World::new(missing).err(), Some(LevelError::MissingPlayer));

        let duplicate = WorldConfig::new(1).with_map(LevelMap::from_rows(["XXXX", "XPPX", "XXXX"]));
        assert_eq!(
            World::new(duplicate).err(),
            Some(LevelError::DuplicatePlayer { row: 1, column: 2 })
        );
    }

    #[test]
    fn oversized_tiles_are_rejected() {
        let config = WorldConfig::new(1).with_tile_size(i32::MAX);
        assert!(matches!(
            World::new(config).err(),
            Some(LevelError::BoardTooLarge { .. })
        ));
    }

    #[test]
    fn equal_seeds_replay_identically() {
        let run = |seed: u64| {
            let mut world = World::new(WorldConfig::new(seed)).expect("canonical level");
            let mut events = Vec::new();
            for step in 0..400_u32 {
                if step % 37 == 0 {
                    let direction = Direction::ALL[(step / 37) as usize % 4];
                    apply(
                        &mut world,
                        Command::SetDirection {
                            creature: CreatureId::PLAYER,
                            direction,
                        },
                        &mut events,
                    );
                }
                apply(&mut world, Command::Tick, &mut events);
            }
            (events, query::creature_view(&world).into_vec())
        };

        assert_eq!(run(42), run(42));
    }
}
