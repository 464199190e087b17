#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Pip Maze.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{get_last_key_pressed, is_key_pressed, KeyCode};
use pip_maze_core::Direction;
use pip_maze_rendering::{
    palette, Color, CreaturePresentation, FrameInput, HudPresentation, Presentation,
    RenderingBackend, Scene,
};
use std::time::Duration;
use tracing::debug;

const HUD_FONT_SIZE: f32 = 18.0;
const BANNER_FONT_SIZE: f32 = 48.0;

/// Snapshot of the keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyObservations {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    pause: bool,
    any: bool,
    quit: bool,
}

impl KeyObservations {
    fn poll() -> Self {
        let pressed = |keys: &[KeyCode]| keys.iter().any(|key| is_key_pressed(*key));

        Self {
            up: pressed(&[KeyCode::Up, KeyCode::W]),
            down: pressed(&[KeyCode::Down, KeyCode::S]),
            left: pressed(&[KeyCode::Left, KeyCode::A]),
            right: pressed(&[KeyCode::Right, KeyCode::D]),
            pause: pressed(&[KeyCode::Space]),
            any: get_last_key_pressed().is_some(),
            quit: pressed(&[KeyCode::Escape, KeyCode::Q]),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.board.width().ceil() as i32,
            window_height: scene.board.height().ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keys = KeyObservations::poll();
                if keys.quit {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, gather_frame_input(keys), &mut scene);

                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_walls(&scene, &metrics);
                draw_pips(&scene, &metrics);
                draw_creatures(&scene.creatures, &metrics);
                draw_hud(&scene.hud, &metrics);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        debug!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    tile_step: f32,
    board_width_scaled: f32,
    board_height_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let board = scene.board;
        let world_width = board.width();
        let world_height = board.height();
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        let board_width_scaled = world_width * scale;
        let board_height_scaled = world_height * scale;

        Self {
            scale,
            offset_x: ((screen_width - board_width_scaled) * 0.5).max(0.0),
            offset_y: ((screen_height - board_height_scaled) * 0.5).max(0.0),
            tile_step: board.tile_length * scale,
            board_width_scaled,
            board_height_scaled,
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }

    fn center(&self) -> Vec2 {
        Vec2::new(
            self.offset_x + self.board_width_scaled * 0.5,
            self.offset_y + self.board_height_scaled * 0.5,
        )
    }
}

fn gather_frame_input(keys: KeyObservations) -> FrameInput {
    let direction = if keys.up {
        Some(Direction::Up)
    } else if keys.down {
        Some(Direction::Down)
    } else if keys.left {
        Some(Direction::Left)
    } else if keys.right {
        Some(Direction::Right)
    } else {
        None
    };

    FrameInput {
        direction,
        pause_pressed: keys.pause,
        any_key_pressed: keys.any || direction.is_some() || keys.pause,
    }
}

fn draw_walls(scene: &Scene, metrics: &SceneMetrics) {
    let color = to_macroquad_color(palette::WALL);
    for wall in &scene.walls {
        let origin = metrics.to_screen(*wall);
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            metrics.tile_step,
            metrics.tile_step,
            color,
        );
    }
}

fn draw_pips(scene: &Scene, metrics: &SceneMetrics) {
    let color = to_macroquad_color(palette::PIP);
    let side = scene.board.pip_length() * metrics.scale;
    for pip in &scene.pips {
        let origin = metrics.to_screen(*pip);
        macroquad::shapes::draw_rectangle(origin.x, origin.y, side, side, color);
    }
}

fn draw_creatures(creatures: &[CreaturePresentation], metrics: &SceneMetrics) {
    for creature in creatures {
        if creature.kind.is_adversary() {
            draw_ghost(creature, metrics);
        } else {
            draw_player(creature, metrics);
        }
    }
}

fn draw_player(creature: &CreaturePresentation, metrics: &SceneMetrics) {
    let tile_length = metrics.tile_step / metrics.scale;
    let center = metrics.to_screen(creature.center(tile_length));
    let marker = metrics.to_screen(creature.facing_marker(tile_length));
    let radius = metrics.tile_step * 0.45;

    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        radius,
        to_macroquad_color(creature.color()),
    );
    macroquad::shapes::draw_circle(
        marker.x,
        marker.y,
        radius * 0.3,
        to_macroquad_color(palette::BACKGROUND),
    );
}

fn draw_ghost(creature: &CreaturePresentation, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(creature.origin);
    let step = metrics.tile_step;
    let color = to_macroquad_color(creature.color());
    let radius = step * 0.45;

    macroquad::shapes::draw_circle(origin.x + step * 0.5, origin.y + step * 0.5, radius, color);
    macroquad::shapes::draw_rectangle(
        origin.x + step * 0.05,
        origin.y + step * 0.5,
        step * 0.9,
        step * 0.45,
        color,
    );
}

fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    let text = to_macroquad_color(palette::TEXT);
    let font_size = HUD_FONT_SIZE * metrics.scale.max(0.5);
    let left = metrics.offset_x + metrics.tile_step * 0.5;
    let top = metrics.offset_y + metrics.tile_step * 0.5 + font_size * 0.5;

    let _ = macroquad::text::draw_text(&hud.status_line(), left, top, font_size, text);

    let detail = hud.detail_line();
    let detail_width = text_width(&detail, font_size);
    let _ = macroquad::text::draw_text(
        &detail,
        metrics.offset_x + metrics.board_width_scaled - detail_width - metrics.tile_step * 0.5,
        top,
        font_size,
        text,
    );

    if let Some(banner) = hud.banner() {
        let banner_size = BANNER_FONT_SIZE * metrics.scale.max(0.5);
        let center = metrics.center();
        let width = text_width(banner, banner_size);
        macroquad::shapes::draw_rectangle(
            metrics.offset_x,
            center.y - banner_size,
            metrics.board_width_scaled,
            banner_size * 1.5,
            to_macroquad_color(palette::BACKGROUND.with_alpha(0.7)),
        );
        let _ = macroquad::text::draw_text(
            banner,
            center.x - width * 0.5,
            center.y,
            banner_size,
            text,
        );
    }
}

fn text_width(text: &str, font_size: f32) -> f32 {
    let size = font_size.round().clamp(1.0, f32::from(u16::MAX)) as u16;
    macroquad::text::measure_text(text, None, size, 1.0).width
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
