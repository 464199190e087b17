#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Pip Maze experience.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use pip_maze_core::WINDOW_TITLE;
use pip_maze_rendering::{palette, Presentation, RenderingBackend, Scene};
use pip_maze_rendering_macroquad::MacroquadBackend;
use pip_maze_system_controls::PlayerInput;
use pip_maze_system_ticker::{Config as TickerConfig, DEFAULT_MAX_TICKS_PER_FRAME};
use pip_maze_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{FileConfig, Overrides, Settings},
    simulation::Simulation,
};

#[derive(Debug, Parser)]
#[command(name = "pip-maze")]
#[command(version, about = "Maze chase: eat every pip before the ghosts catch you")]
struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for the ghosts' random source; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between two simulation ticks
    #[arg(long = "tick-ms", value_name = "MILLIS")]
    tick_ms: Option<u64>,

    /// Run this many ticks without a window and print a summary
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long)]
    vsync: bool,

    /// Log the frame rate once per second at debug level
    #[arg(long)]
    show_fps: bool,

    /// Log filter directive; falls back to RUST_LOG, then to `info`
    #[arg(long = "log-level", value_name = "FILTER")]
    log_level: Option<String>,
}

/// Entry point for the Pip Maze command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_level.as_deref())?;

    let file = match &args.config {
        Some(path) => config::load_file(path)?,
        None => FileConfig::default(),
    };
    let overrides = Overrides {
        seed: args.seed,
        tick_ms: args.tick_ms,
    };
    let settings = Settings::resolve(file, overrides, rand::random::<u64>)?;
    info!(
        seed = settings.world.seed,
        tick_ms = u64::try_from(settings.tick_interval.as_millis()).unwrap_or(u64::MAX),
        "starting pip maze"
    );

    let world = World::new(settings.world).context("failed to build the level")?;
    let ticker = TickerConfig::new(settings.tick_interval, DEFAULT_MAX_TICKS_PER_FRAME);
    let mut simulation = Simulation::new(world, ticker);

    if let Some(ticks) = args.headless {
        simulation.run_ticks(ticks);
        println!("{}", simulation.summary());
        return Ok(());
    }

    let mut scene = Scene::empty(simulation.board()?);
    simulation.populate_scene(&mut scene);
    let presentation = Presentation::new(WINDOW_TITLE, palette::BACKGROUND, scene);

    MacroquadBackend::new()
        .with_swap_interval(args.vsync.then_some(1))
        .with_show_fps(args.show_fps)
        .run(presentation, move |frame_time, input, scene| {
            let input = PlayerInput::new(
                input.direction,
                input.pause_pressed,
                input.any_key_pressed,
            );
            simulation.step(frame_time, input);
            simulation.populate_scene(scene);
        })
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install the log subscriber: {error}"))
}
