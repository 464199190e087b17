//! Settings resolved from an optional TOML file and command-line overrides.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use pip_maze_core::{DEFAULT_TICK_INTERVAL, DEFAULT_TILE_SIZE};
use pip_maze_world::{LevelMap, WorldConfig};
use serde::Deserialize;

/// Contents of a configuration file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    tile_size: Option<i32>,
    tick_interval_ms: Option<u64>,
    seed: Option<u64>,
    map: Option<Vec<String>>,
}

/// Values supplied on the command line, which win over the file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) tick_ms: Option<u64>,
}

/// Fully resolved settings used to boot the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) world: WorldConfig,
    pub(crate) tick_interval: Duration,
}

/// Reads and parses the configuration file at `path`.
pub(crate) fn load_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse_file(&contents)
        .with_context(|| format!("invalid configuration at {}", path.display()))
}

pub(crate) fn parse_file(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("failed to parse configuration toml contents")
}

impl Settings {
    /// Merges file values, command-line overrides and defaults.
    ///
    /// `draw_seed` is only invoked when neither source provides a seed.
    pub(crate) fn resolve<S>(file: FileConfig, overrides: Overrides, draw_seed: S) -> Result<Self>
    where
        S: FnOnce() -> u64,
    {
        let tile_size = file.tile_size.unwrap_or(DEFAULT_TILE_SIZE);
        if tile_size <= 0 {
            bail!("tile_size must be positive (received {tile_size})");
        }

        let tick_interval = overrides
            .tick_ms
            .or(file.tick_interval_ms)
            .map_or(DEFAULT_TICK_INTERVAL, Duration::from_millis);
        if tick_interval.is_zero() {
            bail!("tick interval must be at least one millisecond");
        }

        let seed = overrides.seed.or(file.seed).unwrap_or_else(draw_seed);
        let map = file.map.map_or_else(LevelMap::canonical, LevelMap::from_rows);

        Ok(Self {
            world: WorldConfig::new(seed)
                .with_map(map)
                .with_tile_size(tile_size),
            tick_interval,
        })
    }
}
