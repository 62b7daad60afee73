use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default playfield width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 40;

/// Default playfield height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Default simulation rate.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 10;

/// Default body length at game start.
pub const DEFAULT_INITIAL_LENGTH: usize = 3;

/// Default cells of growth per consumed item.
pub const DEFAULT_GROWTH_PER_ITEM: u32 = 1;

/// Default score reward per consumed item.
pub const DEFAULT_SCORE_PER_ITEM: u32 = 10;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

/// Startup configuration; immutable once a game is built from it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid: GridSize,
    pub ticks_per_second: u32,
    pub initial_length: usize,
    pub growth_per_item: u32,
    pub score_per_item: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            initial_length: DEFAULT_INITIAL_LENGTH,
            growth_per_item: DEFAULT_GROWTH_PER_ITEM,
            score_per_item: DEFAULT_SCORE_PER_ITEM,
        }
    }
}

/// Rejected or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },

    #[error("ticks per second must be greater than zero")]
    ZeroTickRate,

    #[error("initial length must be at least 1")]
    ZeroInitialLength,

    #[error("initial length {length} does not fit a {width}x{height} grid (max {max})")]
    InitialLengthTooLong {
        length: usize,
        width: u16,
        height: u16,
        max: usize,
    },

    #[error("growth per item must be at least 1")]
    ZeroGrowth,

    #[error("failed to read config {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl GameConfig {
    /// Checks every startup constraint the game relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSize { width, height } = self.grid;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }

        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        if self.initial_length == 0 {
            return Err(ConfigError::ZeroInitialLength);
        }

        let max = self.max_initial_length();
        if self.initial_length > max {
            return Err(ConfigError::InitialLengthTooLong {
                length: self.initial_length,
                width,
                height,
                max,
            });
        }

        if self.growth_per_item == 0 {
            return Err(ConfigError::ZeroGrowth);
        }

        Ok(())
    }

    /// Longest starting body: it lies in the centre row, head at the centre
    /// column, and must leave at least one free cell for the first item.
    #[must_use]
    pub fn max_initial_length(&self) -> usize {
        let row_fit = usize::from(self.grid.width / 2) + 1;
        row_fit.min(self.grid.total_cells().saturating_sub(1))
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the per-user config file, or defaults when it does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        match Self::load(&path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}
