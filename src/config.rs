use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::grid::GridSize;

const APP_DIR_NAME: &str = "torus-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default board width in cells.
pub const DEFAULT_BOARD_WIDTH: u16 = 25;

/// Default board height in cells.
pub const DEFAULT_BOARD_HEIGHT: u16 = 25;

/// Default simulation rate in ticks per second.
pub const DEFAULT_FPS: u32 = 5;

/// Body length every round starts with.
pub const DEFAULT_STARTING_LENGTH: usize = 5;

/// Glyph for the food cell.
pub const GLYPH_FOOD: &str = "●";

/// Glyphs for the head, indexed by facing.
pub const GLYPH_HEAD_LEFT: &str = "◀";
pub const GLYPH_HEAD_RIGHT: &str = "▶";
pub const GLYPH_HEAD_UP: &str = "▲";
pub const GLYPH_HEAD_DOWN: &str = "▼";

/// Glyph for interior body segments.
pub const GLYPH_BODY: &str = "■";

/// Glyphs for the tail, pointing at the segment it follows.
pub const GLYPH_TAIL_LEFT: &str = "<";
pub const GLYPH_TAIL_RIGHT: &str = ">";
pub const GLYPH_TAIL_UP: &str = "^";
pub const GLYPH_TAIL_DOWN: &str = "v";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Simulation parameters fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub fps: u32,
    pub starting_length: usize,
    /// Seed for food placement; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            fps: DEFAULT_FPS,
            starting_length: DEFAULT_STARTING_LENGTH,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Returns the board as a `GridSize`.
    #[must_use]
    pub fn board(&self) -> GridSize {
        GridSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Time between two ticks.
    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Checks that a fresh round can always be laid out and fed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.height < 2 {
            return Err(ConfigError::Invalid(format!(
                "board must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".to_owned()));
        }
        if self.starting_length < 2 {
            return Err(ConfigError::Invalid(format!(
                "starting length must be at least 2, got {}",
                self.starting_length
            )));
        }
        if self.starting_length > usize::from(self.width) {
            return Err(ConfigError::Invalid(format!(
                "starting length {} does not fit a board {} cells wide",
                self.starting_length, self.width
            )));
        }
        if self.board().total_cells() <= self.starting_length {
            return Err(ConfigError::Invalid(format!(
                "a {}x{} board leaves no room for food",
                self.width, self.height
            )));
        }

        Ok(())
    }

    /// Overwrites every field that `overrides` sets.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
        if let Some(length) = overrides.starting_length {
            self.starting_length = length;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
    }
}

/// Partial configuration as read from a config file or the command line.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub fps: Option<u32>,
    pub starting_length: Option<usize>,
    pub seed: Option<u64>,
}

/// Returns the platform-correct default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads overrides from the default config file.
///
/// Returns empty overrides when the file does not exist yet.
pub fn load_default_overrides() -> Result<ConfigOverrides, ConfigError> {
    load_overrides_from_path(&config_path(), true)
}

/// Loads overrides from an explicitly named config file, which must exist.
pub fn load_overrides(path: &Path) -> Result<ConfigOverrides, ConfigError> {
    load_overrides_from_path(path, false)
}

fn load_overrides_from_path(path: &Path, missing_ok: bool) -> Result<ConfigOverrides, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if missing_ok && e.kind() == io::ErrorKind::NotFound => {
            return Ok(ConfigOverrides::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
