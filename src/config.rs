//! Configuration, read from yaml or json. Every field has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::edges::{EdgeThresholds, DEFAULT_THRESHOLDS};
use crate::error::{Error, Result};
use crate::frame::PixelFormat;

pub const DEFAULT_IMAGE_PATH: &str = "/maixapp/share/icon/detector.png";
pub const DEFAULT_FRAME_DIRECTORY: &str = "edge_show_frames";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Image decoded once at startup.
    pub image: PathBuf,
    /// Edge detector thresholds, in either order.
    pub thresholds: (f32, f32),
    /// Stop after this many frames, runs until ctrl-c if absent.
    pub max_frames: Option<u64>,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            image: PathBuf::from(DEFAULT_IMAGE_PATH),
            thresholds: DEFAULT_THRESHOLDS,
            max_frames: None,
            display: Default::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayConfig {
    ImageSequence {
        directory: PathBuf,
        #[serde(default)]
        format: PixelFormat,
        #[serde(default = "default_overwrite")]
        overwrite: bool,
    },
    Framebuffer {
        path: PathBuf,
        width: u32,
        height: u32,
        #[serde(default)]
        format: PixelFormat,
    },
    Headless {
        #[serde(default)]
        format: PixelFormat,
    },
}

fn default_overwrite() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig::ImageSequence {
            directory: PathBuf::from(DEFAULT_FRAME_DIRECTORY),
            format: PixelFormat::default(),
            overwrite: default_overwrite(),
        }
    }
}

impl Config {
    pub fn edge_thresholds(&self) -> Result<EdgeThresholds> {
        EdgeThresholds::from_pair(self.thresholds.0, self.thresholds.1)
    }
}

/// Parse a config, json if `path` ends in `.json`, yaml otherwise.
pub fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let parsed = if is_json {
        serde_json::from_str(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    };
    let config: Config = parsed.map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })?;
    // Surface bad thresholds at load time instead of on the first frame.
    config.edge_thresholds()?;
    Ok(config)
}

/// Load a config file from disk.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_config(&content, path)
}
