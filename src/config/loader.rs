//! Configuration loader for Overlay-Bridge
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::{default_config, DEFAULT_CONFIG_FILE};
use crate::core::types::Address;
use crate::overlay::{BridgeOptions, Color, OverlayFlags};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_target")]
    pub target: TargetConfig,

    #[serde(default = "default_session")]
    pub session: SessionConfig,

    #[serde(default = "default_overlay")]
    pub overlay: OverlayConfig,

    #[serde(default = "default_probe")]
    pub probe: ProbeConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Which process to attach to and which backend to draw with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_process_name")]
    pub process_name: String,
    #[serde(default = "default_backend_library")]
    pub backend_library: String,
}

/// Options local to the attach session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_fast_write")]
    pub fast_write: bool,
}

/// Font families the overlay backend can switch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Calibri,
    Arial,
    Courier,
    Gabriola,
    Impact,
}

impl FontFamily {
    pub fn flag(&self) -> OverlayFlags {
        match self {
            FontFamily::Calibri => OverlayFlags::FONT_CALIBRI,
            FontFamily::Arial => OverlayFlags::FONT_ARIAL,
            FontFamily::Courier => OverlayFlags::FONT_COURIER,
            FontFamily::Gabriola => OverlayFlags::FONT_GABRIOLA,
            FontFamily::Impact => OverlayFlags::FONT_IMPACT,
        }
    }
}

/// Options forwarded to the overlay backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_require_foreground")]
    pub require_foreground: bool,
    #[serde(default = "default_draw_fps")]
    pub draw_fps: bool,
    #[serde(default = "default_vsync")]
    pub vsync: bool,
    #[serde(default)]
    pub font: Option<FontFamily>,
}

impl OverlayConfig {
    /// Backend flag mask for these settings
    pub fn flags(&self) -> OverlayFlags {
        let mut flags = OverlayFlags::NONE;
        if self.require_foreground {
            flags |= OverlayFlags::REQUIRE_FOREGROUND;
        }
        if self.draw_fps {
            flags |= OverlayFlags::DRAW_FPS;
        }
        if self.vsync {
            flags |= OverlayFlags::VSYNC;
        }
        if let Some(font) = self.font {
            flags |= font.flag();
        }
        flags
    }
}

/// What the probe binary reads and draws each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Address of the view-projection matrix
    #[serde(default)]
    pub view_matrix: Option<Address>,
    /// Addresses of world-space positions to mark
    #[serde(default)]
    pub points: Vec<Address>,
    #[serde(default = "default_probe_color")]
    pub color: Color,
    #[serde(default = "default_probe_radius")]
    pub radius: f32,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Config {
    /// Options to hand to the frame bridge
    pub fn bridge_options(&self) -> BridgeOptions {
        BridgeOptions {
            fast_write: self.session.fast_write,
            overlay: self.overlay.flags(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is
    /// missing; a malformed file is still an error
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default()
}

// Default functions for serde
fn default_target() -> TargetConfig {
    let defaults = default_config();
    TargetConfig {
        process_name: defaults.target.process_name,
        backend_library: defaults.target.backend_library,
    }
}

fn default_session() -> SessionConfig {
    SessionConfig {
        fast_write: default_fast_write(),
    }
}

fn default_overlay() -> OverlayConfig {
    let defaults = default_config();
    OverlayConfig {
        require_foreground: defaults.overlay.require_foreground,
        draw_fps: defaults.overlay.draw_fps,
        vsync: defaults.overlay.vsync,
        font: None,
    }
}

fn default_probe() -> ProbeConfig {
    ProbeConfig {
        view_matrix: None,
        points: Vec::new(),
        color: default_probe_color(),
        radius: default_probe_radius(),
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
    }
}

// Individual field defaults
fn default_process_name() -> String {
    default_config().target.process_name
}

fn default_backend_library() -> String {
    default_config().target.backend_library
}

fn default_fast_write() -> bool {
    default_config().session.fast_write
}

fn default_require_foreground() -> bool {
    default_config().overlay.require_foreground
}

fn default_draw_fps() -> bool {
    default_config().overlay.draw_fps
}

fn default_vsync() -> bool {
    default_config().overlay.vsync
}

fn default_probe_color() -> Color {
    default_config().probe.color
}

fn default_probe_radius() -> f32 {
    default_config().probe.radius
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target: default_target(),
            session: default_session(),
            overlay: default_overlay(),
            probe: default_probe(),
            logging: default_logging(),
        }
    }
}
