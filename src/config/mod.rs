//! Configuration module for Overlay-Bridge
//!
//! Provides configuration loading, validation, and default settings
//! for the overlay probe.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults, DEFAULT_CONFIG_FILE};
pub use loader::{load_config, ConfigLoader};
pub use validator::{validate_config, ConfigValidator};

// Re-export the configuration structures
pub use loader::{
    Config, FontFamily, LoggingConfig, OverlayConfig, ProbeConfig, SessionConfig, TargetConfig,
};

// Configuration-related error type
pub use loader::ConfigError;
