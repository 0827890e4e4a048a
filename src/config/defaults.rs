//! Default configuration values for Overlay-Bridge

use crate::overlay::Color;
use serde::{Deserialize, Serialize};

/// Config file looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "overlay-probe.toml";

/// Default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub target: TargetDefaults,
    pub session: SessionDefaults,
    pub overlay: OverlayDefaults,
    pub probe: ProbeDefaults,
    pub logging: LoggingDefaults,
}

/// Default target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefaults {
    pub process_name: String,
    pub backend_library: String,
}

/// Default session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDefaults {
    pub fast_write: bool,
}

/// Default overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayDefaults {
    pub require_foreground: bool,
    pub draw_fps: bool,
    pub vsync: bool,
}

/// Default probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeDefaults {
    pub color: Color,
    pub radius: f32,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        target: TargetDefaults {
            // no sensible default target; validation requires one
            process_name: String::new(),
            backend_library: "Charm_native.dll".to_string(),
        },
        session: SessionDefaults { fast_write: false },
        overlay: OverlayDefaults {
            require_foreground: true,
            draw_fps: false,
            vsync: true,
        },
        probe: ProbeDefaults {
            color: Color::GREEN,
            radius: 4.0,
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}
