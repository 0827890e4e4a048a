//! Configuration validator for Overlay-Bridge
//!
//! Validates configuration values to ensure they are usable before attaching.

use super::loader::{Config, ConfigError, LoggingConfig, ProbeConfig, TargetConfig};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_target(&config.target)?;
        Self::validate_probe(&config.probe)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_target(target: &TargetConfig) -> Result<(), ConfigError> {
        if target.process_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Target process name cannot be empty".to_string(),
            ));
        }

        if target.backend_library.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Backend library path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_probe(probe: &ProbeConfig) -> Result<(), ConfigError> {
        if !probe.radius.is_finite() || probe.radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Probe radius must be a positive number, got {}",
                probe.radius
            )));
        }

        if probe.view_matrix.map_or(false, |a| a.is_null()) {
            return Err(ConfigError::Invalid(
                "View matrix address cannot be null".to_string(),
            ));
        }

        if let Some(null) = probe.points.iter().position(|a| a.is_null()) {
            return Err(ConfigError::Invalid(format!(
                "Probe point {} has a null address",
                null
            )));
        }

        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
