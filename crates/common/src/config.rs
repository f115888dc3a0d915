//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{EyeframeError, EyeframeResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults applied to cameras that don't override them.
    pub camera: CameraDefaults,

    /// Default simulation settings for the CLI.
    pub simulation: SimulationDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default camera parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDefaults {
    /// Space added to the action rect on all sides.
    pub padding: f64,

    /// Camera limits as `[x, y, width, height]`.
    pub limits: [f64; 4],

    /// Initial orthographic half-height.
    pub zoom: f64,

    /// Viewport width / height.
    pub aspect: f64,
}

/// Default simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationDefaults {
    /// Simulated frames per second.
    pub fps: u32,

    /// Number of frames to simulate.
    pub frames: u32,

    /// Seed for shake jitter.
    pub seed: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "eyeframe=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            padding: 12.0,
            limits: [-500.0, -500.0, 1000.0, 1000.0],
            zoom: 5.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            fps: 60,
            frames: 120,
            seed: 0x5eed,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path. Values that would produce a
    /// broken camera or clock are rejected.
    pub fn load_from(path: &Path) -> EyeframeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> EyeframeResult<()> {
        let camera = &self.camera;
        if !camera.padding.is_finite() || camera.padding < 0.0 {
            return Err(EyeframeError::config(format!(
                "camera.padding must be a non-negative number, got {}",
                camera.padding
            )));
        }
        if !camera.zoom.is_finite() || camera.zoom <= 0.0 {
            return Err(EyeframeError::config(format!(
                "camera.zoom must be positive, got {}",
                camera.zoom
            )));
        }
        if !camera.aspect.is_finite() || camera.aspect <= 0.0 {
            return Err(EyeframeError::config(format!(
                "camera.aspect must be positive, got {}",
                camera.aspect
            )));
        }
        if camera.limits.iter().any(|v| !v.is_finite()) {
            return Err(EyeframeError::config(format!(
                "camera.limits must be finite, got {:?}",
                camera.limits
            )));
        }
        if self.simulation.fps == 0 {
            return Err(EyeframeError::config("simulation.fps must be positive"));
        }
        Ok(())
    }

    /// Save config to the standard location and return the path written.
    pub fn save(&self) -> EyeframeResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> EyeframeResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("eyeframe").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"camera": {"padding": 4.0}}"#).unwrap();
        assert_eq!(config.camera.padding, 4.0);
        assert_eq!(config.camera.zoom, 5.0);
        assert_eq!(config.simulation.fps, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = AppConfig::load_from(Path::new("/nonexistent/eyeframe/config.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let mut config = AppConfig::default();
        config.simulation.fps = 0;
        assert!(matches!(config.validate(), Err(EyeframeError::Config { .. })));

        let mut config = AppConfig::default();
        config.camera.zoom = -1.0;
        assert!(matches!(config.validate(), Err(EyeframeError::Config { .. })));

        let mut config = AppConfig::default();
        config.camera.aspect = f64::NAN;
        assert!(matches!(config.validate(), Err(EyeframeError::Config { .. })));

        let mut config = AppConfig::default();
        config.camera.padding = -2.0;
        assert!(matches!(config.validate(), Err(EyeframeError::Config { .. })));

        let mut config = AppConfig::default();
        config.camera.limits[2] = f64::INFINITY;
        assert!(matches!(config.validate(), Err(EyeframeError::Config { .. })));

        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_save_then_load_and_reject_bad_file() {
        let dir = std::env::temp_dir().join(format!("eyeframe-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.camera.padding = 3.5;
        config.simulation.frames = 42;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.camera.padding, 3.5);
        assert_eq!(loaded.simulation.frames, 42);

        std::fs::write(&path, r#"{"simulation": {"fps": 0}}"#).unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, EyeframeError::Config { .. }));
        assert!(err.to_string().contains("simulation.fps"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
