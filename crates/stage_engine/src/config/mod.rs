//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Window settings for the demo application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Stage Demo".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Camera settings shared by all drawing states
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Splash screen settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashSettings {
    /// How long the splash stays up before handing over, in seconds
    pub hold_seconds: f32,
}

impl Default for SplashSettings {
    fn default() -> Self {
        Self { hold_seconds: 3.0 }
    }
}

/// Top-level configuration for the demo application
///
/// Every section falls back to its default, so a partial file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Window section
    pub window: WindowSettings,
    /// Camera section
    pub camera: CameraSettings,
    /// Splash section
    pub splash: SplashSettings,
}

impl Config for StageConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config: StageConfig = toml::from_str("").unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert_eq!(config.splash.hold_seconds, 3.0);
    }

    #[test]
    fn test_partial_document_overrides_only_named_fields() {
        let config: StageConfig = toml::from_str(
            r#"
            [window]
            width = 640
            height = 360

            [splash]
            hold_seconds = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 360);
        assert_eq!(config.window.title, "Stage Demo");
        assert_eq!(config.splash.hold_seconds, 1.5);
        assert_eq!(config.camera.far, 1000.0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join("stage_engine_config_round_trip.toml");
        let path = path.to_str().unwrap().to_string();

        let mut config = StageConfig::default();
        config.window.title = "Round Trip".to_string();
        config.splash.hold_seconds = 0.25;
        config.save_to_file(&path).unwrap();

        let loaded = StageConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.window.title, "Round Trip");
        assert_eq!(loaded.splash.hold_seconds, 0.25);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let config = StageConfig::default();
        let err = config.save_to_file("settings.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = StageConfig::load_from_file("does_not_exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
