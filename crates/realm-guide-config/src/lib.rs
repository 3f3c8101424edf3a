//! Configuration for the realm-guide tutorial engine
//!
//! Settings are read from a TOML file with three sections:
//!
//! ```toml
//! [drag]
//! dampening = 0.001
//! snap_radius = 0.3
//! break_factor = 2.0
//!
//! [tutorial]
//! hero = "TestAnimation"
//! auto_advance = false
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable that points at a config file
pub const CONFIG_ENV_VAR: &str = "REALM_GUIDE_CONFIG";

/// File name looked up inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Drag and snap tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Pointer units to world meters
    pub dampening: f32,
    /// Default acquire radius for snap targets that don't declare one
    pub snap_radius: f32,
    /// Break radius as a multiple of the snap radius
    pub break_factor: f32,
    /// Padding added to every trigger volume edge
    pub trigger_padding: f32,
    /// Derive collision begin/end from trigger volumes after each move
    pub collision_snapping: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            dampening: 0.001,
            snap_radius: 0.3,
            break_factor: 2.0,
            trigger_padding: 0.2,
            collision_snapping: false,
        }
    }
}

impl DragConfig {
    /// Break radius for a target acquired at `snap_radius`
    pub fn break_radius(&self, snap_radius: f32) -> f32 {
        snap_radius * self.break_factor
    }
}

/// Tutorial wiring: which scene entities play which role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialConfig {
    /// The draggable story token whose snaps satisfy placement gates
    pub hero: String,
    /// Tapping this hotspot toggles speech capture
    pub microphone_hotspot: String,
    /// Advance automatically as soon as a gate is satisfied
    pub auto_advance: bool,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            hero: "TestAnimation".to_string(),
            microphone_hotspot: "MicrophoneInteractive".to_string(),
            auto_advance: false,
        }
    }
}

/// Logging settings consumed by the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Log file (the terminal front-end owns stdout)
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("realm-guide.log"),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub drag: DragConfig,
    pub tutorial: TutorialConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config to use.
    ///
    /// Lookup order: explicit path, `REALM_GUIDE_CONFIG`, the platform config
    /// directory, then built-in defaults. Only an explicit or env-provided
    /// path is required to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Reject values that would make the engine misbehave
    pub fn validate(&self) -> Result<()> {
        if !(self.drag.dampening > 0.0) {
            return Err(ConfigError::Invalid {
                field: "drag.dampening",
                reason: format!("must be positive, got {}", self.drag.dampening),
            });
        }
        if !(self.drag.snap_radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "drag.snap_radius",
                reason: format!("must be positive, got {}", self.drag.snap_radius),
            });
        }
        if !(self.drag.break_factor >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "drag.break_factor",
                reason: format!("must be at least 1.0, got {}", self.drag.break_factor),
            });
        }
        if self.drag.trigger_padding < 0.0 {
            return Err(ConfigError::Invalid {
                field: "drag.trigger_padding",
                reason: format!("must not be negative, got {}", self.drag.trigger_padding),
            });
        }
        if self.tutorial.hero.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "tutorial.hero",
                reason: "must name an entity".to_string(),
            });
        }
        Ok(())
    }
}

/// Platform config file location (e.g. `~/.config/realm-guide/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "realm-guide").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.drag.snap_radius, 0.3);
        assert_eq!(config.tutorial.hero, "TestAnimation");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [drag]
            snap_radius = 0.25

            [tutorial]
            auto_advance = true
            "#,
        )
        .unwrap();

        assert_eq!(config.drag.snap_radius, 0.25);
        assert_eq!(config.drag.dampening, 0.001);
        assert!(config.tutorial.auto_advance);
        assert_eq!(config.tutorial.microphone_hotspot, "MicrophoneInteractive");
    }

    #[test]
    fn test_break_radius() {
        let drag = DragConfig::default();
        assert!((drag.break_radius(0.3) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = AppConfig::from_toml_str("[drag]\nsnap_radius = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "drag.snap_radius",
                ..
            }
        ));

        let err = AppConfig::from_toml_str("[drag]\nbreak_factor = 0.5").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "drag.break_factor",
                ..
            }
        ));

        let err = AppConfig::from_toml_str("[tutorial]\nhero = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tutorial.hero", .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = AppConfig::from_toml_str("[drag\nsnap_radius = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = AppConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
