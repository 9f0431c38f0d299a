//! Configuration structs with defaults and TOML persistence.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use nightsky_core::{AnimationSpeed, FieldPreset};
use nightsky_field::FieldConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Preset and playback settings.
    pub animation: AnimationConfig,
    /// Log destination and filter.
    pub logging: LoggingConfig,
    /// Custom layer set; replaces the preset when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldConfig>,
}

/// Preset selection and playback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub preset: FieldPreset,
    /// Frame-rate cap (0 = uncapped).
    pub target_fps: u32,
    pub speed: AnimationSpeed,
    /// Force lightning on or off regardless of the preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lightning: Option<bool>,
    /// Fixed random seed for reproducible fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `nightsky_field=debug`. `RUST_LOG` wins.
    pub level: String,
    /// Log file; logging is off when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            preset: FieldPreset::default(),
            target_fps: 60,
            speed: AnimationSpeed::default(),
            lightning: None,
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    /// Platform configuration directory, e.g. `~/.config/nightsky`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        ProjectDirs::from("", "", "nightsky")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Field parameters after applying the animation settings.
    pub fn field_config(&self) -> FieldConfig {
        let mut field = self
            .field
            .clone()
            .unwrap_or_else(|| FieldConfig::preset(self.animation.preset));
        field.target_fps = self.animation.target_fps;
        field.speed_multiplier *= self.animation.speed.multiplier();
        if let Some(enabled) = self.animation.lightning {
            field.lightning.enabled = enabled;
        }
        field
    }

    /// Switch to a built-in preset, dropping any custom `[field]` table.
    pub fn select_preset(&mut self, preset: FieldPreset) {
        self.animation.preset = preset;
        self.field = None;
    }

    /// Check that the effective field configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field_config().validate()?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            config.validate()?;
            tracing::info!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            tracing::info!(path = %config_path.display(), "created default config");
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.toml`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let serialized = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(config_dir.join(CONFIG_FILE), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        new_config.validate()?;

        if &new_config != self {
            tracing::info!("config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        toml::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use nightsky_core::Rgba;

    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[animation]"));
        assert!(toml_str.contains("preset = \"hero\""));
        assert!(toml_str.contains("target_fps = 60"));
        assert!(!toml_str.contains("[field]"));
    }

    #[test]
    fn test_config_roundtrip_with_custom_field() {
        let mut config = Config::default();
        let mut field = FieldConfig::preset(FieldPreset::Cosmic);
        field.background = Rgba::rgb(1, 2, 3);
        config.field = Some(field);

        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[animation]\npreset = \"events\"\n").unwrap();
        assert_eq!(config.animation.preset, FieldPreset::Events);
        assert_eq!(config.animation.target_fps, 60);
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(config.field.is_none());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = toml::from_str("future_setting = true\n");
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_toml_produces_error() {
        let result: Result<Config, _> = toml::from_str("[animation\npreset = ");
        assert!(result.is_err());
        let result: Result<Config, _> = toml::from_str("[animation]\npreset = \"galaxy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_field_config_applies_animation_settings() {
        let mut config = Config::default();
        config.animation.target_fps = 30;
        config.animation.speed = AnimationSpeed::Fast;
        config.animation.lightning = Some(false);

        let field = config.field_config();
        assert_eq!(field.target_fps, 30);
        assert_eq!(field.speed_multiplier, AnimationSpeed::Fast.multiplier());
        assert!(!field.lightning.enabled);
        assert_eq!(field.stars, FieldConfig::preset(FieldPreset::Hero).stars);
    }

    #[test]
    fn test_custom_field_replaces_preset() {
        let mut config = Config::default();
        let custom = FieldConfig::preset(FieldPreset::Starfield);
        config.field = Some(custom.clone());
        assert_eq!(config.field_config().stars, custom.stars);

        config.select_preset(FieldPreset::Events);
        assert!(config.field.is_none());
        assert_eq!(
            config.field_config().particles,
            FieldConfig::preset(FieldPreset::Events).particles
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.animation.preset = FieldPreset::Starfield;
        config.animation.seed = Some(7);
        config.logging.file = Some(PathBuf::from("/tmp/nightsky.log"));

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_load_rejects_invalid_field() {
        let dir = tempfile::tempdir().unwrap();
        let toml_str = "[field.lightning]\nmax_depth = 12\n";
        std::fs::write(dir.path().join(CONFIG_FILE), toml_str).unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::InvalidField(_))));
    }

    #[test]
    fn test_load_rejects_overflowing_spread() {
        let dir = tempfile::tempdir().unwrap();
        let toml_str = "[field.lightning]\nenabled = true\nprobability = 1.0\nspread = 1e39\n";
        std::fs::write(dir.path().join(CONFIG_FILE), toml_str).unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::InvalidField(_))));
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.animation.target_fps = 24;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.animation.target_fps), Some(24));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }
}
