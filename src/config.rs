//! Configuration module.
//!
//! Handles loading and saving application settings from JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Sound configuration for matched letters.
#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Whether sound is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Colors configuration.
#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorsConfig {
    /// Background when the last letter is in the dictionary (hex).
    #[serde(default = "default_color_matched")]
    pub matched: String,
    /// Text color (hex).
    #[serde(default = "default_color_text")]
    pub text: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            matched: "#FF0000".to_string(),
            text: "#000000".to_string(),
        }
    }
}

/// Main application configuration.
#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial window width.
    #[serde(default = "default_width")]
    pub width: i32,
    /// Initial window height.
    #[serde(default = "default_height")]
    pub height: i32,
    /// Directory holding the `.wav` files. Relative to the working directory.
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: String,
    /// Font family.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Font size.
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Text origin, client coordinates.
    #[serde(default = "default_text_offset")]
    pub text_x: i32,
    #[serde(default = "default_text_offset")]
    pub text_y: i32,
    /// Ignore held-key repeats.
    #[serde(default = "default_true")]
    pub ignore_key_repeat: bool,
    /// Colors configuration.
    #[serde(default)]
    pub colors: ColorsConfig,
    /// Sound configuration.
    #[serde(default)]
    pub sound: SoundConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: 500,
            height: 100,
            sounds_dir: "sounds".to_string(),
            font_family: "Arial".to_string(),
            font_size: 32,
            text_x: 5,
            text_y: 5,
            ignore_key_repeat: true,
            colors: ColorsConfig::default(),
            sound: SoundConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolves the sounds directory against `base` unless it is already absolute.
    pub fn sounds_path(&self, base: &Path) -> PathBuf {
        let dir = Path::new(&self.sounds_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            base.join(dir)
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}
fn default_title() -> String {
    "TurkeySpell, by Dad".to_string()
}
fn default_width() -> i32 {
    500
}
fn default_height() -> i32 {
    100
}
fn default_sounds_dir() -> String {
    "sounds".to_string()
}
fn default_font_family() -> String {
    "Arial".to_string()
}
fn default_font_size() -> u32 {
    32
}
fn default_text_offset() -> i32 {
    5
}
fn default_color_matched() -> String {
    "#FF0000".to_string()
}
fn default_color_text() -> String {
    "#000000".to_string()
}

/// Configuration manager.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a configuration manager for `config.json` next to the executable.
    pub fn new() -> Self {
        Self::with_path(Self::get_config_path())
    }

    /// Creates a configuration manager for an explicit file.
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    fn get_config_path() -> PathBuf {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                return exe_dir.join("config.json");
            }
        }
        PathBuf::from("config.json")
    }

    /// Loads configuration from file.
    ///
    /// If the file doesn't exist, creates it with default values.
    pub fn load(&self) -> AppConfig {
        if !self.config_path.exists() {
            let config = AppConfig::default();
            if let Err(e) = self.save(&config) {
                log::warn!(
                    "Failed to write default config to {}: {}",
                    self.config_path.display(),
                    e
                );
            }
            return config;
        }

        match fs::read_to_string(&self.config_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Failed to parse config: {}, using defaults", e);
                AppConfig::default()
            }),
            Err(e) => {
                log::warn!("Failed to read config: {}, using defaults", e);
                AppConfig::default()
            }
        }
    }

    /// Saves configuration to file.
    pub fn save(&self, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a hex color string to RGB values. Malformed input gives white.
#[cfg_attr(not(windows), allow(dead_code))]
pub fn parse_hex_color(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() >= 6 && hex.is_char_boundary(6) {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
        (r, g, b)
    } else {
        (255, 255, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#FF0000"), (255, 0, 0));
        assert_eq!(parse_hex_color("00ff80"), (0, 255, 128));
        assert_eq!(parse_hex_color("#abc"), (255, 255, 255));
        assert_eq!(parse_hex_color("#zz0000"), (255, 0, 0));
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));

        let config = manager.load();
        assert_eq!(config.title, "TurkeySpell, by Dad");
        assert_eq!((config.width, config.height), (500, 100));
        assert!(manager.path().exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "sounds_dir": "noises", "sound": { "enabled": false } }"#).unwrap();

        let config = ConfigManager::with_path(path).load();
        assert_eq!(config.sounds_dir, "noises");
        assert!(!config.sound.enabled);
        assert_eq!(config.font_size, 32);
        assert_eq!(config.colors.matched, "#FF0000");
        assert!(config.ignore_key_repeat);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let config = ConfigManager::with_path(path).load();
        assert_eq!(config.sounds_dir, "sounds");
    }

    #[test]
    fn sounds_path_resolves_relative_dirs() {
        let base = std::env::temp_dir();
        let config = AppConfig::default();
        assert_eq!(config.sounds_path(&base), base.join("sounds"));

        let absolute = base.join("elsewhere");
        let config = AppConfig {
            sounds_dir: absolute.to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        assert_eq!(config.sounds_path(&base), absolute);
    }
}
