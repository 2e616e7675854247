// SPDX-License-Identifier: MPL-2.0
//! User preferences for the comparison window, stored in `settings.toml`.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[playback]` - Autoplay and keyboard seek step
//! - `[stats]` - Stats overlay defaults and codec label
//! - `[transport]` - Shared scrubber range
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()` with an explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set the `VID_COMPARE_CONFIG_DIR` environment variable
//! 4. Fall back to the platform config directory
//!
//! # Examples
//!
//! ```no_run
//! use vid_compare::config;
//!
//! let (config, warning) = config::load();
//! if warning.is_none() {
//!     println!("seek step: {}s", config.keyboard_seek_step_secs());
//! }
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::Result;
use crate::ui::compare::ControllerOptions;
use crate::ui::theming::ThemeMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default)]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Playback behavior shared by both videos.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Start both videos once their metadata is known.
    #[serde(default = "default_autoplay")]
    pub autoplay: Option<bool>,

    /// Keyboard seek step in seconds (arrow keys).
    #[serde(default = "default_keyboard_seek_step_secs")]
    pub keyboard_seek_step_secs: Option<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            autoplay: default_autoplay(),
            keyboard_seek_step_secs: default_keyboard_seek_step_secs(),
        }
    }
}

/// Stats overlay settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatsConfig {
    /// Whether the overlay is open on launch.
    #[serde(default = "default_show_stats")]
    pub show_on_start: Option<bool>,

    /// Codec label rendered for both sides.
    #[serde(default = "default_codec_label")]
    pub codec_label: Option<String>,

    /// Show the estimated compression percentage under the compressed panel.
    #[serde(default = "default_show_compression_estimate")]
    pub show_compression_estimate: Option<bool>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            show_on_start: default_show_stats(),
            codec_label: default_codec_label(),
            show_compression_estimate: default_show_compression_estimate(),
        }
    }
}

/// Shared scrubber settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TransportConfig {
    /// Scrubber maximum before metadata arrives.
    #[serde(default = "default_initial_duration_secs")]
    pub initial_duration_secs: Option<f64>,

    /// Replace the scrubber maximum with the original video's duration.
    #[serde(default = "default_follow_media_duration")]
    pub follow_media_duration: Option<bool>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            initial_duration_secs: default_initial_duration_secs(),
            follow_media_duration: default_follow_media_duration(),
        }
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub transport: TransportConfig,
}

impl Config {
    /// Keyboard seek step, clamped to the supported range.
    pub fn keyboard_seek_step_secs(&self) -> f64 {
        self.playback
            .keyboard_seek_step_secs
            .unwrap_or(DEFAULT_KEYBOARD_SEEK_STEP_SECS)
            .clamp(MIN_KEYBOARD_SEEK_STEP_SECS, MAX_KEYBOARD_SEEK_STEP_SECS)
    }

    pub fn show_stats_on_start(&self) -> bool {
        self.stats.show_on_start.unwrap_or(DEFAULT_SHOW_STATS)
    }

    pub fn show_compression_estimate(&self) -> bool {
        self.stats
            .show_compression_estimate
            .unwrap_or(DEFAULT_SHOW_COMPRESSION_ESTIMATE)
    }

    /// Options for the pair controller, with unset fields at their defaults.
    pub fn controller_options(&self) -> ControllerOptions {
        let initial_duration_secs = self
            .transport
            .initial_duration_secs
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .unwrap_or(DEFAULT_INITIAL_DURATION_SECS);

        ControllerOptions {
            codec_label: self
                .stats
                .codec_label
                .clone()
                .unwrap_or_else(|| DEFAULT_CODEC_LABEL.to_string()),
            initial_duration_secs,
            follow_media_duration: self
                .transport
                .follow_media_duration
                .unwrap_or(DEFAULT_FOLLOW_MEDIA_DURATION),
            initially_playing: self.playback.autoplay.unwrap_or(DEFAULT_AUTOPLAY),
        }
    }
}

// =============================================================================
// Default Value Functions (for serde)
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_autoplay() -> Option<bool> {
    Some(DEFAULT_AUTOPLAY)
}

fn default_keyboard_seek_step_secs() -> Option<f64> {
    Some(DEFAULT_KEYBOARD_SEEK_STEP_SECS)
}

fn default_show_stats() -> Option<bool> {
    Some(DEFAULT_SHOW_STATS)
}

fn default_codec_label() -> Option<String> {
    Some(DEFAULT_CODEC_LABEL.to_string())
}

fn default_show_compression_estimate() -> Option<bool> {
    Some(DEFAULT_SHOW_COMPRESSION_ESTIMATE)
}

fn default_initial_duration_secs() -> Option<f64> {
    Some(DEFAULT_INITIAL_DURATION_SECS)
}

fn default_follow_media_duration() -> Option<bool> {
    Some(DEFAULT_FOLLOW_MEDIA_DURATION)
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// the default config with the i18n key of a warning.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("ignoring unreadable config {}: {}", path.display(), err);
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn load_from_path_reads_every_section() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(
            &config_path,
            r#"
[general]
language = "fr"
theme_mode = "light"

[playback]
autoplay = false
keyboard_seek_step_secs = 2.5

[stats]
show_on_start = false
codec_label = "HEVC"
show_compression_estimate = true

[transport]
initial_duration_secs = 12.0
follow_media_duration = false
"#,
        )
        .expect("failed to write config");

        let loaded = load_from_path(&config_path).expect("failed to load config");

        let expected = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
                theme_mode: ThemeMode::Light,
            },
            playback: PlaybackConfig {
                autoplay: Some(false),
                keyboard_seek_step_secs: Some(2.5),
            },
            stats: StatsConfig {
                show_on_start: Some(false),
                codec_label: Some("HEVC".to_string()),
                show_compression_estimate: Some(true),
            },
            transport: TransportConfig {
                initial_duration_secs: Some(12.0),
                follow_media_duration: Some(false),
            },
        };
        assert_eq!(loaded, expected);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        match load_from_path(&config_path) {
            Err(Error::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[stats]\nshow_on_start = false\n")
            .expect("partial config should parse");

        assert_eq!(config.stats.show_on_start, Some(false));
        assert_eq!(config.stats.codec_label.as_deref(), Some(DEFAULT_CODEC_LABEL));
        assert_eq!(config.playback, PlaybackConfig::default());
        assert_eq!(config.transport, TransportConfig::default());
        assert_eq!(config.general.theme_mode, ThemeMode::System);
    }

    #[test]
    fn theme_mode_is_case_insensitive() {
        let config: Config = toml::from_str("[general]\ntheme_mode = \"DARK\"\n")
            .expect("theme mode should parse");
        assert_eq!(config.general.theme_mode, ThemeMode::Dark);

        let invalid = toml::from_str::<Config>("[general]\ntheme_mode = \"sepia\"\n");
        assert!(invalid.is_err());
    }

    #[test]
    fn load_with_override_reports_corrupt_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[stats\n").expect("write");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
    }

    #[test]
    fn load_with_override_without_file_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn seek_step_is_clamped() {
        let mut config = Config::default();
        config.playback.keyboard_seek_step_secs = Some(1000.0);
        assert_eq!(config.keyboard_seek_step_secs(), MAX_KEYBOARD_SEEK_STEP_SECS);

        config.playback.keyboard_seek_step_secs = None;
        assert_eq!(config.keyboard_seek_step_secs(), DEFAULT_KEYBOARD_SEEK_STEP_SECS);
    }

    #[test]
    fn controller_options_follow_config() {
        let mut config = Config::default();
        config.playback.autoplay = Some(false);
        config.stats.codec_label = Some("AV1".to_string());
        config.transport.initial_duration_secs = Some(-4.0);

        let options = config.controller_options();

        assert!(!options.initially_playing);
        assert_eq!(options.codec_label, "AV1");
        assert_eq!(options.initial_duration_secs, DEFAULT_INITIAL_DURATION_SECS);
        assert!(options.follow_media_duration);
    }
}
