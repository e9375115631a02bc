use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::locale::Locale;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Interface language: "EN" or "简中"
    #[serde(default)]
    pub locale: Locale,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            locale: Locale::default(),
        }
    }
}

/// How the duration of a prompter run is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationMode {
    /// Whole passage plays in `duration_ms`, whatever its length
    #[default]
    Fixed,
    /// Passage scrolls at `lines_per_second`
    Speed,
}

/// Resolved timing for one animation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingMode {
    Fixed { duration_ms: u64 },
    Speed { lines_per_second: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Duration mode: "fixed" or "speed"
    #[serde(default)]
    pub mode: DurationMode,
    /// Total run time in fixed mode
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Scroll rate in speed mode
    #[serde(default = "default_lines_per_second")]
    pub lines_per_second: f64,
    /// Progress sampling cadence while playing
    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: u64,
    /// Seek step for the seek keys
    #[serde(default = "default_seek_step")]
    pub seek_step_ms: u64,
    /// Speed change applied by the speed keys (lines/s in speed mode, 10% of duration in fixed mode)
    #[serde(default = "default_speed_step")]
    pub speed_step: f64,
    /// Start playing as soon as the prompter is mounted
    #[serde(default)]
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            mode: DurationMode::default(),
            duration_ms: default_duration_ms(),
            lines_per_second: default_lines_per_second(),
            sample_interval_ms: default_sample_interval(),
            seek_step_ms: default_seek_step(),
            speed_step: default_speed_step(),
            autoplay: false,
        }
    }
}

impl PlaybackConfig {
    pub fn timing_mode(&self) -> TimingMode {
        match self.mode {
            DurationMode::Fixed => TimingMode::Fixed {
                duration_ms: self.duration_ms,
            },
            DurationMode::Speed => TimingMode::Speed {
                lines_per_second: self.lines_per_second,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Redraw rate while the prompter is playing
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Show the editor pane next to the prompter
    #[serde(default = "default_true")]
    pub show_editor: bool,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            show_editor: default_true(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Theme configuration
/// Can be specified as a simple string (theme name) or as a table with overrides
#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    /// Theme name ("gruvbox-dark" or "gruvbox-light")
    pub name: String,
    /// Optional color overrides
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

impl<'de> Deserialize<'de> for ThemeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};
        use std::fmt;

        struct ThemeConfigVisitor;

        impl<'de> Visitor<'de> for ThemeConfigVisitor {
            type Value = ThemeConfig;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a theme name or a table with 'name' and optional 'colors'")
            }

            fn visit_str<E>(self, value: &str) -> Result<ThemeConfig, E>
            where
                E: de::Error,
            {
                Ok(ThemeConfig {
                    name: value.to_string(),
                    colors: ThemeColorOverrides::default(),
                })
            }

            fn visit_map<M>(self, mut map: M) -> Result<ThemeConfig, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut name = None;
                let mut colors = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "name" => name = Some(map.next_value()?),
                        "colors" => colors = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                Ok(ThemeConfig {
                    name: name.unwrap_or_else(default_theme_name),
                    colors: colors.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_any(ThemeConfigVisitor)
    }
}

/// Hex color overrides ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Pane background
    pub background: Option<String>,
    /// Body text
    pub foreground: Option<String>,
    /// Lines away from the reading line
    pub dimmed: Option<String>,
    /// Reading line and progress bar
    pub accent: Option<String>,
    /// Status bar background
    pub status: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-d>" (Ctrl+d), "G" (Shift+g), "<Space>", "gg"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    #[serde(default = "default_key_toggle_playback")]
    pub toggle_playback: String,
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_key_scroll_half_down")]
    pub scroll_half_down: String,
    #[serde(default = "default_key_scroll_half_up")]
    pub scroll_half_up: String,
    #[serde(default = "default_key_seek_backward")]
    pub seek_backward: String,
    #[serde(default = "default_key_seek_forward")]
    pub seek_forward: String,
    #[serde(default = "default_key_speed_up")]
    pub speed_up: String,
    #[serde(default = "default_key_speed_down")]
    pub speed_down: String,
    #[serde(default = "default_key_jump_to_start")]
    pub jump_to_start: String,
    #[serde(default = "default_key_jump_to_end")]
    pub jump_to_end: String,
    #[serde(default = "default_key_cycle_locale")]
    pub cycle_locale: String,
    #[serde(default = "default_key_toggle_editor")]
    pub toggle_editor: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            toggle_playback: default_key_toggle_playback(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            scroll_half_down: default_key_scroll_half_down(),
            scroll_half_up: default_key_scroll_half_up(),
            seek_backward: default_key_seek_backward(),
            seek_forward: default_key_seek_forward(),
            speed_up: default_key_speed_up(),
            speed_down: default_key_speed_down(),
            jump_to_start: default_key_jump_to_start(),
            jump_to_end: default_key_jump_to_end(),
            cycle_locale: default_key_cycle_locale(),
            toggle_editor: default_key_toggle_editor(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_toggle_playback() -> String { "<Space>".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_scroll_half_down() -> String { "<C-d>".to_string() }
fn default_key_scroll_half_up() -> String { "<C-u>".to_string() }
fn default_key_seek_backward() -> String { "h".to_string() }
fn default_key_seek_forward() -> String { "l".to_string() }
fn default_key_speed_up() -> String { "+".to_string() }
fn default_key_speed_down() -> String { "-".to_string() }
fn default_key_jump_to_start() -> String { "gg".to_string() }
fn default_key_jump_to_end() -> String { "G".to_string() }
fn default_key_cycle_locale() -> String { "L".to_string() }
fn default_key_toggle_editor() -> String { "e".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prompter")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_duration_ms() -> u64 {
    60_000
}

fn default_lines_per_second() -> f64 {
    1.5
}

fn default_sample_interval() -> u64 {
    100
}

fn default_seek_step() -> u64 {
    5_000
}

fn default_speed_step() -> f64 {
    0.25
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    30
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, defaults when it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/prompter/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("prompter")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("prompter.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.playback.mode, DurationMode::Fixed);
        assert_eq!(config.playback.duration_ms, 60_000);
        assert_eq!(config.playback.sample_interval_ms, 100);
        assert_eq!(config.ui.theme.name, "gruvbox-dark");
        assert_eq!(config.keymap.toggle_playback, "<Space>");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [playback]
            mode = "speed"
            lines_per_second = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(
            config.playback.timing_mode(),
            TimingMode::Speed { lines_per_second: 2.0 }
        );
        assert_eq!(config.playback.sample_interval_ms, 100);
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_theme_as_string_or_table() {
        let config = AppConfig::from_toml(
            r#"
            [ui]
            theme = "gruvbox-light"
            "#,
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "gruvbox-light");

        let config = AppConfig::from_toml(
            r##"
            [ui.theme]
            colors = { accent = "#ff0000" }
            "##,
        )
        .unwrap();
        assert_eq!(config.ui.theme.name, "gruvbox-dark");
        assert_eq!(config.ui.theme.colors.accent.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_locale_parses() {
        let config = AppConfig::from_toml(
            r#"
            [general]
            locale = "简中"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.locale, Locale::ZhHans);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[playback\nmode = 1").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.playback.duration_ms, config.playback.duration_ms);
    }
}
