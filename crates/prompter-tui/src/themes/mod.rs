//! Theme registry and loader
//!
//! Built-in themes with per-color overrides from the config file.

mod dracula;
mod gruvbox;
mod nord;

use prompter_core::config::{ThemeColorOverrides, ThemeConfig};
use ratatui::style::Color;
use tracing::warn;

use crate::theme::Theme;

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Load a theme by name from config
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "gruvbox-dark" | "gruvbox" => gruvbox::dark(),
        "gruvbox-light" => gruvbox::light(),
        "dracula" => dracula::default(),
        "nord" => nord::default(),
        other => {
            warn!("Unknown theme '{}', falling back to gruvbox-dark", other);
            gruvbox::dark()
        }
    };

    apply_overrides(base, &config.colors)
}

fn apply_override(slot: &mut Color, hex: Option<&String>) {
    if let Some(hex) = hex {
        match parse_hex_color(hex) {
            Some(color) => *slot = color,
            None => warn!("Ignoring invalid color override '{}'", hex),
        }
    }
}

/// Apply user color overrides to a base theme
fn apply_overrides(mut theme: Theme, overrides: &ThemeColorOverrides) -> Theme {
    apply_override(&mut theme.bg0, overrides.background.as_ref());
    apply_override(&mut theme.fg0, overrides.foreground.as_ref());
    apply_override(&mut theme.grey1, overrides.dimmed.as_ref());
    apply_override(&mut theme.accent, overrides.accent.as_ref());
    apply_override(&mut theme.bg2, overrides.status.as_ref());
    theme
}

/// Get list of available theme names
pub fn available_themes() -> Vec<&'static str> {
    vec!["gruvbox-dark", "gruvbox-light", "dracula", "nord"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_6digit() {
        let color = parse_hex_color("#ff5500").unwrap();
        assert!(matches!(color, Color::Rgb(255, 85, 0)));
    }

    #[test]
    fn test_parse_hex_color_3digit() {
        let color = parse_hex_color("#f50").unwrap();
        assert!(matches!(color, Color::Rgb(255, 85, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert!(parse_hex_color("invalid").is_none());
        assert!(parse_hex_color("#gg0000").is_none());
        assert!(parse_hex_color("#é00").is_none());
    }

    #[test]
    fn test_load_theme_default() {
        let theme = load_theme(&ThemeConfig::default());
        assert!(matches!(theme.bg0, Color::Rgb(0x28, 0x28, 0x28)));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let config = ThemeConfig {
            name: "no-such-theme".to_string(),
            colors: ThemeColorOverrides::default(),
        };
        let theme = load_theme(&config);
        assert!(matches!(theme.bg0, Color::Rgb(0x28, 0x28, 0x28)));
    }

    #[test]
    fn test_load_theme_with_override() {
        let config = ThemeConfig {
            name: "nord".to_string(),
            colors: ThemeColorOverrides {
                accent: Some("#ff0000".to_string()),
                dimmed: Some("not a color".to_string()),
                ..Default::default()
            },
        };
        let theme = load_theme(&config);
        assert!(matches!(theme.accent, Color::Rgb(255, 0, 0)));
        assert_eq!(theme.grey1, nord::default().grey1);
    }

    #[test]
    fn test_every_listed_theme_loads() {
        for name in available_themes() {
            let config = ThemeConfig {
                name: name.to_string(),
                colors: ThemeColorOverrides::default(),
            };
            let _ = load_theme(&config);
        }
    }
}
