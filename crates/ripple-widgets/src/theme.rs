//! Theme configuration for the ripple seekbar
//!
//! The seekbar needs two colors from the host theme, the active (progress)
//! color and the inactive (track) color, plus two minor ones for the
//! seekhead marker and the time labels. Colors are resolved through
//! [`palette`] at draw time, never cached in render state, so a theme file
//! change followed by re-initialization shows up on the next repaint.
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/ripple/theme.yaml

use iced::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global theme instance (initialized once at startup)
static THEME: OnceLock<ThemeConfig> = OnceLock::new();

/// Root theme configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Seekbar colors
    pub seekbar: SeekbarColors,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            seekbar: SeekbarColors::default(),
        }
    }
}

/// Seekbar color configuration
///
/// Colors are specified as hex strings (e.g., "#1DB954")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekbarColors {
    /// Played portion of the waveform (default: green)
    pub progress: String,
    /// Unplayed portion of the waveform (default: light gray)
    pub track: String,
    /// Hover marker line (default: near-white)
    pub seekhead: String,
    /// Time labels (default: subdued gray)
    pub label: String,
}

impl Default for SeekbarColors {
    fn default() -> Self {
        Self {
            progress: "#1DB954".to_string(),
            track: "#B3B3B3".to_string(),
            seekhead: "#E8E8E8".to_string(),
            label: "#6A6A6A".to_string(),
        }
    }
}

/// Resolved seekbar colors ready for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekbarPalette {
    pub progress: Color,
    pub track: Color,
    pub seekhead: Color,
    pub label: Color,
}

/// Fallback palette (matches `SeekbarColors::default()`)
pub const DEFAULT_PALETTE: SeekbarPalette = SeekbarPalette {
    progress: Color::from_rgb8(0x1D, 0xB9, 0x54),
    track: Color::from_rgb8(0xB3, 0xB3, 0xB3),
    seekhead: Color::from_rgb8(0xE8, 0xE8, 0xE8),
    label: Color::from_rgb8(0x6A, 0x6A, 0x6A),
};

impl SeekbarColors {
    /// Resolve the configured hex strings to drawable colors
    pub fn resolve(&self) -> SeekbarPalette {
        SeekbarPalette {
            progress: parse_hex_color(&self.progress, DEFAULT_PALETTE.progress),
            track: parse_hex_color(&self.track, DEFAULT_PALETTE.track),
            seekhead: parse_hex_color(&self.seekhead, DEFAULT_PALETTE.seekhead),
            label: parse_hex_color(&self.label, DEFAULT_PALETTE.label),
        }
    }
}

/// Parse a "#RRGGBB" / "RRGGBB" hex string, falling back on malformed input
fn parse_hex_color(hex: &str, fallback: Color) -> Color {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        log::warn!("invalid hex color '{}', using fallback", hex);
        return fallback;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&digits[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&digits[4..6], 16).unwrap_or(0);

    Color::from_rgb8(r, g, b)
}

/// Get the default theme file path
///
/// Returns: ~/.config/ripple/theme.yaml
pub fn default_theme_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("ripple")
        .join("theme.yaml")
}

/// Load theme configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns defaults.
pub fn load_theme(path: &Path) -> ThemeConfig {
    if !path.exists() {
        log::info!("load_theme: no theme at {:?}, using defaults", path);
        return ThemeConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<ThemeConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_theme: progress={}, track={}",
                    config.seekbar.progress,
                    config.seekbar.track
                );
                config
            }
            Err(e) => {
                log::warn!("load_theme: failed to parse theme: {}, using defaults", e);
                ThemeConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_theme: failed to read theme file: {}, using defaults", e);
            ThemeConfig::default()
        }
    }
}

/// Initialize the global theme from the config file (call once at startup)
pub fn init_theme() {
    let path = default_theme_path();
    let config = load_theme(&path);
    if THEME.set(config).is_err() {
        log::warn!("theme already initialized");
    }
}

/// Current seekbar palette
///
/// Queried synchronously at draw time. Returns configured colors from
/// theme.yaml, or the defaults if the theme was never initialized.
pub fn palette() -> SeekbarPalette {
    THEME
        .get()
        .map(|t| t.seekbar.resolve())
        .unwrap_or(DEFAULT_PALETTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color = parse_hex_color("#FF0000", Color::BLACK);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert_eq!(color.b, 0.0);

        let color = parse_hex_color("00FF00", Color::BLACK);
        assert_eq!(color.g, 1.0);
    }

    #[test]
    fn test_parse_hex_color_falls_back_on_garbage() {
        assert_eq!(parse_hex_color("", Color::WHITE), Color::WHITE);
        assert_eq!(parse_hex_color("#12345", Color::WHITE), Color::WHITE);
        assert_eq!(parse_hex_color("not-hex", Color::WHITE), Color::WHITE);
    }

    #[test]
    fn test_default_palette_matches_config_defaults() {
        let resolved = SeekbarColors::default().resolve();
        assert_eq!(resolved, DEFAULT_PALETTE);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ThemeConfig {
            seekbar: SeekbarColors {
                progress: "#00FF00".to_string(),
                track: "#333333".to_string(),
                seekhead: "#FFFFFF".to_string(),
                label: "#888888".to_string(),
            },
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ThemeConfig = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.seekbar.progress, "#00FF00");
        assert_eq!(parsed.seekbar.track, "#333333");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let parsed: ThemeConfig =
            serde_yaml::from_str("seekbar:\n  progress: \"#112233\"\n").unwrap();
        assert_eq!(parsed.seekbar.progress, "#112233");
        assert_eq!(parsed.seekbar.track, SeekbarColors::default().track);
    }
}
