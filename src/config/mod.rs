//! Configuration management for Ridge
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files. It combines decoration theme metrics, focus policy
//! and general settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration struct containing all Ridge settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RidgeConfig {
    /// Server-side decoration metrics and colors
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Focus and stacking policy
    #[serde(default)]
    pub focus: FocusConfig,

    /// General shell settings
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Decoration theme used when building server-side decorations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    /// Titlebar height (pixels)
    pub title_height: i32,

    /// Border width (pixels)
    pub border_width: i32,

    /// Width of each titlebar button (pixels)
    pub button_width: i32,

    /// Invisible resize area around the frame (pixels)
    pub extended_area: i32,

    /// Approximate advance of one title glyph (pixels)
    pub title_char_width: i32,

    /// Active border color (hex: #RRGGBB)
    pub active_border_color: String,

    /// Inactive border color (hex: #RRGGBB)
    pub inactive_border_color: String,

    /// Active titlebar background (hex: #RRGGBB)
    pub active_title_color: String,

    /// Inactive titlebar background (hex: #RRGGBB)
    pub inactive_title_color: String,
}

/// Focus policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FocusConfig {
    /// Focus the view under the cursor on pointer motion
    pub focus_follows_mouse: bool,

    /// Also raise the view when focus follows the mouse
    pub raise_on_focus: bool,

    /// Draw server-side decorations for views when they first map
    pub server_side_decorations: bool,
}

/// General shell settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            title_height: 26,
            border_width: 1,
            button_width: 26,
            extended_area: 20,
            title_char_width: 8,
            active_border_color: "#7C3AED".to_string(), // Purple
            inactive_border_color: "#374151".to_string(), // Gray
            active_title_color: "#2E3440".to_string(),
            inactive_title_color: "#1F2329".to_string(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus_follows_mouse: false,
            raise_on_focus: false,
            server_side_decorations: true,
        }
    }
}

/// Parse a `#RRGGBB` hex color string to an RGBA float array
pub fn parse_color(hex: &str) -> Option<[f32; 4]> {
    if !hex.starts_with('#') || hex.len() != 7 || !hex.is_ascii() {
        return None;
    }

    let hex = &hex[1..];
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
}

impl ThemeConfig {
    pub fn active_border(&self) -> [f32; 4] {
        parse_color(&self.active_border_color).unwrap_or([0.486, 0.227, 0.929, 1.0])
    }

    pub fn inactive_border(&self) -> [f32; 4] {
        parse_color(&self.inactive_border_color).unwrap_or([0.216, 0.255, 0.318, 1.0])
    }

    pub fn active_title(&self) -> [f32; 4] {
        parse_color(&self.active_title_color).unwrap_or([0.180, 0.204, 0.251, 1.0])
    }

    pub fn inactive_title(&self) -> [f32; 4] {
        parse_color(&self.inactive_title_color).unwrap_or([0.122, 0.137, 0.161, 1.0])
    }
}

impl RidgeConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_home(path.as_ref())?;

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        let config: RidgeConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", expanded_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let theme = &self.theme;

        if theme.title_height <= 0 {
            anyhow::bail!("Invalid title_height: must be greater than 0");
        }

        if theme.button_width <= 0 {
            anyhow::bail!("Invalid button_width: must be greater than 0");
        }

        if !(0..=64).contains(&theme.border_width) {
            anyhow::bail!("Invalid border_width: must be between 0 and 64");
        }

        if theme.extended_area < 0 {
            anyhow::bail!("Invalid extended_area: must not be negative");
        }

        if theme.title_char_width <= 0 {
            anyhow::bail!("Invalid title_char_width: must be greater than 0");
        }

        for (name, value) in [
            ("active_border_color", &theme.active_border_color),
            ("inactive_border_color", &theme.inactive_border_color),
            ("active_title_color", &theme.active_title_color),
            ("inactive_title_color", &theme.inactive_title_color),
        ] {
            if parse_color(value).is_none() {
                anyhow::bail!("Invalid {}: expected #RRGGBB, got {:?}", name, value);
            }
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one
    /// Sections of the partial config that differ from the defaults win
    pub fn merge_partial(mut self, partial: RidgeConfig) -> Self {
        let default_config = RidgeConfig::default();

        if partial.theme != default_config.theme {
            self.theme = partial.theme;
        }
        if partial.focus != default_config.focus {
            self.focus = partial.focus;
        }
        if partial.general != default_config.general {
            self.general = partial.general;
        }

        self
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> Result<std::path::PathBuf> {
    if path.to_string_lossy().starts_with('~') {
        let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
        let rest = path.strip_prefix("~").unwrap_or(path);
        Ok(Path::new(&home).join(rest))
    } else {
        Ok(path.to_path_buf())
    }
}
