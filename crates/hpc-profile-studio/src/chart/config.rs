//! Chart style configuration.
//!
//! Every field is optional in a style file:
//!
//! ```toml
//! width = 1600
//! height = 900
//! title_font_size = 28
//! label_font_size = 16
//! palette = ["#d62728", "#1f77b4", "#2ca02c"]
//! ```

use crate::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use crate::utils::error::ChartError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// 24-bit colour, written `#rrggbb` in style files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(214, 39, 40);
    pub const BLUE: Rgb = Rgb(31, 119, 180);
    pub const GREEN: Rgb = Rgb(44, 160, 44);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const YELLOW: Rgb = Rgb(188, 189, 34);
    pub const CYAN: Rgb = Rgb(23, 190, 207);

    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("'{}' is not a #rrggbb colour", value))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colours used for series without an explicit colour
fn default_palette() -> Vec<Rgb> {
    vec![
        Rgb::RED,
        Rgb::BLUE,
        Rgb::GREEN,
        Rgb::BLACK,
        Rgb(255, 127, 14),  // Orange
        Rgb(148, 103, 189), // Purple
        Rgb(140, 86, 75),   // Brown
        Rgb(23, 190, 207),  // Cyan
    ]
}

/// Chart style
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub palette: Vec<Rgb>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            title_font_size: 24,
            label_font_size: 14,
            palette: default_palette(),
        }
    }
}

impl ChartConfig {
    /// Palette colour for the series at `index`, cycling
    pub fn color(&self, index: usize) -> Rgb {
        if self.palette.is_empty() {
            return Rgb(0, 0, 0);
        }
        self.palette[index % self.palette.len()]
    }
}

/// Load a chart style from a TOML file
///
/// # Errors
/// * `ChartError::IoError` - file could not be read
/// * `ChartError::StyleParseFailed` - invalid TOML or field value
///
/// # Example
/// ```ignore
/// let style = load_chart_config("style.toml")?;
/// ```
pub fn load_chart_config(path: impl AsRef<Path>) -> Result<ChartConfig, ChartError> {
    let contents = fs::read_to_string(path)?;
    let config: ChartConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse_hex("#d0523a"), Some(Rgb(0xd0, 0x52, 0x3a)));
        assert_eq!(Rgb::parse_hex("d0523a"), None);
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn test_load_partial_style() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "width = 800\npalette = [\"#000000\", \"#ffffff\"]").unwrap();

        let config = load_chart_config(file.path()).unwrap();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, DEFAULT_CHART_HEIGHT);
        assert_eq!(config.color(3), Rgb(255, 255, 255));
    }

    #[test]
    fn test_bad_colour_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "palette = [\"red\"]").unwrap();

        assert!(matches!(
            load_chart_config(file.path()),
            Err(ChartError::StyleParseFailed(_))
        ));
    }
}
