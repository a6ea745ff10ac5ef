//! Chart types, styling and rendered output.

use epicurve_common::{parse_hex_color, Result};
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Rendering back-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderBackend {
    /// Static PNG image.
    Bitmap,
    /// Standalone HTML page with an SVG chart and hover text.
    #[default]
    Html,
}

/// How each country's values are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    /// Connected lines with point markers.
    #[default]
    Line,
    /// Grouped bars, one slot per day.
    Bar,
}

macro_rules! named_choice {
    ($ty:ident, $what:literal, $($variant:ident => $name:literal),+ $(,)?) => {
        impl $ty {
            /// Configuration name.
            pub const fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }

            /// Parses a name, falling back to the default with a warning.
            pub fn parse_or_default(name: &str) -> Self {
                name.parse().unwrap_or_else(|_| {
                    let fallback = Self::default();
                    warn!(requested = name, fallback = fallback.name(), concat!("Unknown ", $what, ", using default"));
                    fallback
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = epicurve_common::EpiError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err(epicurve_common::EpiError::validation_field(
                        format!(concat!("Unknown ", $what, " '{}'"), other),
                        $what,
                    )),
                }
            }
        }
    };
}

named_choice!(RenderBackend, "backend", Bitmap => "bitmap", Html => "html");
named_choice!(ChartMode, "chart mode", Line => "line", Bar => "bar");

impl RenderBackend {
    /// Format produced by this back-end.
    pub const fn output_format(self) -> OutputFormat {
        match self {
            RenderBackend::Bitmap => OutputFormat::Png,
            RenderBackend::Html => OutputFormat::Html,
        }
    }
}

/// Color scheme for chart traces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    Default,
    Dark,
    Light,
    Vibrant,
    Monochrome,
    Custom(Vec<String>),
}

impl ColorScheme {
    /// Configuration name; `custom` for an explicit palette.
    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Default => "default",
            ColorScheme::Dark => "dark",
            ColorScheme::Light => "light",
            ColorScheme::Vibrant => "vibrant",
            ColorScheme::Monochrome => "monochrome",
            ColorScheme::Custom(_) => "custom",
        }
    }

    /// Scheme for the chart settings. A non-empty palette wins over the
    /// scheme name; an unknown name falls back to the default with a warning.
    pub fn resolve(name: &str, palette: &[String]) -> Self {
        if !palette.is_empty() {
            return ColorScheme::Custom(palette.to_vec());
        }
        name.parse().unwrap_or_else(|_| {
            warn!(requested = name, fallback = "default", "Unknown color scheme, using default");
            ColorScheme::Default
        })
    }

    /// Colours of the scheme in assignment order.
    pub fn colors(&self) -> Vec<RGBColor> {
        match self {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Gray
            ],
            ColorScheme::Dark => vec![
                RGBColor(55, 126, 184),
                RGBColor(255, 152, 150),
                RGBColor(77, 175, 74),
                RGBColor(255, 187, 120),
                RGBColor(152, 78, 163),
            ],
            ColorScheme::Light => vec![
                RGBColor(166, 206, 227),
                RGBColor(251, 180, 174),
                RGBColor(179, 226, 205),
                RGBColor(253, 205, 172),
                RGBColor(203, 213, 232),
            ],
            ColorScheme::Vibrant => vec![
                RGBColor(230, 25, 75),
                RGBColor(60, 180, 75),
                RGBColor(255, 225, 25),
                RGBColor(0, 130, 200),
                RGBColor(245, 130, 48),
                RGBColor(145, 30, 180),
                RGBColor(70, 240, 240),
                RGBColor(240, 50, 230),
            ],
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),
                RGBColor(64, 64, 64),
                RGBColor(128, 128, 128),
                RGBColor(192, 192, 192),
            ],
            ColorScheme::Custom(colors) => colors.iter().map(|c| parse_color(c)).collect(),
        }
    }
}

/// Parses a `#RRGGBB` colour, black when invalid.
pub fn parse_color(color: &str) -> RGBColor {
    parse_hex_color(color)
        .map(|(r, g, b)| RGBColor(r, g, b))
        .unwrap_or(RGBColor(0, 0, 0))
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = epicurve_common::EpiError;

    /// Parses a named scheme. Custom palettes come from `resolve`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(ColorScheme::Default),
            "dark" => Ok(ColorScheme::Dark),
            "light" => Ok(ColorScheme::Light),
            "vibrant" => Ok(ColorScheme::Vibrant),
            "monochrome" => Ok(ColorScheme::Monochrome),
            other => Err(epicurve_common::EpiError::validation_field(
                format!("Unknown color scheme '{other}'"),
                "scheme",
            )),
        }
    }
}

/// Visual settings shared by every back-end.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub title_font_size: u32,
    pub show_grid: bool,
    pub scheme: ColorScheme,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            background: RGBColor(255, 255, 255),
            title_font_size: 20,
            show_grid: true,
            scheme: ColorScheme::Default,
        }
    }
}

/// Encoded chart format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Html,
}

impl OutputFormat {
    /// Conventional file extension.
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Html => "html",
        }
    }
}

/// A rendered chart held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl RenderedChart {
    /// Writes the chart to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Chart written");
        Ok(())
    }
}
