//! Style configuration for rendered formulas
//!
//! A [`StyleConfig`] is an immutable value object describing how a formula
//! should look: font size in pixels, a hex color, and a font variant. It is
//! replaced wholesale on every change and never mutated in place, so a render
//! cycle can hold onto the exact configuration it was started with.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when building or loading a style configuration
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("font size must be a positive number of pixels, got {0}")]
    InvalidFontSize(u32),
    #[error("invalid color value '{0}': expected #RGB or #RRGGBB")]
    InvalidColor(String),
    #[error("failed to read style file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to parse style TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Font variant applied at the formula-source level
///
/// The typesetting engine controls glyph shaping internally, so variants are
/// expressed by wrapping the source text rather than by post-styling the
/// rendered output. `Standard` and `Serif` pass the source through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FontVariant {
    /// Default math italic
    #[default]
    Standard,
    /// Upright serif (engine default shaping)
    Serif,
    /// Sans-serif, wrapped as `\mathsf{...}`
    SansSerif,
    /// Monospace, wrapped as `\mathtt{...}`
    Monospace,
}

impl FontVariant {
    /// Wrap formula source according to this variant
    pub fn wrap(&self, source: &str) -> String {
        match self {
            FontVariant::Standard | FontVariant::Serif => source.to_string(),
            FontVariant::SansSerif => format!("\\mathsf{{{}}}", source),
            FontVariant::Monospace => format!("\\mathtt{{{}}}", source),
        }
    }
}

/// Immutable styling for a single render cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleConfig {
    /// Font size in pixels (positive)
    pub font_size_px: u32,
    /// Color as `#RGB` or `#RRGGBB`
    pub color_hex: String,
    /// Font variant
    pub variant: FontVariant,
}

/// TOML structure for deserializing style files
#[derive(Deserialize)]
struct TomlStyle {
    font_size: Option<u32>,
    color: Option<String>,
    variant: Option<FontVariant>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size_px: 24,
            color_hex: "#000000".to_string(),
            variant: FontVariant::Standard,
        }
    }
}

impl StyleConfig {
    /// Create a validated style configuration
    pub fn new(
        font_size_px: u32,
        color_hex: impl Into<String>,
        variant: FontVariant,
    ) -> Result<Self, StyleError> {
        let color_hex = color_hex.into();
        if font_size_px == 0 {
            return Err(StyleError::InvalidFontSize(font_size_px));
        }
        if !is_hex_color(&color_hex) {
            return Err(StyleError::InvalidColor(color_hex));
        }
        Ok(Self {
            font_size_px,
            color_hex,
            variant,
        })
    }

    /// Load a style configuration from a TOML file
    ///
    /// Missing fields fall back to the defaults (24px, black, standard).
    pub fn from_file(path: &Path) -> Result<Self, StyleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a style configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, StyleError> {
        let parsed: TomlStyle = toml::from_str(content)?;
        let defaults = Self::default();
        Self::new(
            parsed.font_size.unwrap_or(defaults.font_size_px),
            parsed.color.unwrap_or(defaults.color_hex),
            parsed.variant.unwrap_or(defaults.variant),
        )
    }

    /// Replace the font size
    pub fn with_font_size(mut self, px: u32) -> Self {
        self.font_size_px = px;
        self
    }

    /// Replace the color
    pub fn with_color(mut self, color_hex: impl Into<String>) -> Self {
        self.color_hex = color_hex.into();
        self
    }

    /// Replace the font variant
    pub fn with_variant(mut self, variant: FontVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Check a color value against the `#RGB` / `#RRGGBB` grammar
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
