//! Theme palette and color resolution.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use thiserror::Error;

use crate::element::ColorRef;

/// Theme errors.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Invalid color for {slot}: {value:?} ({reason})")]
    InvalidColor {
        slot: &'static str,
        value: String,
        reason: String,
    },
}

/// Colors the host resolves from its own theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub background: Color,
    pub foreground: Color,
    /// Fill of resize handles.
    pub card: Color,
    /// Grid lines.
    pub border: Color,
    /// Grid dots.
    pub muted: Color,
    pub accent: Color,
    /// Selection chrome and text edit outline.
    pub primary: Color,
}

/// CSS strings for each palette slot, as read from the host.
#[derive(Debug, Clone, Copy)]
pub struct CssPalette<'a> {
    pub background: &'a str,
    pub foreground: &'a str,
    pub card: &'a str,
    pub border: &'a str,
    pub muted: &'a str,
    pub accent: &'a str,
    pub primary: &'a str,
}

const fn hex(rgb: u32) -> Color {
    Color::from_rgb8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self::light()
    }
}

impl ThemePalette {
    pub const fn light() -> Self {
        Self {
            background: hex(0xffffff),
            foreground: hex(0x0f172a),
            card: hex(0xffffff),
            border: hex(0xe4e4e7),
            muted: hex(0xf4f4f5),
            accent: hex(0xf8fafc),
            primary: hex(0x0f172a),
        }
    }

    pub const fn dark() -> Self {
        Self {
            background: hex(0x0b0f17),
            foreground: hex(0xf8fafc),
            card: hex(0x18181b),
            border: hex(0x3f3f46),
            muted: hex(0x27272a),
            accent: hex(0x1f1f23),
            primary: hex(0xf8fafc),
        }
    }

    /// Build a palette from CSS color strings.
    pub fn from_css(css: CssPalette<'_>) -> Result<Self, ThemeError> {
        Ok(Self {
            background: parse_slot("background", css.background)?,
            foreground: parse_slot("foreground", css.foreground)?,
            card: parse_slot("card", css.card)?,
            border: parse_slot("border", css.border)?,
            muted: parse_slot("muted", css.muted)?,
            accent: parse_slot("accent", css.accent)?,
            primary: parse_slot("primary", css.primary)?,
        })
    }

    /// Resolve an element color. `None` means nothing is drawn.
    ///
    /// `neutral` follows the foreground so elements stay legible when the
    /// theme flips. Unparsable explicit colors fall back to the foreground.
    pub fn resolve(&self, color: &ColorRef) -> Option<Color> {
        match color {
            ColorRef::Transparent => None,
            ColorRef::Neutral => Some(self.foreground),
            ColorRef::Explicit(css) => Some(parse_css(css).unwrap_or(self.foreground)),
        }
    }

    /// Resolve a stroke color; strokes are never skipped.
    pub fn resolve_stroke(&self, color: &ColorRef) -> Color {
        self.resolve(color).unwrap_or(self.foreground)
    }
}

/// Parse a CSS color string into an sRGB color.
pub fn parse_css(value: &str) -> Option<Color> {
    parse_color(value.trim())
        .ok()
        .map(|color| color.to_alpha_color::<Srgb>())
}

fn parse_slot(slot: &'static str, value: &str) -> Result<Color, ThemeError> {
    parse_color(value.trim())
        .map(|color| color.to_alpha_color::<Srgb>())
        .map_err(|err| ThemeError::InvalidColor {
            slot,
            value: value.to_string(),
            reason: err.to_string(),
        })
}
