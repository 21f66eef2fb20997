//! Colors and brushes.
//!
//! Color strings are parsed as named colors or `#rrggbb` / `#rgb` /
//! `#rrggbbaa` hex values.

use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(205, 49, 49);
    pub const GREEN: Color = Color::rgb(13, 188, 121);
    pub const BLUE: Color = Color::rgb(36, 114, 200);
    pub const GREY: Color = Color::rgb(128, 128, 128);
    pub const DARK_GREY: Color = Color::rgb(64, 64, 64);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a named color or a hex literal. Returns `None` if unrecognised.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        match s.to_ascii_lowercase().as_str() {
            "transparent" => Some(Self::TRANSPARENT),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "grey" | "gray" => Some(Self::GREY),
            "dark_grey" | "dark_gray" | "darkgrey" | "darkgray" => Some(Self::DARK_GREY),
            _ => None,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse hex digits (without the leading `#`).
fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        3 => {
            let r = channel(0..1)?;
            let g = channel(1..2)?;
            let b = channel(2..3)?;
            Some(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Color::rgba(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Brush
// ---------------------------------------------------------------------------

/// How an area is filled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Brush {
    /// Paint nothing.
    #[default]
    None,
    Solid(Color),
}

impl Brush {
    pub fn is_visible(&self) -> bool {
        match self {
            Brush::None => false,
            Brush::Solid(color) => !color.is_transparent(),
        }
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

impl fmt::Display for Brush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Brush::None => f.write_str("none"),
            Brush::Solid(color) => color.fmt(f),
        }
    }
}
