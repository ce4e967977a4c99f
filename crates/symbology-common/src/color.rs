//! Color representation used by symbol definitions.
//!
//! Server JSON encodes colors as `[r, g, b, a]` with every channel in 0-255.
//! Drawing code works with a hex string plus an opacity in 0-1.

use serde::{Deserialize, Serialize};

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA` or a basic CSS color name.
    pub fn from_hex(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if !trimmed.starts_with('#') {
            return named_color(trimmed);
        }

        let hex = &trimmed[1..];
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();

        match hex.len() {
            3 => {
                let expand = |i: usize| {
                    let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
                    Some(v * 16 + v)
                };
                Some(Color::rgba(expand(0)?, expand(1)?, expand(2)?, 255))
            }
            6 => Some(Color::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha scaled from 0-255 to 0-1.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl TryFrom<Vec<f64>> for Color {
    type Error = String;

    fn try_from(channels: Vec<f64>) -> Result<Self, Self::Error> {
        if channels.len() < 3 || channels.len() > 4 {
            return Err(format!(
                "color must have 3 or 4 channels, got {}",
                channels.len()
            ));
        }
        let to_u8 = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Ok(Color::rgba(
            to_u8(channels[0]),
            to_u8(channels[1]),
            to_u8(channels[2]),
            channels.get(3).copied().map(to_u8).unwrap_or(255),
        ))
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

fn named_color(name: &str) -> Option<Color> {
    let rgb = match name.to_lowercase().as_str() {
        "transparent" => return Some(Color::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" => (0, 255, 255),
        "magenta" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(Color::rgba(rgb.0, rgb.1, rgb.2, 255))
}
