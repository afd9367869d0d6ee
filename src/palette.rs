//! Cell colours: the six symbolic colours, palette validation, and name/hex parsing.

use crate::error::ConfigError;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Symbolic cell colour. Rendering decides what these look like; `rgb()` is only a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Orange,
    Magenta,
}

impl Color {
    pub const ALL: [Self; 6] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Orange,
        Self::Magenta,
    ];

    /// Suggested 0xRRGGBB value for renderers.
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Red => 0xFF_0000,
            Self::Green => 0x00_FF00,
            Self::Blue => 0x00_00FF,
            Self::Yellow => 0xFF_FF00,
            Self::Orange => 0xFF_8800,
            Self::Magenta => 0xFF_00FF,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Magenta => "magenta",
        }
    }

    /// Single-letter code, lowercase. Unique across the palette.
    pub const fn letter(self) -> char {
        match self {
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
            Self::Yellow => 'y',
            Self::Orange => 'o',
            Self::Magenta => 'm',
        }
    }

    pub fn from_rgb(rgb: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.rgb() == rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a name (`orange`), a letter code (`o`) or a hex value matching one of the colours (`#ff8800`, `#f80`).
impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            let rgb = parse_hex(s)?;
            return Self::from_rgb(rgb).ok_or_else(|| ConfigError::UnknownColor(s.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lower || (lower.len() == 1 && lower.starts_with(c.letter())))
            .ok_or_else(|| ConfigError::UnknownColor(s.to_string()))
    }
}

/// Parse hex colour "#RRGGBB" or "#RGB" into 0xRRGGBB.
pub fn parse_hex(s: &str) -> Result<u32, ConfigError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ConfigError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok((u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
}

/// Non-empty set of distinct colours that new cells are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: Color::ALL.to_vec(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for (i, c) in colors.iter().enumerate() {
            if colors[..i].contains(c) {
                return Err(ConfigError::DuplicateColor(c.to_string()));
            }
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Uniform draw. `new` rejects empty palettes, so the range is never empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}
