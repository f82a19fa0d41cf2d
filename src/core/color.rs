use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGB color with 8-bit channels, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            red: ((packed >> 16) & 0xff) as u8,
            green: ((packed >> 8) & 0xff) as u8,
            blue: (packed & 0xff) as u8,
        }
    }

    /// Parses `#rgb` or `#rrggbb` (leading `#` optional).
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        let invalid = || ChartError::InvalidData(format!("invalid hex color `{input}`"));
        if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            3 => {
                let packed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                let expand = |nibble: u32| (nibble * 0x11) as u8;
                Ok(Self::rgb(
                    expand((packed >> 8) & 0xf),
                    expand((packed >> 4) & 0xf),
                    expand(packed & 0xf),
                ))
            }
            6 => {
                let packed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                Ok(Self::from_u32(packed))
            }
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Twenty-color categorical palette: five hue groups, four shades each.
pub const CATEGORY20C: [Color; 20] = [
    Color::from_u32(0x3182bd),
    Color::from_u32(0x6baed6),
    Color::from_u32(0x9ecae1),
    Color::from_u32(0xc6dbef),
    Color::from_u32(0xe6550d),
    Color::from_u32(0xfd8d3c),
    Color::from_u32(0xfdae6b),
    Color::from_u32(0xfdd0a2),
    Color::from_u32(0x31a354),
    Color::from_u32(0x74c476),
    Color::from_u32(0xa1d99b),
    Color::from_u32(0xc7e9c0),
    Color::from_u32(0x756bb1),
    Color::from_u32(0x9e9ac8),
    Color::from_u32(0xbcbddc),
    Color::from_u32(0xdadaeb),
    Color::from_u32(0x636363),
    Color::from_u32(0x969696),
    Color::from_u32(0xbdbdbd),
    Color::from_u32(0xd9d9d9),
];

/// Cyclic series palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: CATEGORY20C.to_vec(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> ChartResult<Self> {
        if colors.is_empty() {
            return Err(ChartError::InvalidConfig(
                "palette must contain at least one color".to_owned(),
            ));
        }
        Ok(Self { colors })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color for the series at `index`, wrapping around the palette.
    #[must_use]
    pub fn color_at(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return CATEGORY20C[index % CATEGORY20C.len()];
        }
        self.colors[index % self.colors.len()]
    }

    /// Explicit series color when present, palette color otherwise.
    #[must_use]
    pub fn resolve(&self, explicit: Option<Color>, index: usize) -> Color {
        explicit.unwrap_or_else(|| self.color_at(index))
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = ChartError;

    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
