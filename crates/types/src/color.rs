use serde::{de, Deserialize, Deserializer, Serialize};

/// An opaque RGB color.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(value: u8) -> Self {
        Self { r: value, g: value, b: value }
    }

    /// Components scaled to the `0.0..=1.0` range used by PDF color operators.
    pub fn to_unit_rgb(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Parse a hex color string (#RGB or #RRGGBB format)
    pub fn parse_hex(s: &str) -> Result<Color, String> {
        let s = s.trim();
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with #, got: {}", s))?;

        let component = |digits: &str, name: &str| {
            u8::from_str_radix(digits, 16).map_err(|e| format!("Invalid {} component: {}", name, e))
        };

        match hex.len() {
            3 => Ok(Color {
                r: component(&hex[0..1].repeat(2), "red")?,
                g: component(&hex[1..2].repeat(2), "green")?,
                b: component(&hex[2..3].repeat(2), "blue")?,
            }),
            6 => Ok(Color {
                r: component(&hex[0..2], "red")?,
                g: component(&hex[2..4], "green")?,
                b: component(&hex[4..6], "blue")?,
            }),
            _ => Err(format!(
                "Invalid hex color length: expected 3 or 6, got {}",
                hex.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorDef {
            Str(String),
            Map { r: u8, g: u8, b: u8 },
        }

        match ColorDef::deserialize(deserializer)? {
            ColorDef::Str(s) => Self::parse_hex(&s).map_err(de::Error::custom),
            ColorDef::Map { r, g, b } => Ok(Color { r, g, b }),
        }
    }
}
