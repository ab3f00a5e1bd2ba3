//! Page geometry: page sizes and margins, in PDF points.
use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

pub const POINTS_PER_INCH: f32 = 72.0;

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical margins of `vertical`, horizontal margins of `horizontal`.
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Parse a length value with optional unit (e.g., "10pt", "5mm", "0.5in", "12")
    pub fn parse_length(input: &str) -> Result<f32, String> {
        let input = input.trim();
        let (number, scale) = if let Some(val) = input.strip_suffix("pt") {
            (val, 1.0)
        } else if let Some(val) = input.strip_suffix("in") {
            (val, POINTS_PER_INCH)
        } else if let Some(val) = input.strip_suffix("cm") {
            (val, 28.35)
        } else if let Some(val) = input.strip_suffix("mm") {
            (val, 2.835)
        } else {
            (input, 1.0)
        };

        let value = number
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("Invalid number '{}': {}", number.trim(), e))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("Lengths must be non-negative, got '{}'", input));
        }
        Ok(value * scale)
    }

    /// Parse margin shorthand (1, 2, or 4 values)
    fn parse_shorthand(input: &str) -> Result<Self, String> {
        let values = input
            .split_whitespace()
            .map(Self::parse_length)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [vertical, horizontal] => Ok(Margins::symmetric(*vertical, *horizontal)),
            [top, right, bottom, left] => Ok(Margins {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(format!(
                "Invalid margin shorthand: expected 1, 2, or 4 values, got {}",
                values.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string like '36pt' or '0.75in 0.5in' or a map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Margins::parse_shorthand(value).map_err(E::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        other => {
                            return Err(de::Error::unknown_field(
                                other,
                                &["top", "right", "bottom", "left"],
                            ));
                        }
                    }
                }
                Ok(margins)
            }
        }
        deserializer.deserialize_any(MarginsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    A4,
    #[default]
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// Parse a page size name (e.g., "A4", "Letter", "Legal")
    fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => {
                if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
                    Ok(PageSize::Custom { width, height })
                } else {
                    Err(de::Error::custom(format!(
                        "Custom page size must be positive, got {}x{}",
                        width, height
                    )))
                }
            }
        }
    }
}
