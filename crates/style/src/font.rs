use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// Returns the numeric weight value on the CSS 100-900 scale.
    pub fn numeric_value(&self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }

    /// Parse a font weight from a string (e.g., "bold", "400").
    /// Numeric weights of 600 and above map to bold.
    fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "regular" | "normal" => Ok(FontWeight::Regular),
            "bold" => Ok(FontWeight::Bold),
            _ => s
                .parse::<u16>()
                .map(Self::from_numeric)
                .map_err(|_| format!("Invalid font weight: '{}'", s)),
        }
    }

    fn from_numeric(n: u16) -> Self {
        if n >= 600 {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        }
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FontWeightDef {
            Str(String),
            Num(u16),
        }

        match FontWeightDef::deserialize(deserializer)? {
            FontWeightDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            FontWeightDef::Num(n) => Ok(Self::from_numeric(n)),
        }
    }
}
