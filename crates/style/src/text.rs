use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

impl TextAlign {
    /// Horizontal offset of a line of `line_width` inside a box of `box_width`.
    pub fn offset(&self, line_width: f32, box_width: f32) -> f32 {
        let slack = (box_width - line_width).max(0.0);
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Right => slack,
            TextAlign::Center => slack / 2.0,
        }
    }
}
