use crate::error::StyleError;
use serde::{Deserialize, Serialize};
use tpt_types::Color;

/// Visual treatment of a table: header fill, row banding, grid, and padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableStyle {
    pub header_background: Option<Color>,
    /// Backgrounds cycled over body rows; empty disables banding.
    pub band_colors: Vec<Color>,
    pub grid_color: Color,
    /// Grid line width in points; `0.0` disables the grid.
    pub grid_width: f32,
    pub cell_padding: f32,
    /// Repeat the first row at the top of every page the table continues on.
    pub repeat_header: bool,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_background: Some(Color::rgb(0x00, 0x33, 0x66)),
            band_colors: vec![Color::WHITE, Color::gray(0xEE)],
            grid_color: Color::gray(0x99),
            grid_width: 0.5,
            cell_padding: 4.0,
            repeat_header: true,
        }
    }
}

impl TableStyle {
    pub fn validate(&self) -> Result<(), StyleError> {
        if !self.grid_width.is_finite() || self.grid_width < 0.0 {
            return Err(StyleError::InvalidTableStyle(format!(
                "grid width must be non-negative, got {}",
                self.grid_width
            )));
        }
        if !self.cell_padding.is_finite() || self.cell_padding < 0.0 {
            return Err(StyleError::InvalidTableStyle(format!(
                "cell padding must be non-negative, got {}",
                self.cell_padding
            )));
        }
        Ok(())
    }

    /// Background for the body row at `index` (0-based, header excluded).
    pub fn band_for_row(&self, index: usize) -> Option<Color> {
        if self.band_colors.is_empty() {
            None
        } else {
            Some(self.band_colors[index % self.band_colors.len()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_alternate() {
        let style = TableStyle::default();
        assert_eq!(style.band_for_row(0), Some(Color::WHITE));
        assert_eq!(style.band_for_row(1), Some(Color::gray(0xEE)));
        assert_eq!(style.band_for_row(2), Some(Color::WHITE));
        let plain = TableStyle {
            band_colors: vec![],
            ..TableStyle::default()
        };
        assert_eq!(plain.band_for_row(3), None);
    }

    #[test]
    fn negative_padding_is_rejected() {
        let style = TableStyle {
            cell_padding: -1.0,
            ..TableStyle::default()
        };
        assert!(style.validate().is_err());
    }
}
