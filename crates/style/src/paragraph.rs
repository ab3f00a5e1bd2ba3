//! Paragraph styles: font, size, leading, color, and alignment of a text block.

use crate::error::StyleError;
use crate::font::FontWeight;
use crate::text::TextAlign;
use tpt_types::Color;

pub const DEFAULT_FONT_FAMILY: &str = "DejaVu Sans";

/// An immutable, validated paragraph style. Construct through
/// [`ParagraphStyle::builder`] or derive from an existing style with
/// [`ParagraphStyle::derive`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    name: String,
    font_family: String,
    font_weight: FontWeight,
    font_size: f32,
    leading: f32,
    color: Color,
    alignment: TextAlign,
    space_before: f32,
    space_after: f32,
}

impl ParagraphStyle {
    pub fn builder(name: impl Into<String>) -> ParagraphStyleBuilder {
        ParagraphStyleBuilder {
            name: name.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_weight: FontWeight::Regular,
            font_size: 10.0,
            leading: None,
            color: Color::BLACK,
            alignment: TextAlign::Left,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    /// Starts a new style that inherits every property of `self`.
    pub fn derive(&self, name: impl Into<String>) -> ParagraphStyleBuilder {
        ParagraphStyleBuilder {
            name: name.into(),
            font_family: self.font_family.clone(),
            font_weight: self.font_weight,
            font_size: self.font_size,
            leading: Some(self.leading),
            color: self.color,
            alignment: self.alignment,
            space_before: self.space_before,
            space_after: self.space_after,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Distance between consecutive baselines.
    pub fn leading(&self) -> f32 {
        self.leading
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn alignment(&self) -> TextAlign {
        self.alignment
    }

    pub fn space_before(&self) -> f32 {
        self.space_before
    }

    pub fn space_after(&self) -> f32 {
        self.space_after
    }
}

#[derive(Debug, Clone)]
pub struct ParagraphStyleBuilder {
    name: String,
    font_family: String,
    font_weight: FontWeight,
    font_size: f32,
    leading: Option<f32>,
    color: Color,
    alignment: TextAlign,
    space_before: f32,
    space_after: f32,
}

impl ParagraphStyleBuilder {
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn bold(self) -> Self {
        self.font_weight(FontWeight::Bold)
    }

    /// Sets the font size. Leading defaults to 1.2 times the size unless set
    /// explicitly.
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn leading(mut self, leading: f32) -> Self {
        self.leading = Some(leading);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn alignment(mut self, alignment: TextAlign) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn space_before(mut self, space: f32) -> Self {
        self.space_before = space;
        self
    }

    pub fn space_after(mut self, space: f32) -> Self {
        self.space_after = space;
        self
    }

    pub fn build(self) -> Result<ParagraphStyle, StyleError> {
        if self.name.trim().is_empty() {
            return Err(StyleError::EmptyName);
        }
        if self.font_family.trim().is_empty() {
            return Err(StyleError::EmptyFontFamily(self.name));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(StyleError::InvalidFontSize {
                style: self.name,
                size: self.font_size,
            });
        }
        let leading = self.leading.unwrap_or(self.font_size * 1.2);
        if !leading.is_finite() || leading <= 0.0 {
            return Err(StyleError::InvalidLeading {
                style: self.name,
                leading,
            });
        }
        for value in [self.space_before, self.space_after] {
            if !value.is_finite() || value < 0.0 {
                return Err(StyleError::InvalidSpacing {
                    style: self.name,
                    value,
                });
            }
        }

        Ok(ParagraphStyle {
            name: self.name,
            font_family: self.font_family,
            font_weight: self.font_weight,
            font_size: self.font_size,
            leading,
            color: self.color,
            alignment: self.alignment,
            space_before: self.space_before,
            space_after: self.space_after,
        })
    }
}
