//! Drawing surface handed to page hooks and used by the layout engine.

use crate::elements::{
    ImageElement, LayoutElement, LineElement, PositionedElement, RectElement, TextElement,
};
use crate::fonts::TextMeasurer;
use std::sync::Arc;
use tpt_style::ParagraphStyle;
use tpt_types::{Color, Rect};

/// Collects positioned elements for one page.
///
/// Positions are in page space (top-left origin). Text positions name the
/// top of the line box.
pub struct PageCanvas<'a> {
    measurer: &'a dyn TextMeasurer,
    elements: Vec<PositionedElement>,
}

impl<'a> PageCanvas<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            measurer,
            elements: Vec::new(),
        }
    }

    pub fn text_width(&self, text: &str, style: &ParagraphStyle) -> f32 {
        self.measurer.text_width(text, style)
    }

    /// Draws `text` with its left edge at `x`. Returns the drawn width.
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str, style: &Arc<ParagraphStyle>) -> f32 {
        let width = self.text_width(text, style);
        self.push_text(x, y, width, text, style);
        width
    }

    /// Draws `text` with its right edge at `x`.
    pub fn draw_right_string(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        style: &Arc<ParagraphStyle>,
    ) -> f32 {
        let width = self.text_width(text, style);
        self.push_text(x - width, y, width, text, style);
        width
    }

    /// Draws `text` centred on `x`.
    pub fn draw_centred_string(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        style: &Arc<ParagraphStyle>,
    ) -> f32 {
        let width = self.text_width(text, style);
        self.push_text(x - width / 2.0, y, width, text, style);
        width
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.draw_rect(
            rect,
            RectElement {
                fill: Some(color),
                ..Default::default()
            },
        );
    }

    pub fn draw_rect(&mut self, rect: Rect, style: RectElement) {
        self.elements
            .push(PositionedElement::new(rect, LayoutElement::Rectangle(style)));
    }

    pub fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, thickness: f32) {
        let rect = Rect::new(from.0, from.1, to.0 - from.0, to.1 - from.1);
        self.elements.push(PositionedElement::new(
            rect,
            LayoutElement::Line(LineElement { color, thickness }),
        ));
    }

    pub fn draw_image(&mut self, key: impl Into<String>, rect: Rect) {
        self.elements.push(PositionedElement::new(
            rect,
            LayoutElement::Image(ImageElement { key: key.into() }),
        ));
    }

    pub fn elements(&self) -> &[PositionedElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_elements(self) -> Vec<PositionedElement> {
        self.elements
    }

    fn push_text(&mut self, x: f32, y: f32, width: f32, text: &str, style: &Arc<ParagraphStyle>) {
        self.elements.push(PositionedElement {
            x,
            y,
            width,
            height: style.leading(),
            element: LayoutElement::Text(TextElement {
                content: text.to_string(),
                style: style.clone(),
            }),
        });
    }
}
