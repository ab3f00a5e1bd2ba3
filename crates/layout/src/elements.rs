//! Drawable output of the layout process.
//!
//! Coordinates use a top-left origin with `y` growing downwards, in points.
//! Renderers flip them into PDF user space.

use std::sync::Arc;
use tpt_style::ParagraphStyle;
use tpt_types::{Color, Rect};

/// A single drawable item with its absolute position on the page.
#[derive(Clone, Debug)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

impl PositionedElement {
    pub fn new(rect: Rect, element: LayoutElement) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            element,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug)]
pub enum LayoutElement {
    Text(TextElement),
    Rectangle(RectElement),
    Line(LineElement),
    Image(ImageElement),
}

impl std::fmt::Display for LayoutElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutElement::Text(t) => write!(f, "Text(\"{}\")", t.content),
            LayoutElement::Rectangle(_) => write!(f, "Rectangle"),
            LayoutElement::Line(_) => write!(f, "Line"),
            LayoutElement::Image(i) => write!(f, "Image(key=\"{}\")", i.key),
        }
    }
}

/// One line of text. The element's `y` is the top of the line box; the
/// baseline sits at `y + font_size * 0.8`.
#[derive(Clone, Debug)]
pub struct TextElement {
    pub content: String,
    pub style: Arc<ParagraphStyle>,
}

/// A rectangle, filled and/or stroked.
#[derive(Clone, Debug, Default)]
pub struct RectElement {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

/// A straight line from `(x, y)` to `(x + width, y + height)`.
#[derive(Clone, Debug)]
pub struct LineElement {
    pub color: Color,
    pub thickness: f32,
}

/// An image registered with the renderer under `key`, scaled to the
/// element's box.
#[derive(Clone, Debug)]
pub struct ImageElement {
    pub key: String,
}
