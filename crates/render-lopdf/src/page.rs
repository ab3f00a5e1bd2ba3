//! Conversion of positioned elements into a page content stream.

use crate::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::collections::HashMap;
use std::sync::Arc;
use tpt_layout::text::encode_win_ansi;
use tpt_layout::{FontLibrary, LayoutElement, PositionedElement};
use tpt_style::ParagraphStyle;
use tpt_types::Color;

/// Resource name of the standard font used when the library is empty.
pub(crate) const FALLBACK_FONT_RESOURCE: &str = "F1";

pub(crate) struct PageContext<'a> {
    page_height: f32,
    content: Content,
    state: PageRenderState,
    fonts: &'a FontLibrary,
    /// Resource names indexed like the library's faces.
    font_resources: &'a [String],
    image_resources: &'a HashMap<String, String>,
}

#[derive(Default, Clone, PartialEq)]
struct PageRenderState {
    font_name: String,
    font_size: f32,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
}

impl<'a> PageContext<'a> {
    pub(crate) fn new(
        page_height: f32,
        fonts: &'a FontLibrary,
        font_resources: &'a [String],
        image_resources: &'a HashMap<String, String>,
    ) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: Default::default(),
            fonts,
            font_resources,
            image_resources,
        }
    }

    pub(crate) fn finish(self) -> Content {
        self.content
    }

    pub(crate) fn draw_element(&mut self, el: &PositionedElement) -> Result<(), RenderError> {
        match &el.element {
            LayoutElement::Text(text) => self.draw_text(&text.content, &text.style, el),
            LayoutElement::Rectangle(rect) => {
                let y = self.page_height - (el.y + el.height);
                let operands = vec![el.x.into(), y.into(), el.width.into(), el.height.into()];
                match (rect.fill, rect.stroke) {
                    (Some(fill), Some(stroke)) => {
                        self.set_fill_color(fill);
                        self.set_stroke(stroke, rect.stroke_width);
                        self.push("re", operands);
                        self.push("B", vec![]);
                    }
                    (Some(fill), None) => {
                        self.set_fill_color(fill);
                        self.push("re", operands);
                        self.push("f", vec![]);
                    }
                    (None, Some(stroke)) => {
                        self.set_stroke(stroke, rect.stroke_width);
                        self.push("re", operands);
                        self.push("S", vec![]);
                    }
                    (None, None) => {}
                }
                Ok(())
            }
            LayoutElement::Line(line) => {
                self.set_stroke(line.color, line.thickness);
                let y1 = self.page_height - el.y;
                let y2 = self.page_height - (el.y + el.height);
                self.push("m", vec![el.x.into(), y1.into()]);
                self.push("l", vec![(el.x + el.width).into(), y2.into()]);
                self.push("S", vec![]);
                Ok(())
            }
            LayoutElement::Image(image) => {
                let name = self
                    .image_resources
                    .get(&image.key)
                    .ok_or_else(|| RenderError::UnknownImage(image.key.clone()))?;
                let y = self.page_height - (el.y + el.height);
                self.push("q", vec![]);
                self.push(
                    "cm",
                    vec![
                        el.width.into(),
                        0.into(),
                        0.into(),
                        el.height.into(),
                        el.x.into(),
                        y.into(),
                    ],
                );
                self.push("Do", vec![Object::Name(name.as_bytes().to_vec())]);
                self.push("Q", vec![]);
                Ok(())
            }
        }
    }

    fn draw_text(
        &mut self,
        content: &str,
        style: &Arc<ParagraphStyle>,
        el: &PositionedElement,
    ) -> Result<(), RenderError> {
        if content.trim().is_empty() {
            return Ok(());
        }
        let encoded = encode_win_ansi(content);
        if encoded.contains(&b'?') && !content.contains('?') {
            log::warn!("Text '{}' contains characters outside WinAnsi; replaced with '?'", content);
        }

        self.push("BT", vec![]);
        self.set_font(style);
        self.set_fill_color(style.color());
        let baseline_y = el.y + style.font_size() * 0.8;
        let pdf_y = self.page_height - baseline_y;
        self.push("Td", vec![el.x.into(), pdf_y.into()]);
        self.push("Tj", vec![Object::String(encoded, StringFormat::Literal)]);
        self.push("ET", vec![]);
        Ok(())
    }

    fn font_resource(&self, style: &ParagraphStyle) -> &str {
        self.fonts
            .resolve_style_index(style)
            .and_then(|index| self.font_resources.get(index))
            .map(String::as_str)
            .unwrap_or(FALLBACK_FONT_RESOURCE)
    }

    fn set_font(&mut self, style: &ParagraphStyle) {
        let resource = self.font_resource(style).to_string();
        if self.state.font_name != resource || self.state.font_size != style.font_size() {
            self.push(
                "Tf",
                vec![
                    Object::Name(resource.as_bytes().to_vec()),
                    style.font_size().into(),
                ],
            );
            self.state.font_name = resource;
            self.state.font_size = style.font_size();
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            let [r, g, b] = color.to_unit_rgb();
            self.push("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        if self.state.line_width != Some(width) {
            self.push("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
        if self.state.stroke_color != Some(color) {
            let [r, g, b] = color.to_unit_rgb();
            self.push("RG", vec![r.into(), g.into(), b.into()]);
            self.state.stroke_color = Some(color);
        }
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpt_layout::{PageCanvas, RectElement};
    use tpt_types::Rect;

    fn operators(content: &Content) -> Vec<&str> {
        content.operations.iter().map(|op| op.operator.as_str()).collect()
    }

    #[test]
    fn text_is_flipped_to_pdf_space_with_fallback_font() {
        let fonts = FontLibrary::new();
        let resources = HashMap::new();
        let style = Arc::new(ParagraphStyle::builder("body").font_size(10.0).build().unwrap());
        let mut canvas = PageCanvas::new(&fonts);
        canvas.draw_string(72.0, 100.0, "Blocked", &style);

        let mut ctx = PageContext::new(792.0, &fonts, &[], &resources);
        for el in canvas.elements() {
            ctx.draw_element(el).unwrap();
        }
        let content = ctx.finish();

        assert_eq!(operators(&content), vec!["BT", "Tf", "rg", "Td", "Tj", "ET"]);
        let td = &content.operations[3];
        assert!((td.operands[1].as_f32().unwrap() - (792.0 - 108.0)).abs() < 0.01);
        assert_eq!(content.operations[1].operands[0].as_name().unwrap(), b"F1");
    }

    #[test]
    fn repeated_colours_are_not_re_emitted() {
        let fonts = FontLibrary::new();
        let resources = HashMap::new();
        let mut canvas = PageCanvas::new(&fonts);
        canvas.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        canvas.fill_rect(Rect::new(0.0, 10.0, 10.0, 10.0), Color::WHITE);
        canvas.draw_rect(
            Rect::new(0.0, 20.0, 10.0, 10.0),
            RectElement {
                fill: Some(Color::BLACK),
                stroke: Some(Color::BLACK),
                stroke_width: 0.5,
            },
        );

        let mut ctx = PageContext::new(100.0, &fonts, &[], &resources);
        for el in canvas.elements() {
            ctx.draw_element(el).unwrap();
        }

        assert_eq!(
            operators(&ctx.finish()),
            vec!["rg", "re", "f", "re", "f", "rg", "w", "RG", "re", "B"]
        );
    }

    #[test]
    fn unregistered_image_is_an_error() {
        let fonts = FontLibrary::new();
        let resources = HashMap::new();
        let mut canvas = PageCanvas::new(&fonts);
        canvas.draw_image("logo", Rect::new(0.0, 0.0, 10.0, 10.0));

        let mut ctx = PageContext::new(100.0, &fonts, &[], &resources);
        let err = ctx.draw_element(&canvas.elements()[0]).unwrap_err();
        assert!(matches!(err, RenderError::UnknownImage(key) if key == "logo"));
    }
}
