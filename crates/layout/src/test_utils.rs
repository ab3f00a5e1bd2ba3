use crate::fonts::TextMeasurer;
use std::sync::Arc;
use tpt_style::{Margins, PageSize, ParagraphStyle};
use crate::page::PageGeometry;

/// Every character is half the font size wide.
pub struct FixedWidthMeasurer;

impl TextMeasurer for FixedWidthMeasurer {
    fn text_width(&self, text: &str, style: &ParagraphStyle) -> f32 {
        text.chars().count() as f32 * style.font_size() * 0.5
    }
}

/// A style whose leading equals its font size, which keeps line arithmetic
/// in tests exact.
pub fn style(name: &str, size: f32) -> Arc<ParagraphStyle> {
    Arc::new(
        ParagraphStyle::builder(name)
            .font_size(size)
            .leading(size)
            .build()
            .expect("test style is valid"),
    )
}

/// A page whose frame is `width` x `height` points.
pub fn frame_geometry(width: f32, height: f32) -> PageGeometry {
    PageGeometry::new(
        PageSize::Custom {
            width: width + 20.0,
            height: height + 20.0,
        },
        Margins::all(10.0),
    )
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
