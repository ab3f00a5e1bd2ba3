use crate::elements::PositionedElement;
use tpt_style::{Margins, PageSize};
use tpt_types::Rect;

/// Page dimensions and margins. The frame is the area inside the margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    width: f32,
    height: f32,
    margins: Margins,
}

impl PageGeometry {
    pub fn new(page_size: PageSize, margins: Margins) -> Self {
        let (width, height) = page_size.dimensions_pt();
        Self {
            width,
            height,
            margins,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn frame(&self) -> Rect {
        Rect::new(
            self.margins.left,
            self.margins.top,
            self.width - self.margins.left - self.margins.right,
            self.height - self.margins.top - self.margins.bottom,
        )
    }
}

/// What a page hook knows about the page being decorated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    /// 1-based.
    pub page_number: usize,
    pub page_count: usize,
    pub geometry: PageGeometry,
}

impl PageInfo {
    pub fn is_first(&self) -> bool {
        self.page_number == 1
    }

    pub fn is_last(&self) -> bool {
        self.page_number == self.page_count
    }

    pub fn page_size(&self) -> (f32, f32) {
        self.geometry.size()
    }

    pub fn frame(&self) -> Rect {
        self.geometry.frame()
    }
}

/// The positioned content of one page, produced by the layout engine.
#[derive(Debug, Clone, Default)]
pub struct LaidOutPage {
    pub elements: Vec<PositionedElement>,
}

impl LaidOutPage {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Text content of the page, one entry per line element, in layout order.
    pub fn text_lines(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match &e.element {
                crate::LayoutElement::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }
}
