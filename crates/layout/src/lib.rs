//! Layout engine: turns a list of flowables into pages of positioned
//! elements.
//!
//! The engine places content inside the page *frame* (the area within the
//! margins), breaking paragraphs between lines and tables between rows.
//! Nothing here writes PDF; renderers consume the resulting [`LaidOutPage`]s.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Element has a height of {0:.2} which exceeds the available frame height of {1:.2}.")]
    ElementTooLarge(f32, f32),
    #[error("Table is {0:.2}pt wide but the frame is only {1:.2}pt wide.")]
    TooWide(f32, f32),
    #[error("Table row {row} has {found} cells, expected {expected}.")]
    RaggedTable {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("Invalid column width {width} for column {column}.")]
    InvalidColumnWidth { column: usize, width: f32 },
    #[error("Page frame {width:.2}x{height:.2} leaves no room for content.")]
    EmptyFrame { width: f32, height: f32 },
    #[error("Failed to read font file '{path}': {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse font '{name}': {reason}")]
    FontParse { name: String, reason: String },
}

pub mod algorithms;
pub mod canvas;
pub mod elements;
pub mod engine;
pub mod flowable;
pub mod fonts;
pub mod page;
pub mod text;

pub use self::canvas::PageCanvas;
pub use self::elements::{
    ImageElement, LayoutElement, LineElement, PositionedElement, RectElement, TextElement,
};
pub use self::engine::LayoutEngine;
pub use self::flowable::{Flowable, Paragraph, Table};
pub use self::fonts::{FontFace, FontLibrary, TextMeasurer};
pub use self::page::{LaidOutPage, PageGeometry, PageInfo};

pub use tpt_types::{Rect, Size};

#[cfg(test)]
mod test_utils;
