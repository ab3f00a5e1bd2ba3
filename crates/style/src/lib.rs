//! Style primitives for the report layout engine.
//!
//! Styles are immutable value objects. They are validated when built and
//! shared as `Arc`s through the [`StyleRegistry`], which hands them out by
//! stable name.

pub mod dimension;
pub mod error;
pub mod font;
pub mod paragraph;
pub mod registry;
pub mod table;
pub mod text;

pub use dimension::{Margins, PageSize};
pub use error::StyleError;
pub use font::FontWeight;
pub use paragraph::{ParagraphStyle, ParagraphStyleBuilder};
pub use registry::StyleRegistry;
pub use table::TableStyle;
pub use text::TextAlign;
pub use tpt_types::Color;
