//! PDF output for laid-out report pages.
//!
//! [`LopdfRenderer`] paginates flowables with the layout engine, lets a
//! single `on_page` hook decorate every page, and writes the result with
//! embedded TrueType fonts and PNG images.

mod embed;
mod error;
mod page;
mod renderer;

pub use embed::ImageResource;
pub use error::RenderError;
pub use renderer::{DocumentInfo, LopdfRenderer, PageHook};
