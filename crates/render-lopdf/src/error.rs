use thiserror::Error;
use tpt_layout::LayoutError;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Failed to decode image '{key}': {reason}")]
    Image { key: String, reason: String },
    #[error("Image '{0}' was drawn but never registered")]
    UnknownImage(String),
    #[error("Page decoration failed: {0}")]
    Decoration(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}
