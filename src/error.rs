use crate::report::table::TableError;
use crate::report::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;
use tpt_layout::LayoutError;
use tpt_render_lopdf::RenderError;
use tpt_style::StyleError;

/// Every way producing a report can fail.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Invalid report data: {0}")]
    Schema(String),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rendering failed: {0}")]
    Render(RenderError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Document template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Missing or unreadable asset '{path}': {reason}")]
    Asset { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RenderError> for ReportError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Layout(e) => ReportError::Layout(e),
            RenderError::Io(e) => ReportError::Io(e),
            other => ReportError::Render(other),
        }
    }
}
