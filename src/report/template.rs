//! The document template: page geometry, decoration, and a flowable list
//! that is rendered to its destination exactly once.

use crate::ReportError;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tpt_layout::{Flowable, FontLibrary, PageCanvas, PageGeometry, PageInfo};
use tpt_render_lopdf::{DocumentInfo, LopdfRenderer};
use tpt_style::{Color, ParagraphStyle};
use tpt_types::{Rect, Size};

pub const LOGO_KEY: &str = "logo";

const FOOTER_RULE_COLOR: Color = Color::gray(0x99);
const FOOTER_RULE_WIDTH: f32 = 0.5;
/// Distance from the bottom of the frame to the footer rule.
const FOOTER_GAP: f32 = 12.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("The document has already been rendered")]
    AlreadyRendered,
    #[error("The document has no content to render")]
    NoContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateState {
    Created,
    Building,
    Rendered,
}

/// A logo image and the width, in points, it is drawn at.
#[derive(Debug, Clone)]
pub struct Logo {
    pub bytes: Vec<u8>,
    pub width: f32,
}

/// What is drawn on every page besides the flowables.
#[derive(Debug, Clone)]
pub struct PageDecoration {
    pub footer_style: Arc<ParagraphStyle>,
    /// Left footer text, e.g. `Generated 2024-01-31`.
    pub footer_text: String,
    pub logo: Option<Logo>,
}

/// Draws the footer on every page and the logo on the first page.
/// `logo_size` is the logo's drawn size in points, if there is one.
pub fn decorate_page(
    decoration: &PageDecoration,
    logo_size: Option<Size>,
    info: &PageInfo,
    canvas: &mut PageCanvas<'_>,
) {
    let (page_width, _) = info.page_size();
    let frame = info.frame();
    let style = &decoration.footer_style;

    let rule_y = frame.bottom() + FOOTER_GAP;
    canvas.draw_line(
        (frame.x, rule_y),
        (frame.right(), rule_y),
        FOOTER_RULE_COLOR,
        FOOTER_RULE_WIDTH,
    );
    let text_y = rule_y + 4.0;
    canvas.draw_string(frame.x, text_y, &decoration.footer_text, style);
    canvas.draw_right_string(
        frame.right(),
        text_y,
        &format!("Page {} of {}", info.page_number, info.page_count),
        style,
    );

    if info.is_first()
        && let Some(size) = logo_size
    {
        let margins = info.geometry.margins();
        let x = page_width - margins.right - size.width;
        let y = ((margins.top - size.height) / 2.0).max(0.0);
        canvas.draw_image(LOGO_KEY, Rect::new(x, y, size.width, size.height));
    }
}

/// Owns the destination and the content of one PDF.
///
/// `Created` until content is added, `Building` while flowables are being
/// appended, and `Rendered` once [`build`](Self::build) has written the file.
/// A rendered template accepts no further changes.
#[derive(Debug)]
pub struct ReportDocTemplate {
    filename: PathBuf,
    geometry: PageGeometry,
    fonts: FontLibrary,
    decoration: Option<PageDecoration>,
    info: DocumentInfo,
    flowables: Vec<Flowable>,
    state: TemplateState,
    page_count: Option<usize>,
}

impl ReportDocTemplate {
    pub fn new(filename: impl Into<PathBuf>, geometry: PageGeometry) -> Self {
        Self {
            filename: filename.into(),
            geometry,
            fonts: FontLibrary::new(),
            decoration: None,
            info: DocumentInfo::default(),
            flowables: Vec::new(),
            state: TemplateState::Created,
            page_count: None,
        }
    }

    pub fn with_fonts(mut self, fonts: FontLibrary) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_decoration(mut self, decoration: PageDecoration) -> Self {
        self.decoration = Some(decoration);
        self
    }

    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }

    pub fn add_flowables(&mut self, flowables: Vec<Flowable>) -> Result<(), TemplateError> {
        if self.state == TemplateState::Rendered {
            return Err(TemplateError::AlreadyRendered);
        }
        self.flowables.extend(flowables);
        self.state = TemplateState::Building;
        Ok(())
    }

    /// Lays out the flowables and writes the PDF.
    ///
    /// The file is written next to its destination under a temporary name
    /// and moved into place only once complete. On error the template keeps
    /// its state and content, and no file appears at the destination.
    pub fn build(&mut self) -> Result<(), ReportError> {
        if self.state == TemplateState::Rendered {
            return Err(TemplateError::AlreadyRendered.into());
        }
        if self.flowables.is_empty() {
            return Err(TemplateError::NoContent.into());
        }

        let renderer = self.renderer()?;
        let pages = renderer.paginate(&self.flowables)?;

        let mut file = tempfile::Builder::new()
            .prefix(".tpt-report-")
            .suffix(".pdf.part")
            .tempfile_in(destination_dir(&self.filename))?;
        let page_count = {
            let mut writer = BufWriter::new(file.as_file_mut());
            let page_count = renderer.render_pages(pages, &mut writer)?;
            writer.flush()?;
            page_count
        };
        file.as_file().sync_all()?;
        file.persist(&self.filename).map_err(|e| e.error)?;

        log::info!("Wrote {} ({} pages)", self.filename.display(), page_count);
        self.flowables.clear();
        self.page_count = Some(page_count);
        self.state = TemplateState::Rendered;
        Ok(())
    }

    fn renderer(&self) -> Result<LopdfRenderer, ReportError> {
        let mut renderer =
            LopdfRenderer::new(self.geometry, self.fonts.clone()).with_info(self.info.clone());

        if let Some(decoration) = &self.decoration {
            let logo_size = match &decoration.logo {
                Some(logo) => {
                    let (px_width, px_height) = renderer.register_image(LOGO_KEY, &logo.bytes)?;
                    let height = if px_width == 0 {
                        0.0
                    } else {
                        logo.width * px_height as f32 / px_width as f32
                    };
                    Some(Size::new(logo.width, height))
                }
                None => None,
            };
            let decoration = decoration.clone();
            renderer = renderer.on_page(move |info, canvas| {
                decorate_page(&decoration, logo_size, info, canvas);
                Ok(())
            });
        }
        Ok(renderer)
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn page_size(&self) -> (f32, f32) {
        self.geometry.size()
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn state(&self) -> TemplateState {
        self.state
    }

    pub fn flowables(&self) -> &[Flowable] {
        &self.flowables
    }

    /// Number of pages written, once rendered.
    pub fn page_count(&self) -> Option<usize> {
        self.page_count
    }
}

fn destination_dir(filename: &Path) -> &Path {
    match filename.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
