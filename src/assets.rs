//! Branding and font files needed to compose a report.

use crate::config::ReportConfig;
use crate::ReportError;
use std::path::Path;
use tpt_layout::{FontFace, FontLibrary, LayoutError};
use tpt_style::FontWeight;

/// Assets are loaded eagerly so a missing file is reported before the
/// output file is opened.
#[derive(Debug, Clone)]
pub struct ReportAssets {
    pub fonts: FontLibrary,
    pub logo: Vec<u8>,
}

impl ReportAssets {
    pub fn load(config: &ReportConfig) -> Result<Self, ReportError> {
        let mut fonts = FontLibrary::new();
        for (path, weight) in [
            (config.regular_font_path(), FontWeight::Regular),
            (config.bold_font_path(), FontWeight::Bold),
        ] {
            let face = FontFace::load(&path, config.font_family.clone(), weight)
                .map_err(|e| asset_error(&path, e))?;
            log::debug!("Loaded font {} from {}", face.postscript_name(), path.display());
            fonts.add(face);
        }

        let logo_path = config.logo_path();
        let logo = std::fs::read(&logo_path).map_err(|e| ReportError::Asset {
            path: logo_path.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("Loaded logo {} ({} bytes)", logo_path.display(), logo.len());

        Ok(Self { fonts, logo })
    }
}

fn asset_error(path: &Path, err: LayoutError) -> ReportError {
    let reason = match err {
        LayoutError::FontRead { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    ReportError::Asset {
        path: path.to_path_buf(),
        reason,
    }
}
