//! Report configuration: page geometry, asset locations, and composition
//! knobs. Every field has a default, so an empty JSON object is a valid
//! configuration file.

use crate::ReportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tpt_layout::PageGeometry;
use tpt_style::paragraph::DEFAULT_FONT_FAMILY;
use tpt_style::{Margins, PageSize};

/// Overrides the directory that holds the logo and font files.
pub const ASSET_DIR_ENV: &str = "TPT_REPORTS_ASSET_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub page_size: PageSize,
    pub margins: Margins,
    pub asset_dir: PathBuf,
    /// Relative paths are resolved against `asset_dir`.
    pub logo_file: PathBuf,
    pub regular_font_file: PathBuf,
    pub bold_font_file: PathBuf,
    pub font_family: String,
    /// Width of the first-page logo in points.
    pub logo_width: f32,
    /// Summaries with more rows than this start the detail table on a new page.
    pub summary_page_break_rows: usize,
    pub author: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margins: Margins {
                top: 54.0,
                right: 36.0,
                bottom: 54.0,
                left: 36.0,
            },
            asset_dir: default_asset_dir(),
            logo_file: PathBuf::from("tpt_logo.png"),
            regular_font_file: PathBuf::from("fonts/DejaVuSans.ttf"),
            bold_font_file: PathBuf::from("fonts/DejaVuSans-Bold.ttf"),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            logo_width: 120.0,
            summary_page_break_rows: 12,
            author: "Cybersecurity and Infrastructure Security Agency".to_string(),
        }
    }
}

fn default_asset_dir() -> PathBuf {
    match std::env::var_os(ASSET_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")),
    }
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: ReportConfig = serde_json::from_str(&text)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        log::debug!("Loaded report configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        let (width, height) = self.page_size.dimensions_pt();
        let m = self.margins;
        if [m.top, m.right, m.bottom, m.left]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ReportError::Config(format!("margins must be non-negative, got {:?}", m)));
        }
        if m.left + m.right >= width || m.top + m.bottom >= height {
            return Err(ReportError::Config(format!(
                "margins {:?} leave no room on a {}x{} page",
                m, width, height
            )));
        }
        if !self.logo_width.is_finite() || self.logo_width <= 0.0 {
            return Err(ReportError::Config(format!(
                "logo_width must be positive, got {}",
                self.logo_width
            )));
        }
        if self.font_family.trim().is_empty() {
            return Err(ReportError::Config("font_family must not be empty".into()));
        }
        Ok(())
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.page_size, self.margins)
    }

    pub fn logo_path(&self) -> PathBuf {
        self.asset_dir.join(&self.logo_file)
    }

    pub fn regular_font_path(&self) -> PathBuf {
        self.asset_dir.join(&self.regular_font_file)
    }

    pub fn bold_font_path(&self) -> PathBuf {
        self.asset_dir.join(&self.bold_font_file)
    }
}
