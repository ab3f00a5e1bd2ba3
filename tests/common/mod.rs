pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A PDF read back from disk, with helpers for assertions.
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Strings shown on `page` (1-based), one per text element.
    pub fn page_strings(&self, page: u32) -> Vec<String> {
        pdf_assertions::page_strings(&self.doc, page)
    }

    pub fn all_strings(&self) -> Vec<String> {
        (1..=self.page_count() as u32)
            .flat_map(|page| self.page_strings(page))
            .collect()
    }
}
