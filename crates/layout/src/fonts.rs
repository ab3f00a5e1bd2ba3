//! Font loading and text measurement.
//!
//! Faces are parsed once with `ttf_parser` and reduced to the metrics the
//! layout engine and the PDF writer need: per-byte advances over the WinAnsi
//! code page, vertical metrics and the bounding box. The raw font program is
//! kept so renderers can embed it.

use crate::LayoutError;
use crate::text::encoding::{encode_win_ansi, win_ansi_to_char};
use std::path::Path;
use std::sync::Arc;
use tpt_style::{FontWeight, ParagraphStyle};

/// Measures rendered text widths in points.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, style: &ParagraphStyle) -> f32;
}

/// Advance used for every byte when no font is available, in 1/1000 em.
const FALLBACK_ADVANCE: u16 = 500;

/// A parsed TrueType face with the metrics needed for WinAnsi text.
pub struct FontFace {
    postscript_name: String,
    family: String,
    weight: FontWeight,
    data: Arc<Vec<u8>>,
    units_per_em: u16,
    advances: Vec<u16>,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("postscript_name", &self.postscript_name)
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FontFace {
    pub fn from_bytes(
        family: impl Into<String>,
        weight: FontWeight,
        data: Vec<u8>,
    ) -> Result<Self, LayoutError> {
        let family = family.into();
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| LayoutError::FontParse {
            name: family.clone(),
            reason: e.to_string(),
        })?;

        // Mac Roman name records do not decode, so keep looking for a Unicode one.
        let postscript_name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .unwrap_or_else(|| fallback_postscript_name(&family, weight));

        let missing_advance = face
            .glyph_index(' ')
            .and_then(|g| face.glyph_hor_advance(g))
            .unwrap_or(face.units_per_em() / 2);

        let advances = (0u8..=255)
            .map(|byte| {
                win_ansi_to_char(byte)
                    .and_then(|c| face.glyph_index(c))
                    .and_then(|g| face.glyph_hor_advance(g))
                    .unwrap_or(missing_advance)
            })
            .collect();

        let bbox = face.global_bounding_box();
        let ascent = face.ascender();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let units_per_em = face.units_per_em();
        let descent = face.descender();
        let bbox = [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max];

        log::debug!(
            "Loaded font '{}' ({}, weight {}), {} units/em",
            postscript_name,
            family,
            weight.numeric_value(),
            units_per_em
        );

        Ok(Self {
            postscript_name,
            family,
            weight,
            data: Arc::new(data),
            units_per_em,
            advances,
            ascent,
            descent,
            cap_height,
            bbox,
        })
    }

    pub fn load(
        path: impl AsRef<Path>,
        family: impl Into<String>,
        weight: FontWeight,
    ) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| LayoutError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(family, weight, data)
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// The raw font program.
    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    /// Advance of a WinAnsi byte in 1/1000 em, the unit PDF `Widths` use.
    pub fn advance_1000(&self, byte: u8) -> f32 {
        self.scale_1000(self.advances[byte as usize] as f32)
    }

    pub fn ascent_1000(&self) -> f32 {
        self.scale_1000(self.ascent as f32)
    }

    pub fn descent_1000(&self) -> f32 {
        self.scale_1000(self.descent as f32)
    }

    pub fn cap_height_1000(&self) -> f32 {
        self.scale_1000(self.cap_height as f32)
    }

    pub fn bbox_1000(&self) -> [f32; 4] {
        self.bbox.map(|v| self.scale_1000(v as f32))
    }

    /// Width of `text` at `font_size`, measured over its WinAnsi encoding.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = encode_win_ansi(text)
            .into_iter()
            .map(|b| self.advance_1000(b))
            .sum();
        units * font_size / 1000.0
    }

    fn scale_1000(&self, value: f32) -> f32 {
        value * 1000.0 / self.units_per_em.max(1) as f32
    }
}

fn fallback_postscript_name(family: &str, weight: FontWeight) -> String {
    let base = family.replace(' ', "");
    match weight {
        FontWeight::Bold => format!("{base}-Bold"),
        FontWeight::Regular => base,
    }
}

/// The set of faces available to a document.
#[derive(Debug, Default, Clone)]
pub struct FontLibrary {
    faces: Vec<Arc<FontFace>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, face: FontFace) -> Arc<FontFace> {
        let face = Arc::new(face);
        self.faces.push(face.clone());
        face
    }

    pub fn faces(&self) -> &[Arc<FontFace>] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Finds the face for a family and weight.
    ///
    /// Family names compare case-insensitively. When the exact weight is
    /// missing the other weight of the same family is used, then the first
    /// registered face.
    pub fn resolve(&self, family: &str, weight: FontWeight) -> Option<&Arc<FontFace>> {
        self.resolve_index(family, weight).map(|i| &self.faces[i])
    }

    /// Like [`resolve`](Self::resolve), but returns the face's position in
    /// registration order.
    pub fn resolve_index(&self, family: &str, weight: FontWeight) -> Option<usize> {
        let same_family = |f: &Arc<FontFace>| f.family.eq_ignore_ascii_case(family);
        self.faces
            .iter()
            .position(|f| same_family(f) && f.weight == weight)
            .or_else(|| self.faces.iter().position(same_family))
            .or_else(|| (!self.faces.is_empty()).then_some(0))
    }

    pub fn resolve_style(&self, style: &ParagraphStyle) -> Option<&Arc<FontFace>> {
        self.resolve(style.font_family(), style.font_weight())
    }

    pub fn resolve_style_index(&self, style: &ParagraphStyle) -> Option<usize> {
        self.resolve_index(style.font_family(), style.font_weight())
    }
}

impl TextMeasurer for FontLibrary {
    fn text_width(&self, text: &str, style: &ParagraphStyle) -> f32 {
        match self.resolve_style(style) {
            Some(face) => face.text_width(text, style.font_size()),
            None => {
                let bytes = encode_win_ansi(text).len() as f32;
                bytes * FALLBACK_ADVANCE as f32 * style.font_size() / 1000.0
            }
        }
    }
}
