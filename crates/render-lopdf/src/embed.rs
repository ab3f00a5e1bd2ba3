//! PDF objects for embedded resources: TrueType fonts and raster images.

use crate::RenderError;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use tpt_layout::FontFace;
use tpt_style::FontWeight;

const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 255;

/// Embeds `face` as a simple TrueType font with WinAnsi encoding.
pub(crate) fn embed_truetype(doc: &mut Document, face: &FontFace) -> ObjectId {
    let base_font = Object::Name(face.postscript_name().as_bytes().to_vec());
    let program = face.data();

    let file_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => program.len() as i64 },
        program.to_vec(),
    ));

    let bbox: Vec<Object> = face
        .bbox_1000()
        .iter()
        .map(|v| Object::Integer(v.round() as i64))
        .collect();
    let stem_v: i64 = match face.weight() {
        FontWeight::Bold => 120,
        FontWeight::Regular => 80,
    };
    // Flags: nonsymbolic.
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_font.clone(),
        "Flags" => 32_i64,
        "FontBBox" => bbox,
        "ItalicAngle" => 0_i64,
        "Ascent" => face.ascent_1000().round() as i64,
        "Descent" => face.descent_1000().round() as i64,
        "CapHeight" => face.cap_height_1000().round() as i64,
        "StemV" => stem_v,
        "FontFile2" => file_id,
    });

    let widths: Vec<Object> = (FIRST_CHAR..=LAST_CHAR)
        .map(|b| Object::Integer(face.advance_1000(b).round() as i64))
        .collect();

    log::debug!("Embedding font '{}' ({} bytes)", face.postscript_name(), program.len());
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => base_font,
        "FirstChar" => FIRST_CHAR as i64,
        "LastChar" => LAST_CHAR as i64,
        "Widths" => widths,
        "FontDescriptor" => descriptor_id,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// One of the 14 standard fonts, used when no font files are available.
pub(crate) fn standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// A decoded raster image split into 8-bit RGB samples and an optional
/// alpha channel.
#[derive(Debug, Clone)]
pub struct ImageResource {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl ImageResource {
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, RenderError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| RenderError::Image {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixel_count = (width * height) as usize;
        let mut rgb = Vec::with_capacity(pixel_count * 3);
        let mut alpha = Vec::with_capacity(pixel_count);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let opaque = alpha.iter().all(|a| *a == u8::MAX);

        Ok(Self {
            width,
            height,
            rgb,
            alpha: (!opaque).then_some(alpha),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Height that preserves the aspect ratio at `width` points.
    pub fn scaled_height(&self, width: f32) -> f32 {
        if self.width == 0 {
            0.0
        } else {
            width * self.height as f32 / self.width as f32
        }
    }

    pub(crate) fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        };
        if let Some(alpha) = &self.alpha {
            let mask_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => self.width as i64,
                    "Height" => self.height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8_i64,
                },
                alpha.clone(),
            ));
            dict.set("SMask", mask_id);
        }
        doc.add_object(Stream::new(dict, self.rgb.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 51, 102, alpha]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn decodes_png_and_splits_alpha() {
        let resource = ImageResource::decode("logo", &png_bytes(4, 2, 128)).unwrap();
        assert_eq!((resource.width(), resource.height()), (4, 2));
        assert!(resource.has_alpha());
        assert_eq!(resource.rgb.len(), 4 * 2 * 3);
        assert_eq!(&resource.rgb[..3], &[0, 51, 102]);
        assert_eq!(resource.scaled_height(40.0), 20.0);
    }

    #[test]
    fn opaque_images_have_no_mask() {
        let resource = ImageResource::decode("logo", &png_bytes(2, 2, 255)).unwrap();
        assert!(!resource.has_alpha());
    }

    #[test]
    fn invalid_bytes_are_an_image_error() {
        let err = ImageResource::decode("logo", b"not a png").unwrap_err();
        assert!(matches!(err, RenderError::Image { key, .. } if key == "logo"));
    }
}
