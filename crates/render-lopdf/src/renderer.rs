use crate::embed::{embed_truetype, standard_font, ImageResource};
use crate::page::{PageContext, FALLBACK_FONT_RESOURCE};
use crate::RenderError;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::HashMap;
use std::io::Write;
use tpt_layout::text::encode_win_ansi;
use tpt_layout::{
    Flowable, FontLibrary, LaidOutPage, LayoutEngine, PageCanvas, PageGeometry, PageInfo,
};

/// Per-page decoration callback. Elements drawn on the canvas are painted
/// over the page's laid-out content.
pub type PageHook = Box<dyn Fn(&PageInfo, &mut PageCanvas<'_>) -> Result<(), RenderError>>;

/// Entries for the PDF document information dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub producer: Option<String>,
    /// A PDF date string, e.g. `D:20240131120000`.
    pub creation_date: Option<String>,
}

impl DocumentInfo {
    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        let entries = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Producer", &self.producer),
            ("CreationDate", &self.creation_date),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                dict.set(key, Object::String(encode_win_ansi(value), StringFormat::Literal));
            }
        }
        dict
    }
}

/// A PDF renderer using the `lopdf` library.
///
/// The renderer owns the page geometry, the fonts and images the document
/// may reference, and an optional `on_page` hook. Rendering lays out the
/// flowables, decorates each page through the hook and writes one PDF.
pub struct LopdfRenderer {
    geometry: PageGeometry,
    fonts: FontLibrary,
    images: Vec<(String, ImageResource)>,
    on_page: Option<PageHook>,
    info: DocumentInfo,
}

impl LopdfRenderer {
    pub fn new(geometry: PageGeometry, fonts: FontLibrary) -> Self {
        Self {
            geometry,
            fonts,
            images: Vec::new(),
            on_page: None,
            info: DocumentInfo::default(),
        }
    }

    pub fn with_info(mut self, info: DocumentInfo) -> Self {
        self.info = info;
        self
    }

    pub fn on_page<F>(mut self, hook: F) -> Self
    where
        F: Fn(&PageInfo, &mut PageCanvas<'_>) -> Result<(), RenderError> + 'static,
    {
        self.on_page = Some(Box::new(hook));
        self
    }

    /// Decodes and registers an image under `key`. Returns its pixel size.
    pub fn register_image(
        &mut self,
        key: impl Into<String>,
        bytes: &[u8],
    ) -> Result<(u32, u32), RenderError> {
        let key = key.into();
        let resource = ImageResource::decode(&key, bytes)?;
        let size = (resource.width(), resource.height());
        self.images.retain(|(existing, _)| *existing != key);
        self.images.push((key, resource));
        Ok(size)
    }

    pub fn image(&self, key: &str) -> Option<&ImageResource> {
        self.images.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    pub fn paginate(&self, flowables: &[Flowable]) -> Result<Vec<LaidOutPage>, RenderError> {
        let engine = LayoutEngine::new(&self.fonts, self.geometry)?;
        Ok(engine.paginate(flowables)?)
    }

    /// Lays out `flowables` and writes the PDF. Returns the page count.
    pub fn render<W: Write>(
        &self,
        flowables: &[Flowable],
        writer: &mut W,
    ) -> Result<usize, RenderError> {
        let pages = self.paginate(flowables)?;
        self.render_pages(pages, writer)
    }

    /// Writes already laid-out pages. Returns the page count.
    pub fn render_pages<W: Write>(
        &self,
        pages: Vec<LaidOutPage>,
        writer: &mut W,
    ) -> Result<usize, RenderError> {
        let mut doc = self.build_document(pages)?;
        let page_count = doc.get_pages().len();
        doc.save_to(writer)?;
        log::debug!("Wrote PDF with {} pages", page_count);
        Ok(page_count)
    }

    fn build_document(&self, pages: Vec<LaidOutPage>) -> Result<Document, RenderError> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let (font_dict, font_resources) = self.embed_fonts(&mut doc);
        let mut xobject_dict = Dictionary::new();
        let mut image_resources = HashMap::new();
        for (index, (key, image)) in self.images.iter().enumerate() {
            let name = format!("Im{}", index + 1);
            let id = image.embed(&mut doc);
            xobject_dict.set(name.as_bytes(), id);
            image_resources.insert(key.clone(), name);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => font_dict,
            "XObject" => xobject_dict,
        });

        let (page_width, page_height) = self.geometry.size();
        let page_count = pages.len();
        let mut page_ids: Vec<Object> = Vec::with_capacity(page_count);

        for (index, page) in pages.into_iter().enumerate() {
            let info = PageInfo {
                page_number: index + 1,
                page_count,
                geometry: self.geometry,
            };
            let mut canvas = PageCanvas::new(&self.fonts);
            if let Some(hook) = &self.on_page {
                hook(&info, &mut canvas)?;
            }

            let mut ctx =
                PageContext::new(page_height, &self.fonts, &font_resources, &image_resources);
            for el in page.elements.iter().chain(canvas.elements()) {
                ctx.draw_element(el)?;
            }
            let content_id = doc.add_object(Stream::new(dictionary! {}, ctx.finish().encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.0.into(), 0.0.into(), page_width.into(), page_height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids,
                "Count" => page_count as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let info = self.info.to_dictionary();
        if !info.is_empty() {
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        Ok(doc)
    }

    /// Embeds every face and returns the font dictionary together with the
    /// resource name of each face, in library order.
    fn embed_fonts(&self, doc: &mut Document) -> (Dictionary, Vec<String>) {
        let mut font_dict = Dictionary::new();
        let mut font_resources = Vec::with_capacity(self.fonts.faces().len());

        if self.fonts.is_empty() {
            log::warn!("No fonts registered; falling back to Helvetica");
            let id = standard_font(doc, "Helvetica");
            font_dict.set(FALLBACK_FONT_RESOURCE, id);
            return (font_dict, font_resources);
        }

        for (index, face) in self.fonts.faces().iter().enumerate() {
            let name = format!("F{}", index + 1);
            let id = embed_truetype(doc, face);
            font_dict.set(name.as_bytes(), id);
            font_resources.push(name);
        }
        (font_dict, font_resources)
    }
}
