use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object};
use tpt_layout::text::win_ansi_to_char;

/// Decodes every `Tj` operand on a page from WinAnsi into text.
pub fn page_strings(doc: &LopdfDocument, page: u32) -> Vec<String> {
    let pages = doc.get_pages();
    let Some(page_id) = pages.get(&page) else {
        return Vec::new();
    };
    let Ok(raw) = doc.get_page_content(*page_id) else {
        return Vec::new();
    };
    let Ok(content) = Content::decode(&raw) else {
        return Vec::new();
    };
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => {
                Some(bytes.iter().map(|b| win_ansi_to_char(*b).unwrap_or('?')).collect())
            }
            _ => None,
        })
        .collect()
}

/// `BaseFont` names of every font object in the file.
pub fn font_names(doc: &LopdfDocument) -> Vec<String> {
    let mut names: Vec<String> = doc
        .objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| matches!(dict.get(b"Type").and_then(Object::as_name), Ok(b"Font")))
        .filter_map(|dict| dict.get(b"BaseFont").and_then(Object::as_name).ok())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// A value from the trailer's `Info` dictionary.
pub fn info_entry(doc: &LopdfDocument, key: &str) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(info_id).ok()?.as_dict().ok()?;
    match info.get(key.as_bytes()).ok()? {
        Object::String(bytes, _) => {
            Some(bytes.iter().filter_map(|b| win_ansi_to_char(*b)).collect())
        }
        _ => None,
    }
}

/// `(width, height)` of a page's MediaBox.
pub fn media_box(doc: &LopdfDocument, page: u32) -> Option<(f32, f32)> {
    let page_id = *doc.get_pages().get(&page)?;
    let dict = doc.get_object(page_id).ok()?.as_dict().ok()?;
    let values = dict.get(b"MediaBox").ok()?.as_array().ok()?;
    let number = |o: &Object| o.as_f32().ok().or_else(|| o.as_i64().ok().map(|v| v as f32));
    Some((number(values.get(2)?)?, number(values.get(3)?)?))
}

/// Font resource names selected by `Tf` on a page, deduplicated.
pub fn font_resources_used(doc: &LopdfDocument, page: u32) -> Vec<String> {
    let Some(page_id) = doc.get_pages().get(&page).copied() else {
        return Vec::new();
    };
    let Some(content) = doc
        .get_page_content(page_id)
        .ok()
        .and_then(|raw| Content::decode(&raw).ok())
    else {
        return Vec::new();
    };
    let mut names: Vec<String> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Tf")
        .filter_map(|op| op.operands.first())
        .filter_map(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Whether any page draws an image XObject.
pub fn draws_image(doc: &LopdfDocument, page: u32) -> bool {
    let Some(page_id) = doc.get_pages().get(&page).copied() else {
        return false;
    };
    doc.get_page_content(page_id)
        .ok()
        .and_then(|raw| Content::decode(&raw).ok())
        .is_some_and(|content| content.operations.iter().any(|op| op.operator == "Do"))
}
