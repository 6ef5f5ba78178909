//! PDF page decomposition
//!
//! Scanned medical PDFs almost always carry one full-page image XObject per
//! page. Each page's largest image is pulled out and handed to the vision
//! engine as an ordinary image: JPEG streams (`DCTDecode`) pass through
//! untouched, anything else is decoded and re-encoded as PNG.

use crate::OcrError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

/// Extract one engine-ready image per page, in page order
///
/// Pages without a usable image are skipped with a warning; an error is
/// returned only when the document is unparseable or no page yields an
/// image at all.
pub fn page_images(pdf_bytes: &[u8]) -> Result<Vec<Vec<u8>>, OcrError> {
    let doc = Document::load_mem(pdf_bytes)
        .map_err(|e| OcrError::Pdf(format!("failed to parse PDF: {}", e)))?;

    let mut images = Vec::new();

    for (page_idx, page_id) in doc.page_iter().enumerate() {
        match page_image(&doc, page_id) {
            Ok(image) => {
                debug!(page = page_idx, bytes = image.len(), "extracted page image");
                images.push(image);
            }
            Err(e) => {
                warn!(page = page_idx, error = %e, "skipping page without usable image");
            }
        }
    }

    if images.is_empty() {
        return Err(OcrError::Pdf(
            "no recognizable page images in document".to_string(),
        ));
    }

    Ok(images)
}

/// Pull the largest image XObject from one page
fn page_image(doc: &Document, page_id: ObjectId) -> Result<Vec<u8>, OcrError> {
    let page_dict = resolve(doc, doc.get_object(page_id).map_err(pdf_err)?)
        .as_dict()
        .map_err(pdf_err)?;

    let resources = resolve_entry(doc, page_dict, b"Resources")?;
    let xobjects = resolve_entry(doc, resources, b"XObject")?;

    let mut largest: Option<&lopdf::Stream> = None;

    for (_name, entry) in xobjects.iter() {
        let stream = match resolve(doc, entry) {
            Object::Stream(s) => s,
            _ => continue,
        };
        if !is_image_subtype(&stream.dict) {
            continue;
        }
        if largest.map_or(true, |prev| stream.content.len() > prev.content.len()) {
            largest = Some(stream);
        }
    }

    let stream =
        largest.ok_or_else(|| OcrError::Pdf("no image XObject on page".to_string()))?;

    engine_bytes(stream)
}

/// Convert an image stream into bytes a vision engine can decode
fn engine_bytes(stream: &lopdf::Stream) -> Result<Vec<u8>, OcrError> {
    if has_filter(&stream.dict, b"DCTDecode") {
        // Stream content is already a complete JPEG
        return Ok(stream.content.clone());
    }

    let raw = stream
        .decompressed_content()
        .map_err(|e| OcrError::Image(format!("failed to decompress page image: {}", e)))?;

    let decoded = image::load_from_memory(&raw)
        .map_err(|e| OcrError::Image(format!("failed to decode page image: {}", e)))?;

    let mut png = std::io::Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|e| OcrError::Image(format!("failed to encode page image: {}", e)))?;

    Ok(png.into_inner())
}

/// Follow a reference to its object; non-references pass through
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Look up a dictionary entry and resolve it to a dictionary
fn resolve_entry<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Result<&'a Dictionary, OcrError> {
    let entry = dict.get(key).map_err(pdf_err)?;
    resolve(doc, entry).as_dict().map_err(pdf_err)
}

fn is_image_subtype(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image")
}

/// Check whether a stream's /Filter entry names the given filter
fn has_filter(dict: &Dictionary, filter: &[u8]) -> bool {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => n == filter,
        Ok(Object::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Object::Name(n) if n == filter)),
        _ => false,
    }
}

fn pdf_err(e: lopdf::Error) -> OcrError {
    OcrError::Pdf(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_pdf_is_an_error() {
        let result = page_images(b"definitely not a pdf");
        assert!(matches!(result, Err(OcrError::Pdf(_))));
    }

    #[test]
    fn test_pdf_without_images_is_an_error() {
        // Minimal valid single-page PDF with no XObjects
        let pdf = b"%PDF-1.4\n\
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n\
2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n\
3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >> endobj\n\
xref\n0 4\ntrailer << /Size 4 /Root 1 0 R >>\nstartxref\n0\n%%EOF";
        let result = page_images(pdf);
        assert!(matches!(result, Err(OcrError::Pdf(_))));
    }

    #[test]
    fn test_filter_name_detection() {
        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        assert!(has_filter(&dict, b"DCTDecode"));
        assert!(!has_filter(&dict, b"FlateDecode"));
    }

    #[test]
    fn test_filter_array_detection() {
        let mut dict = Dictionary::new();
        dict.set(
            "Filter",
            Object::Array(vec![
                Object::Name(b"FlateDecode".to_vec()),
                Object::Name(b"DCTDecode".to_vec()),
            ]),
        );
        assert!(has_filter(&dict, b"DCTDecode"));
    }

    #[test]
    fn test_image_subtype_detection() {
        let mut dict = Dictionary::new();
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        assert!(is_image_subtype(&dict));

        let mut form = Dictionary::new();
        form.set("Subtype", Object::Name(b"Form".to_vec()));
        assert!(!is_image_subtype(&form));
    }
}
