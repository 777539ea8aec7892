//! Image extraction - reads embedded pictures and hands them to an [`ImageHandler`].

use crate::render::{escape_html_attr, mime_type_for_extension};
use crate::{error::Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rs_docx::document::Drawing;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// A picture embedded in the document, as handed to the image callback.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    content_type: Option<String>,
    data: Vec<u8>,
}

impl EmbeddedImage {
    pub fn new(content_type: Option<String>, data: Vec<u8>) -> Self {
        Self { content_type, data }
    }

    /// Declared content type, `image/png` when unknown.
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or("image/png")
    }

    pub fn read(&self) -> &[u8] {
        &self.data
    }

    pub fn read_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// Attributes written onto the `<img>` element for one image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageAttributes {
    pub src: String,
    pub alt: Option<String>,
}

/// Callback resolving an embedded image to its `<img>` attributes.
pub trait ImageHandler {
    fn convert_image(&mut self, image: &EmbeddedImage) -> Result<ImageAttributes>;
}

/// Outcome of looking up an image reference.
pub enum ImageLookup {
    Html(String),
    /// The drawing carries no picture (charts, SmartArt, OLE objects).
    NoImageData,
    /// The relationship or media part is missing.
    Missing(String),
}

/// Extractor for images embedded in DOCX.
pub struct ImageExtractor<'a> {
    source: &'a [u8],
    handler: &'a mut dyn ImageHandler,
    counter: usize,
}

impl<'a> ImageExtractor<'a> {
    /// Creates an extractor reading media parts from the DOCX bytes.
    pub fn new(source: &'a [u8], handler: &'a mut dyn ImageHandler) -> Self {
        Self {
            source,
            handler,
            counter: 0,
        }
    }

    pub fn image_count(&self) -> usize {
        self.counter
    }

    /// Extracts image from a Drawing element and returns an `<img>` tag.
    pub fn extract_from_drawing(
        &mut self,
        drawing: &Drawing,
        rels: &HashMap<String, String>,
    ) -> Result<ImageLookup> {
        let Some(rel_id) = self.find_blip_id(drawing) else {
            return Ok(ImageLookup::NoImageData);
        };
        self.lookup(&rel_id, rels)
    }

    fn find_blip_id(&self, drawing: &Drawing) -> Option<String> {
        // Try inline first (most common for embedded images)
        if let Some(inline) = &drawing.inline {
            if let Some(graphic) = &inline.graphic {
                if let Some(pic) = graphic.data.children.first() {
                    let embed = &pic.fill.blip.embed;
                    if !embed.is_empty() {
                        return Some(embed.to_string());
                    }
                }
            }
        }

        // Try anchor (for floating images)
        if let Some(anchor) = &drawing.anchor {
            if let Some(graphic) = &anchor.graphic {
                if let Some(pic) = graphic.data.children.first() {
                    let embed = &pic.fill.blip.embed;
                    if !embed.is_empty() {
                        return Some(embed.to_string());
                    }
                }
            }
        }

        None
    }

    /// Extracts image from a Pict element (VML).
    pub fn extract_from_pict(
        &mut self,
        pict: &rs_docx::document::Pict,
        rels: &HashMap<String, String>,
    ) -> Result<ImageLookup> {
        let Some(rel_id) = self.find_pict_blip_id(pict) else {
            return Ok(ImageLookup::NoImageData);
        };
        self.lookup(&rel_id, rels)
    }

    fn find_pict_blip_id(&self, pict: &rs_docx::document::Pict) -> Option<String> {
        if let Some(shape) = &pict.shape {
            if let Some(img_data) = &shape.image_data {
                if let Some(id) = &img_data.id {
                    return Some(id.to_string());
                }
            }
        }

        if let Some(rect) = &pict.rect {
            if let Some(img_data) = &rect.image_data {
                if let Some(id) = &img_data.id {
                    return Some(id.to_string());
                }
            }
        }

        None
    }

    fn lookup(&mut self, rel_id: &str, rels: &HashMap<String, String>) -> Result<ImageLookup> {
        let Some(image_path) = rels.get(rel_id) else {
            return Ok(ImageLookup::Missing(format!("relationship {}", rel_id)));
        };
        match self.process_image(image_path) {
            Ok(html) => Ok(ImageLookup::Html(html)),
            Err(Error::MediaNotFound(path)) => Ok(ImageLookup::Missing(path)),
            Err(err) => Err(err),
        }
    }

    fn process_image(&mut self, image_path: &str) -> Result<String> {
        let data = self.read_image_from_docx(image_path)?;
        self.counter += 1;

        let ext = Path::new(image_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        let content_type = match mime_type_for_extension(ext) {
            "application/octet-stream" => None,
            mime => Some(mime.to_string()),
        };

        let image = EmbeddedImage::new(content_type, data);
        let attrs = self.handler.convert_image(&image)?;

        let mut html = format!("<img src=\"{}\"", escape_html_attr(&attrs.src));
        if let Some(alt) = &attrs.alt {
            html.push_str(&format!(" alt=\"{}\"", escape_html_attr(alt)));
        }
        html.push_str(" />");
        Ok(html)
    }

    fn read_image_from_docx(&self, image_path: &str) -> Result<Vec<u8>> {
        self.extract_from_zip(Cursor::new(self.source), image_path)
    }

    fn extract_from_zip<R: Read + Seek>(&self, reader: R, image_path: &str) -> Result<Vec<u8>> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::DocxParse(format!("Failed to open DOCX as ZIP: {}", e)))?;

        // Image path is relative to word/ directory typically
        let trimmed = image_path.trim_start_matches('/');
        let full_path = if trimmed.starts_with("word/") {
            trimmed.to_string()
        } else {
            format!("word/{}", trimmed)
        };

        for path in [full_path.as_str(), trimmed] {
            if let Ok(mut entry) = archive.by_name(path) {
                let mut data = Vec::new();
                entry.read_to_end(&mut data)?;
                return Ok(data);
            }
        }

        Err(Error::MediaNotFound(image_path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_image_defaults_to_png() {
        let image = EmbeddedImage::new(None, vec![0xFF, 0x00]);
        assert_eq!(image.content_type(), "image/png");
        assert_eq!(image.read_base64(), "/wA=");
    }

    #[test]
    fn test_missing_relationship_is_reported() {
        struct Unreachable;
        impl ImageHandler for Unreachable {
            fn convert_image(&mut self, _: &EmbeddedImage) -> Result<ImageAttributes> {
                panic!("handler must not run for missing media")
            }
        }

        let mut handler = Unreachable;
        let mut extractor = ImageExtractor::new(&[], &mut handler);
        let lookup = extractor.lookup("rId9", &HashMap::new()).unwrap();
        assert!(matches!(lookup, ImageLookup::Missing(_)));
        assert_eq!(extractor.image_count(), 0);
    }
}
