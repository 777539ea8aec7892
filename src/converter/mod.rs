//! Converter modules for DOCX to HTML markup.

mod context;
mod image;
mod numbering;
mod paragraph;
mod run;
mod style_map;
mod styles;
mod table;

use crate::adapters::docx::{AstExtractor, DocxExtractor};
use crate::render::{HtmlRenderer, Renderer};
use crate::{error::Error, Result};
use rs_docx::DocxFile;
use std::collections::HashMap;
use std::io::Cursor;

pub use self::context::ConversionContext;
pub use self::image::{EmbeddedImage, ImageAttributes, ImageExtractor, ImageHandler};
pub use self::numbering::NumberingResolver;
pub use self::paragraph::ParagraphConverter;
pub use self::run::RunConverter;
pub use self::style_map::StyleMapping;
pub use self::styles::StyleResolver;
pub use self::table::TableConverter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Warning,
    Error,
}

/// A diagnostic produced while converting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub message: String,
}

impl Message {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            message: message.into(),
        }
    }
}

/// Options for the markup conversion.
#[derive(Debug, Clone)]
pub struct MarkupOptions {
    /// Paragraph style mappings, checked before the built-in heading map.
    pub style_map: Vec<StyleMapping>,
    /// Whether `Heading N`, `Title` and `Subtitle` map to heading tags.
    pub include_default_style_map: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            style_map: Vec::new(),
            include_default_style_map: true,
        }
    }
}

/// Markup produced for a document, with the diagnostics collected on the way.
#[derive(Debug, Clone, Default)]
pub struct MarkupResult {
    pub value: String,
    pub messages: Vec<Message>,
}

/// Turns document bytes into an HTML fragment.
pub trait MarkupConverter: Send + Sync {
    fn convert_to_html(
        &self,
        bytes: &[u8],
        options: &MarkupOptions,
        images: &mut dyn ImageHandler,
    ) -> Result<MarkupResult>;
}

/// Built-in converter backed by `rs_docx`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxMarkupConverter;

impl MarkupConverter for DocxMarkupConverter {
    fn convert_to_html(
        &self,
        bytes: &[u8],
        options: &MarkupOptions,
        images: &mut dyn ImageHandler,
    ) -> Result<MarkupResult> {
        let docx_file = DocxFile::from_reader(Cursor::new(bytes))
            .map_err(|e| Error::DocxParse(format!("{:?}", e)))?;
        let docx = docx_file
            .parse()
            .map_err(|e| Error::DocxParse(format!("{:?}", e)))?;

        let rels = build_relationship_map(&docx);
        let numbering_resolver = NumberingResolver::new(&docx);
        let style_resolver = StyleResolver::new(&docx.styles);

        let mut context = ConversionContext::new(
            &rels,
            &numbering_resolver,
            ImageExtractor::new(bytes, images),
            options,
            docx.footnotes.as_ref(),
            docx.endnotes.as_ref(),
            &style_resolver,
        );

        let document = DocxExtractor.extract(&docx.document.body.content, &mut context)?;
        let value = HtmlRenderer.render(&document)?;
        let messages = context.take_messages();
        tracing::debug!(
            blocks = document.blocks.len(),
            messages = messages.len(),
            "converted document markup"
        );

        Ok(MarkupResult { value, messages })
    }
}

fn build_relationship_map(docx: &rs_docx::Docx) -> HashMap<String, String> {
    let mut rels = HashMap::new();

    if let Some(doc_rels) = &docx.document_rels {
        for rel in &doc_rels.relationships {
            rels.insert(rel.id.to_string(), rel.target.to_string());
        }
    }

    rels
}
