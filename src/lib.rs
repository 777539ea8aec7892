//! # files-preview
//!
//! File preview dispatch and paginated DOCX to HTML conversion.
//!
//! A file extension selects a [`PreviewRule`]; the rule's renderer turns the
//! file (or URL) into an HTML fragment. Word documents go through
//! [`Docx2Html`], which produces one `.docx2html-root` container per page.
//!
//! ## Example
//!
//! ```no_run
//! use files_preview::{preview_type_by_file_type, Docx2Html, PreviewType};
//!
//! # async fn run() -> files_preview::Result<()> {
//! assert_eq!(preview_type_by_file_type("docx"), PreviewType::Docx);
//!
//! let html = Docx2Html::default().convert_file("report.docx").await?;
//! println!("{}", html);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod converter;
pub mod core;
pub mod docx2html;
pub mod error;
pub mod host;
pub mod preview;
pub mod render;

pub use converter::{
    DocxMarkupConverter, EmbeddedImage, ImageAttributes, ImageHandler, MarkupConverter,
    MarkupOptions, MarkupResult, Message, MessageKind, StyleMapping,
};
pub use docx2html::{Container, ConversionOutput, DocumentSource, Docx2Html};
pub use error::{Error, Result};
pub use host::{Blob, ElementRef, HostDocument};
pub use preview::{
    preview_rules, preview_type_by_file_type, rule_by_file_type, rule_for, FileRenderType,
    PreviewProps, PreviewRenderer, PreviewRule, PreviewType,
};

/// Options for [`Docx2Html`].
#[derive(Debug, Clone)]
pub struct Docx2HtmlOptions {
    /// Whether to register the page stylesheet with the host document.
    pub inject_css: bool,
    /// Element id of the injected stylesheet.
    pub css_id: String,
    /// Stylesheet text. Nothing is injected when empty.
    pub css: String,
    /// How embedded images are referenced.
    pub image_embedding: ImageEmbedding,
    /// Paragraph style mappings such as `p[style-name='Quote'] => blockquote`.
    pub style_map: Vec<String>,
}

impl Default for Docx2HtmlOptions {
    fn default() -> Self {
        Self {
            inject_css: true,
            css_id: docx2html::DEFAULT_CSS_ID.to_string(),
            css: docx2html::DEFAULT_CSS.to_string(),
            image_embedding: ImageEmbedding::DataUri,
            style_map: vec![
                "p[style-name='Page Break'] => p.page-break".to_string(),
                "p[style-name='page-break'] => p.page-break".to_string(),
            ],
        }
    }
}

/// Specifies how images are referenced from the generated markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageEmbedding {
    /// Inline `data:<type>;base64,...` URIs.
    #[default]
    DataUri,
    /// `blob:` references registered in the host document.
    Blob,
}

// Python bindings (only when 'python' feature is enabled)
#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use pyo3::prelude::*;

    /// Converts a DOCX file to paginated HTML.
    #[pyfunction]
    fn convert_docx(path: String) -> PyResult<String> {
        let bytes = std::fs::read(&path)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyIOError, _>(e.to_string()))?;
        Docx2Html::default()
            .convert(&bytes)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
    }

    /// Preview type name for a file extension.
    #[pyfunction]
    fn preview_type(ext: String) -> String {
        preview_type_by_file_type(&ext).to_string()
    }

    /// A Python module implemented in Rust.
    #[pymodule]
    pub fn files_preview(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(convert_docx, m)?)?;
        m.add_function(wrap_pyfunction!(preview_type, m)?)?;
        Ok(())
    }
}
