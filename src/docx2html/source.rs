use crate::host::ElementRef;
use std::path::{Path, PathBuf};

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// A local file handle.
    File(PathBuf),
    /// Raw DOCX bytes.
    Bytes(Vec<u8>),
    /// A string; only `http://` and `https://` URLs are accepted.
    Text(String),
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        DocumentSource::File(path)
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        DocumentSource::File(path.to_path_buf())
    }
}

impl From<Vec<u8>> for DocumentSource {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentSource::Bytes(bytes)
    }
}

impl From<&[u8]> for DocumentSource {
    fn from(bytes: &[u8]) -> Self {
        DocumentSource::Bytes(bytes.to_vec())
    }
}

impl From<String> for DocumentSource {
    fn from(text: String) -> Self {
        DocumentSource::Text(text)
    }
}

impl From<&str> for DocumentSource {
    fn from(text: &str) -> Self {
        DocumentSource::Text(text.to_string())
    }
}

/// Target of [`Docx2Html::render_into`](super::Docx2Html::render_into).
#[derive(Debug, Clone)]
pub enum Container {
    Selector(String),
    Element(ElementRef),
}

impl From<&str> for Container {
    fn from(selector: &str) -> Self {
        Container::Selector(selector.to_string())
    }
}

impl From<String> for Container {
    fn from(selector: String) -> Self {
        Container::Selector(selector)
    }
}

impl From<ElementRef> for Container {
    fn from(element: ElementRef) -> Self {
        Container::Element(element)
    }
}

impl From<&ElementRef> for Container {
    fn from(element: &ElementRef) -> Self {
        Container::Element(element.clone())
    }
}
