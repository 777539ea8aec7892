//! Paginated, styled HTML from Word documents.
//!
//! [`Docx2Html`] hands the bytes to a [`MarkupConverter`], then normalizes
//! page breaks, splits the markup into `.docx2html-root` page containers
//! and injects the page stylesheet into the [`HostDocument`] once.

mod css;
mod images;
mod pages;
mod sanitize;
mod source;

use crate::converter::{
    DocxMarkupConverter, MarkupConverter, MarkupOptions, Message, MessageKind, StyleMapping,
};
use crate::host::{ElementRef, HostDocument};
use crate::{Docx2HtmlOptions, Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};

pub use self::css::{DEFAULT_CSS, DEFAULT_CSS_ID};
pub use self::pages::{normalize_page_breaks, split_pages, wrap_pages};
pub use self::source::{Container, DocumentSource};

use self::images::ImageEmbedder;

/// Paginated HTML together with the converter's diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutput {
    pub html: String,
    pub messages: Vec<Message>,
}

/// DOCX to HTML converter bound to a host document.
pub struct Docx2Html {
    options: Docx2HtmlOptions,
    converter: Arc<dyn MarkupConverter>,
    host: HostDocument,
    client: reqwest::Client,
}

impl Default for Docx2Html {
    fn default() -> Self {
        Self::new(Docx2HtmlOptions::default())
    }
}

impl Docx2Html {
    /// Creates a converter writing styles and blobs to [`HostDocument::global`].
    pub fn new(options: Docx2HtmlOptions) -> Self {
        Self {
            options,
            converter: Arc::new(DocxMarkupConverter),
            host: HostDocument::global().clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_host(mut self, host: HostDocument) -> Self {
        self.host = host;
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn MarkupConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn options(&self) -> &Docx2HtmlOptions {
        &self.options
    }

    pub fn host(&self) -> &HostDocument {
        &self.host
    }

    /// Converts DOCX bytes to one or more page containers.
    pub fn convert(&self, bytes: &[u8]) -> Result<String> {
        self.convert_with_messages(bytes).map(|output| output.html)
    }

    /// Like [`convert`](Self::convert), keeping the converter's warnings.
    pub fn convert_with_messages(&self, bytes: &[u8]) -> Result<ConversionOutput> {
        tracing::debug!(bytes = bytes.len(), "converting document");

        let (markup_options, mut messages) = self.markup_options();
        let mut images = ImageEmbedder::new(self.options.image_embedding, &self.host);
        let result = match self
            .converter
            .convert_to_html(bytes, &markup_options, &mut images)
        {
            Ok(result) => result,
            Err(e) => {
                images.revoke_created();
                return Err(e);
            }
        };
        messages.extend(result.messages);
        log_messages(&messages);

        let html = normalize_page_breaks(&result.value);

        if self.options.inject_css && !self.options.css.is_empty() {
            self.host.ensure_style(&self.options.css_id, &self.options.css);
        }

        let html = wrap_pages(&html);
        tracing::debug!(
            pages = html.matches("<div class=\"docx2html-root\">").count(),
            "paginated document"
        );

        Ok(ConversionOutput { html, messages })
    }

    /// Reads and converts a local file. The path must name a regular file.
    pub async fn convert_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let bytes = read_file_bytes(path.as_ref()).await?;
        self.convert(&bytes)
    }

    /// Fetches and converts a remote document.
    pub async fn convert_url(&self, url: &str) -> Result<String> {
        let bytes = fetch_bytes(&self.client, url).await?;
        self.convert(&bytes)
    }

    /// Converts `source` and replaces the container's content with the result.
    ///
    /// The container is resolved before any loading; on failure it is left
    /// untouched.
    pub async fn render_into(
        &self,
        container: impl Into<Container>,
        source: impl Into<DocumentSource>,
    ) -> Result<ElementRef> {
        let element = match container.into() {
            Container::Selector(selector) => self.host.query_selector(&selector),
            Container::Element(element) => Some(element).filter(ElementRef::is_connected),
        }
        .ok_or_else(|| Error::InvalidInput("Container element not found".to_string()))?;

        let html = match source.into() {
            DocumentSource::File(path) => self.convert_file(&path).await?,
            DocumentSource::Bytes(bytes) => self.convert(&bytes)?,
            DocumentSource::Text(text) if is_http_url(&text) => self.convert_url(&text).await?,
            DocumentSource::Text(_) => {
                return Err(Error::InvalidInput(
                    "Source must be a file, bytes or an http(s) URL".to_string(),
                ))
            }
        };

        if !element.set_inner_html(html) {
            return Err(Error::InvalidInput("Container element not found".to_string()));
        }
        Ok(element)
    }

    /// Strips `<script>` elements. Not an XSS sanitizer.
    pub fn sanitize(&self, html: &str) -> String {
        sanitize::strip_scripts(html)
    }

    fn markup_options(&self) -> (MarkupOptions, Vec<Message>) {
        let mut style_map = Vec::new();
        let mut messages = Vec::new();
        for line in &self.options.style_map {
            match StyleMapping::parse(line) {
                Some(mapping) => style_map.push(mapping),
                None => messages.push(Message::warning(format!(
                    "Did not understand this style mapping, so ignored it: {line}"
                ))),
            }
        }
        let options = MarkupOptions {
            style_map,
            include_default_style_map: true,
        };
        (options, messages)
    }
}

fn log_messages(messages: &[Message]) {
    if messages.is_empty() {
        return;
    }
    let text: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
    tracing::warn!(count = messages.len(), messages = ?text, "document conversion warnings");

    let embedded: Vec<&str> = messages
        .iter()
        .filter(|m| m.kind == MessageKind::Warning && mentions_embedded_object(&m.message))
        .map(|m| m.message.as_str())
        .collect();
    if !embedded.is_empty() {
        tracing::warn!(
            messages = ?embedded,
            "charts or embedded objects detected but may not be converted"
        );
    }
}

fn mentions_embedded_object(message: &str) -> bool {
    let message = message.to_lowercase();
    ["chart", "embedded", "ole"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// Whether `text` is an `http://` or `https://` URL.
pub fn is_http_url(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://").expect("valid url regex"))
        .is_match(text)
}

/// Reads a regular file with `tokio::fs`.
pub(crate) async fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| Error::InvalidInput(format!("{} is not a file", path.display())))?;
    if !metadata.is_file() {
        return Err(Error::InvalidInput(format!("{} is not a file", path.display())));
    }
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded file");
    Ok(bytes)
}

/// GETs `url`; any non-success status is an error.
pub(crate) async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Network(format!(
            "Network error while fetching: {}",
            status.as_u16()
        )));
    }
    let bytes = response.bytes().await?;
    tracing::debug!(url, bytes = bytes.len(), "fetched document");
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{EmbeddedImage, ImageHandler, MarkupResult};
    use crate::ImageEmbedding;
    use pretty_assertions::assert_eq;

    /// Returns fixed markup regardless of input.
    struct FixedMarkup(&'static str);

    impl MarkupConverter for FixedMarkup {
        fn convert_to_html(
            &self,
            _: &[u8],
            _: &MarkupOptions,
            _: &mut dyn ImageHandler,
        ) -> Result<MarkupResult> {
            Ok(MarkupResult {
                value: self.0.to_string(),
                messages: vec![Message::warning("Unrecognised paragraph style: 'X'")],
            })
        }
    }

    /// Registers one image, then fails.
    struct FailsAfterImage;

    impl MarkupConverter for FailsAfterImage {
        fn convert_to_html(
            &self,
            _: &[u8],
            _: &MarkupOptions,
            images: &mut dyn ImageHandler,
        ) -> Result<MarkupResult> {
            images.convert_image(&EmbeddedImage::new(None, vec![1, 2, 3]))?;
            Err(Error::DocxParse("truncated document".to_string()))
        }
    }

    fn converter(markup: &'static str, host: &HostDocument) -> Docx2Html {
        Docx2Html::default()
            .with_host(host.clone())
            .with_converter(Arc::new(FixedMarkup(markup)))
    }

    #[test]
    fn test_page_break_class_becomes_page() {
        let host = HostDocument::new();
        let html = converter("<p>a</p><p class=\"page-break\">b</p>", &host)
            .convert(b"")
            .unwrap();
        assert_eq!(
            html,
            "<div class=\"docx2html-root\"><p>a</p></div>\
             <div class=\"docx2html-root\">\
             <p style=\"page-break-before: always;\" class=\"page-break\">b</p></div>"
        );
    }

    #[test]
    fn test_css_injected_once() {
        let host = HostDocument::new();
        let docx2html = converter("<p>a</p>", &host);
        docx2html.convert(b"").unwrap();
        docx2html.convert(b"").unwrap();
        assert_eq!(host.style_count(DEFAULT_CSS_ID), 1);
    }

    #[test]
    fn test_css_injection_can_be_disabled() {
        let host = HostDocument::new();
        let options = Docx2HtmlOptions {
            inject_css: false,
            ..Default::default()
        };
        Docx2Html::new(options)
            .with_host(host.clone())
            .with_converter(Arc::new(FixedMarkup("<p>a</p>")))
            .convert(b"")
            .unwrap();
        assert_eq!(host.style_count(DEFAULT_CSS_ID), 0);
    }

    #[test]
    fn test_invalid_style_mapping_is_a_warning() {
        let host = HostDocument::new();
        let options = Docx2HtmlOptions {
            style_map: vec!["nonsense".to_string()],
            ..Default::default()
        };
        let output = Docx2Html::new(options)
            .with_host(host)
            .with_converter(Arc::new(FixedMarkup("<p>a</p>")))
            .convert_with_messages(b"")
            .unwrap();
        assert_eq!(output.messages.len(), 2);
        assert!(output.messages[0].message.contains("nonsense"));
    }

    #[test]
    fn test_failed_conversion_revokes_its_blobs() {
        let host = HostDocument::new();
        let options = Docx2HtmlOptions {
            image_embedding: ImageEmbedding::Blob,
            ..Default::default()
        };
        let err = Docx2Html::new(options)
            .with_host(host.clone())
            .with_converter(Arc::new(FailsAfterImage))
            .convert(b"")
            .unwrap_err();
        assert!(matches!(err, Error::DocxParse(_)));
        assert_eq!(host.blob_count(), 0);
        assert_eq!(host.style_count(DEFAULT_CSS_ID), 0);
    }

    #[test]
    fn test_embedded_object_filter() {
        assert!(mentions_embedded_object(
            "Drawing without image data (chart or embedded OLE object) was not converted"
        ));
        assert!(!mentions_embedded_object("Unrecognised paragraph style: 'X'"));
    }

    #[test]
    fn test_http_url_check() {
        assert!(is_http_url("https://x.test/a.docx"));
        assert!(is_http_url("http://x.test"));
        assert!(!is_http_url("ftp://x.test"));
        assert!(!is_http_url("report.docx"));
    }

    #[tokio::test]
    async fn test_render_into_missing_container_fails_first() {
        let host = HostDocument::new();
        let err = converter("<p>a</p>", &host)
            .render_into("#nowhere", b"".as_slice())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(host.style_count(DEFAULT_CSS_ID), 0);
    }

    #[tokio::test]
    async fn test_render_into_rejects_non_url_text() {
        let host = HostDocument::new();
        let el = host.create_element("viewer");
        el.set_inner_html("old");
        let err = converter("<p>a</p>", &host)
            .render_into("#viewer", "not a url")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(el.inner_html(), "old");
    }

    #[tokio::test]
    async fn test_render_into_replaces_content() {
        let host = HostDocument::new();
        let el = host.create_element("viewer");
        let returned = converter("<p>a</p>", &host)
            .render_into(&el, vec![1u8])
            .await
            .unwrap();
        assert_eq!(returned, el);
        assert_eq!(el.inner_html(), "<div class=\"docx2html-root\"><p>a</p></div>");
    }

    #[tokio::test]
    async fn test_convert_file_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = Docx2Html::default()
            .with_host(HostDocument::new())
            .convert_file(dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
