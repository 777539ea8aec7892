//! Built-in renderers and their deferred loaders.

use super::{PreviewProps, PreviewType};
use crate::docx2html::{fetch_bytes, read_file_bytes, Docx2Html};
use crate::render::{escape_html_attr, escape_html_text, mime_type_for_extension};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::sync::{Arc, OnceLock};

/// A viewer for one preview category.
#[async_trait]
pub trait PreviewRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Renders the props to an HTML fragment. `Ok(None)` when there is nothing to show.
    async fn render(&self, props: &PreviewProps) -> Result<Option<String>>;
}

/// Deferred renderer factory referenced by a preview rule.
pub type RendererLoader = fn() -> Arc<dyn PreviewRenderer>;

macro_rules! cached_loader {
    ($name:ident, $init:expr) => {
        pub(crate) fn $name() -> Arc<dyn PreviewRenderer> {
            static RENDERER: OnceLock<Arc<dyn PreviewRenderer>> = OnceLock::new();
            RENDERER
                .get_or_init(|| {
                    tracing::debug!(loader = stringify!($name), "constructing renderer");
                    Arc::new($init) as Arc<dyn PreviewRenderer>
                })
                .clone()
        }
    };
}

cached_loader!(load_code_renderer, TextRenderer::new(PreviewType::Code));
cached_loader!(load_md_renderer, TextRenderer::new(PreviewType::Md));
cached_loader!(load_txt_renderer, TextRenderer::new(PreviewType::Txt));
cached_loader!(load_docx_renderer, DocxRenderer::default());
cached_loader!(load_xlsx_renderer, EmbedRenderer::new(PreviewType::Xlsx));
cached_loader!(load_epub_renderer, EmbedRenderer::new(PreviewType::Epub));
cached_loader!(load_pdf_renderer, MediaRenderer::new(PreviewType::Pdf));
cached_loader!(load_pic_renderer, MediaRenderer::new(PreviewType::Pic));
cached_loader!(load_audio_renderer, MediaRenderer::new(PreviewType::Audio));
cached_loader!(load_video_renderer, MediaRenderer::new(PreviewType::Video));

/// Renders Word documents through [`Docx2Html`].
#[derive(Default)]
pub struct DocxRenderer {
    converter: Docx2Html,
}

impl DocxRenderer {
    pub fn new(converter: Docx2Html) -> Self {
        Self { converter }
    }
}

#[async_trait]
impl PreviewRenderer for DocxRenderer {
    fn name(&self) -> &'static str {
        "docx"
    }

    async fn render(&self, props: &PreviewProps) -> Result<Option<String>> {
        let html = if let Some(file) = &props.file {
            self.converter.convert_file(file).await?
        } else if let Some(url) = &props.url {
            self.converter.convert_url(url).await?
        } else {
            return Ok(None);
        };
        Ok(Some(self.converter.sanitize(&html)))
    }
}

/// Shows text-like files verbatim.
pub struct TextRenderer {
    kind: PreviewType,
    client: reqwest::Client,
}

impl TextRenderer {
    pub fn new(kind: PreviewType) -> Self {
        Self {
            kind,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PreviewRenderer for TextRenderer {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn render(&self, props: &PreviewProps) -> Result<Option<String>> {
        let bytes = match load_source(&self.client, props).await? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let text = String::from_utf8_lossy(&bytes);
        let lang = props.extension().unwrap_or_default();
        Ok(Some(format!(
            "<pre class=\"{}-preview\" data-lang=\"{}\">{}</pre>",
            self.kind,
            escape_html_attr(&lang),
            escape_html_text(&text)
        )))
    }
}

/// Images, audio, video and PDF, handed to the host's native element.
pub struct MediaRenderer {
    kind: PreviewType,
}

impl MediaRenderer {
    pub fn new(kind: PreviewType) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl PreviewRenderer for MediaRenderer {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn render(&self, props: &PreviewProps) -> Result<Option<String>> {
        let Some(src) = media_src(props).await? else {
            return Ok(None);
        };
        let src = escape_html_attr(&src);
        let title = escape_html_attr(props.name.as_deref().unwrap_or_default());
        let html = match self.kind {
            PreviewType::Pic => {
                format!("<img class=\"pic-preview\" src=\"{src}\" alt=\"{title}\" />")
            }
            PreviewType::Audio => {
                format!("<audio class=\"audio-preview\" controls src=\"{src}\"></audio>")
            }
            PreviewType::Video => {
                format!("<video class=\"video-preview\" controls src=\"{src}\"></video>")
            }
            PreviewType::Pdf => {
                format!("<iframe class=\"pdf-preview\" src=\"{src}\" title=\"{title}\"></iframe>")
            }
            other => {
                return Err(Error::Conversion(format!(
                    "no media element for preview type {}",
                    other
                )))
            }
        };
        Ok(Some(html))
    }
}

/// Binary formats without a native viewer, embedded as an object.
pub struct EmbedRenderer {
    kind: PreviewType,
}

impl EmbedRenderer {
    pub fn new(kind: PreviewType) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl PreviewRenderer for EmbedRenderer {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    async fn render(&self, props: &PreviewProps) -> Result<Option<String>> {
        let Some(src) = media_src(props).await? else {
            return Ok(None);
        };
        let mime = mime_type_for_extension(&props.extension().unwrap_or_default());
        Ok(Some(format!(
            "<object class=\"{}-preview\" type=\"{}\" data=\"{}\"></object>",
            self.kind,
            mime,
            escape_html_attr(&src)
        )))
    }
}

async fn load_source(client: &reqwest::Client, props: &PreviewProps) -> Result<Option<Vec<u8>>> {
    if let Some(file) = &props.file {
        return read_file_bytes(file).await.map(Some);
    }
    if let Some(url) = &props.url {
        return fetch_bytes(client, url).await.map(Some);
    }
    Ok(None)
}

/// URL as-is, or the file inlined as a data URI.
async fn media_src(props: &PreviewProps) -> Result<Option<String>> {
    if let Some(file) = &props.file {
        let bytes = read_file_bytes(file).await?;
        let mime = mime_type_for_extension(&props.extension().unwrap_or_default());
        return Ok(Some(format!("data:{};base64,{}", mime, BASE64.encode(bytes))));
    }
    Ok(props.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_text_renderer_escapes_content() {
        let mut file = tempfile::Builder::new().suffix(".rs").tempfile().unwrap();
        write!(file, "fn main() {{ println!(\"<hi>\"); }}").unwrap();

        let renderer = TextRenderer::new(PreviewType::Code);
        let html = renderer
            .render(&PreviewProps::from_file(file.path()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            html,
            concat!(
                "<pre class=\"code-preview\" data-lang=\"rs\">",
                "fn main() { println!(\"&lt;hi&gt;\"); }</pre>"
            )
        );
    }

    #[tokio::test]
    async fn test_media_renderer_inlines_files() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[1, 2, 3]).unwrap();

        let html = MediaRenderer::new(PreviewType::Pic)
            .render(&PreviewProps::from_file(file.path()).with_name("dot.png"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            html,
            "<img class=\"pic-preview\" src=\"data:image/png;base64,AQID\" alt=\"dot.png\" />"
        );
    }

    #[tokio::test]
    async fn test_media_renderer_keeps_urls() {
        let html = MediaRenderer::new(PreviewType::Video)
            .render(&PreviewProps::from_url("https://cdn.test/a.mp4?x=1&y=2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            html,
            concat!(
                "<video class=\"video-preview\" controls ",
                "src=\"https://cdn.test/a.mp4?x=1&amp;y=2\"></video>"
            )
        );
    }

    #[tokio::test]
    async fn test_renderers_without_source_render_nothing() {
        let props = PreviewProps::default();
        assert!(TextRenderer::new(PreviewType::Txt).render(&props).await.unwrap().is_none());
        assert!(MediaRenderer::new(PreviewType::Audio).render(&props).await.unwrap().is_none());
        assert!(EmbedRenderer::new(PreviewType::Epub).render(&props).await.unwrap().is_none());
        assert!(DocxRenderer::default().render(&props).await.unwrap().is_none());
    }

    #[test]
    fn test_loaders_are_cached() {
        let first = load_pic_renderer();
        let second = load_pic_renderer();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "pic");
    }
}
