//! Preview dispatch: preview categories, the rule table and renderers.

mod renderer;
mod rules;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use self::renderer::{
    DocxRenderer, EmbedRenderer, MediaRenderer, PreviewRenderer, RendererLoader, TextRenderer,
};
pub use self::rules::{
    extension_of, normalize_extension, preview_rules, preview_type_by_file_type,
    rule_by_file_type, rule_for, PreviewRule,
};

/// Supported preview categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewType {
    None,
    Code,
    Doc,
    /// Word document
    Docx,
    /// Spreadsheet family
    Xlsx,
    Ppt,
    Pdf,
    Epub,
    Md,
    /// Image
    Pic,
    Txt,
    Audio,
    Video,
}

impl PreviewType {
    pub const ALL: [PreviewType; 13] = [
        PreviewType::None,
        PreviewType::Code,
        PreviewType::Doc,
        PreviewType::Docx,
        PreviewType::Xlsx,
        PreviewType::Ppt,
        PreviewType::Pdf,
        PreviewType::Epub,
        PreviewType::Md,
        PreviewType::Pic,
        PreviewType::Txt,
        PreviewType::Audio,
        PreviewType::Video,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewType::None => "none",
            PreviewType::Code => "code",
            PreviewType::Doc => "doc",
            PreviewType::Docx => "docx",
            PreviewType::Xlsx => "xlsx",
            PreviewType::Ppt => "ppt",
            PreviewType::Pdf => "pdf",
            PreviewType::Epub => "epub",
            PreviewType::Md => "md",
            PreviewType::Pic => "pic",
            PreviewType::Txt => "txt",
            PreviewType::Audio => "audio",
            PreviewType::Video => "video",
        }
    }

    /// How a renderer of this category reads its input, if it reads at all.
    pub fn read_as(&self) -> Option<FileRenderType> {
        match self {
            PreviewType::Code | PreviewType::Txt | PreviewType::Md => Some(FileRenderType::Text),
            PreviewType::Doc
            | PreviewType::Docx
            | PreviewType::Xlsx
            | PreviewType::Ppt
            | PreviewType::Epub => Some(FileRenderType::ArrayBuffer),
            PreviewType::Pic | PreviewType::Audio => Some(FileRenderType::Image),
            PreviewType::Pdf => Some(FileRenderType::Pdf),
            PreviewType::Video => Some(FileRenderType::Video),
            PreviewType::None => None,
        }
    }
}

impl fmt::Display for PreviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreviewType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PreviewType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| crate::Error::InvalidInput(format!("unknown preview type: {}", s)))
    }
}

/// The way a renderer loads the raw file before drawing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRenderType {
    Text,
    Image,
    Pdf,
    ArrayBuffer,
    Video,
}

impl FileRenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileRenderType::Text => "text",
            FileRenderType::Image => "image",
            FileRenderType::Pdf => "pdf",
            FileRenderType::ArrayBuffer => "arrayBuffer",
            FileRenderType::Video => "video",
        }
    }
}

/// Input a renderer is instantiated with.
///
/// At most one of `file` and `url` is expected to be meaningful; when both
/// are absent the renderer produces nothing.
#[derive(Debug, Clone, Default)]
pub struct PreviewProps {
    /// Local file to preview.
    pub file: Option<PathBuf>,
    /// Remote file to preview.
    pub url: Option<String>,
    /// Display name, also the preferred source of the extension.
    pub name: Option<String>,
}

impl PreviewProps {
    pub fn from_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
            ..Default::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Extension taken from the name, then the file path, then the URL path.
    pub fn extension(&self) -> Option<String> {
        if let Some(ext) = self.name.as_deref().and_then(extension_of) {
            return Some(ext);
        }
        if let Some(ext) = self
            .file
            .as_ref()
            .and_then(|path| path.to_str())
            .and_then(extension_of)
        {
            return Some(ext);
        }
        self.url.as_deref().and_then(extension_of)
    }

    /// The rule matching [`PreviewProps::extension`], or the `None` rule.
    pub fn rule(&self) -> &'static PreviewRule {
        match self.extension() {
            Some(ext) => rule_by_file_type(&ext),
            None => rule_for(PreviewType::None),
        }
    }

    pub fn has_source(&self) -> bool {
        self.file.is_some() || self.url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_type_string_round_trip() {
        for kind in PreviewType::ALL {
            assert_eq!(kind.as_str().parse::<PreviewType>().unwrap(), kind);
        }
        assert!("spreadsheet".parse::<PreviewType>().is_err());
    }

    #[test]
    fn test_read_modes_follow_categories() {
        assert_eq!(PreviewType::Md.read_as(), Some(FileRenderType::Text));
        assert_eq!(PreviewType::Epub.read_as(), Some(FileRenderType::ArrayBuffer));
        assert_eq!(PreviewType::Audio.read_as(), Some(FileRenderType::Image));
        assert_eq!(PreviewType::None.read_as(), None);
    }

    #[test]
    fn test_props_extension_prefers_name() {
        let props = PreviewProps::from_url("https://example.com/download?id=1").with_name("a.PDF");
        assert_eq!(props.extension().as_deref(), Some("pdf"));
        assert_eq!(props.rule().kind, PreviewType::Pdf);
    }

    #[test]
    fn test_props_extension_from_url_path() {
        let props = PreviewProps::from_url("https://example.com/files/report.docx?token=x#top");
        assert_eq!(props.extension().as_deref(), Some("docx"));
    }

    #[test]
    fn test_props_without_source() {
        let props = PreviewProps::default();
        assert!(!props.has_source());
        assert_eq!(props.rule().kind, PreviewType::None);
    }
}
