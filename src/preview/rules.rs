//! Preview rule table - maps file extensions to preview categories.

use super::renderer::{self, PreviewRenderer, RendererLoader};
use super::PreviewType;
use std::fmt;
use std::sync::Arc;

/// One entry of the dispatch table.
#[derive(Clone, Copy)]
pub struct PreviewRule {
    pub name: &'static str,
    pub kind: PreviewType,
    /// Lowercase extensions without the leading dot.
    pub accept: &'static [&'static str],
    /// Deferred renderer factory; `None` marks a recognized but unsupported category.
    pub renderer: Option<RendererLoader>,
}

impl PreviewRule {
    pub fn accepts(&self, extension: &str) -> bool {
        self.accept.iter().any(|accepted| *accepted == extension)
    }

    /// Loads the renderer for this rule. Nothing is constructed until this is called.
    pub fn load_renderer(&self) -> Option<Arc<dyn PreviewRenderer>> {
        self.renderer.map(|load| load())
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }
}

impl fmt::Debug for PreviewRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewRule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("accept", &self.accept)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

impl PartialEq for PreviewRule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

// Declaration order is lookup order: the first rule accepting an extension wins.
static PREVIEW_RULES: [PreviewRule; 13] = [
    PreviewRule {
        name: "none",
        kind: PreviewType::None,
        accept: &[],
        renderer: None,
    },
    PreviewRule {
        name: "code",
        kind: PreviewType::Code,
        accept: &[
            "html", "css", "less", "scss", "js", "json", "ts", "vue", "c", "cpp", "java", "py",
            "go", "php", "lua", "rb", "pl", "swift", "vb", "cs", "sh", "rs", "vim", "log", "lock",
            "swift", "mod", "mht", "mhtml", "xml",
        ],
        renderer: Some(renderer::load_code_renderer),
    },
    PreviewRule {
        name: "doc",
        kind: PreviewType::Doc,
        accept: &[
            "doc", "docm", "dot", "dotm", "dotx", "fodt", "mht", "odt", "ott", "rtf", "djvu", "xps",
        ],
        renderer: None,
    },
    PreviewRule {
        name: "docx",
        kind: PreviewType::Docx,
        accept: &["docx"],
        renderer: Some(renderer::load_docx_renderer),
    },
    PreviewRule {
        name: "xlsx",
        kind: PreviewType::Xlsx,
        accept: &["xlsx", "xls", "csv", "fods", "ods", "ots", "xlsm", "xlt", "xltm"],
        renderer: Some(renderer::load_xlsx_renderer),
    },
    PreviewRule {
        name: "ppt",
        kind: PreviewType::Ppt,
        accept: &[
            "ppt", "pptx", "fodp", "odp", "otp", "pot", "potm", "potx", "pps", "ppsm", "ppsx",
            "pptm",
        ],
        renderer: None,
    },
    PreviewRule {
        name: "pdf",
        kind: PreviewType::Pdf,
        accept: &["pdf"],
        renderer: Some(renderer::load_pdf_renderer),
    },
    PreviewRule {
        name: "epub",
        kind: PreviewType::Epub,
        accept: &["epub"],
        renderer: Some(renderer::load_epub_renderer),
    },
    PreviewRule {
        name: "md",
        kind: PreviewType::Md,
        accept: &["md"],
        renderer: Some(renderer::load_md_renderer),
    },
    PreviewRule {
        name: "pic",
        kind: PreviewType::Pic,
        accept: &["jpg", "png", "jpeg", "webp", "gif", "bmp", "svg", "ico"],
        renderer: Some(renderer::load_pic_renderer),
    },
    PreviewRule {
        name: "txt",
        kind: PreviewType::Txt,
        accept: &["txt"],
        renderer: Some(renderer::load_txt_renderer),
    },
    PreviewRule {
        name: "audio",
        kind: PreviewType::Audio,
        accept: &["mp3", "wav", "wma", "ogg", "aac", "flac"],
        renderer: Some(renderer::load_audio_renderer),
    },
    PreviewRule {
        name: "video",
        kind: PreviewType::Video,
        accept: &["mp4", "webm", "ogg", "mkv", "avi", "mpeg", "flv", "mov", "wmv"],
        renderer: Some(renderer::load_video_renderer),
    },
];

/// All rules, in lookup order.
pub fn preview_rules() -> &'static [PreviewRule] {
    &PREVIEW_RULES
}

/// The rule registered for a category.
pub fn rule_for(kind: PreviewType) -> &'static PreviewRule {
    PREVIEW_RULES
        .iter()
        .find(|rule| rule.kind == kind)
        .unwrap_or(&PREVIEW_RULES[0])
}

/// Canonical form of an extension: trimmed, no leading dot, lowercase.
pub fn normalize_extension(extension: &str) -> String {
    extension
        .trim()
        .trim_start_matches('.')
        .to_ascii_lowercase()
}

/// Finds the first rule accepting `extension`, falling back to the `None` rule.
pub fn rule_by_file_type(extension: &str) -> &'static PreviewRule {
    let extension = normalize_extension(extension);
    if extension.is_empty() {
        return rule_for(PreviewType::None);
    }
    PREVIEW_RULES
        .iter()
        .find(|rule| rule.accepts(&extension))
        .unwrap_or_else(|| rule_for(PreviewType::None))
}

pub fn preview_type_by_file_type(extension: &str) -> PreviewType {
    rule_by_file_type(extension).kind
}

/// Extracts the normalized extension from a file name, path or URL.
pub fn extension_of(name: &str) -> Option<String> {
    let without_query = name.split(['?', '#']).next().unwrap_or_default();
    let file_name = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query);
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = normalize_extension(ext);
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
