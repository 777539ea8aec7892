//! Paragraph style mappings of the form `p[style-name='Page Break'] => p.page-break`.

use regex::Regex;
use std::sync::OnceLock;

/// Maps a named paragraph style to an output element and optional class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleMapping {
    pub style_name: String,
    pub tag: String,
    pub class: Option<String>,
}

fn mapping_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^\s*p\[style-name='([^']+)'\]\s*=>\s*",
            r"(p|h[1-6]|div|blockquote|pre)(?:\.([A-Za-z0-9_-]+))?\s*$",
        ))
        .expect("style mapping pattern is valid")
    })
}

impl StyleMapping {
    /// Parses one mapping line; `None` for anything outside the supported subset.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = mapping_regex().captures(line)?;
        Some(Self {
            style_name: caps[1].to_string(),
            tag: caps[2].to_string(),
            class: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }

    pub fn matches(&self, style_name: &str) -> bool {
        self.style_name == style_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_break_mapping() {
        let mapping = StyleMapping::parse("p[style-name='Page Break'] => p.page-break").unwrap();
        assert_eq!(mapping.style_name, "Page Break");
        assert_eq!(mapping.tag, "p");
        assert_eq!(mapping.class.as_deref(), Some("page-break"));
    }

    #[test]
    fn test_parse_without_class() {
        let mapping = StyleMapping::parse("p[style-name='Quote'] => blockquote").unwrap();
        assert_eq!(mapping.tag, "blockquote");
        assert_eq!(mapping.class, None);
    }

    #[test]
    fn test_rejects_unsupported_mappings() {
        assert!(StyleMapping::parse("r[style-name='Strong'] => strong").is_none());
        assert!(StyleMapping::parse("p.Heading1 => h1").is_none());
        assert!(StyleMapping::parse("").is_none());
    }
}
