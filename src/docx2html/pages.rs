//! Page-break normalization and pagination of converted markup.

use regex::Regex;
use std::sync::OnceLock;

const PAGE_OPEN: &str = "<div class=\"docx2html-root\">";
const PAGE_CLOSE: &str = "</div>";
const PAGE_BREAK_PARAGRAPH: &str = "<p style=\"page-break-before: always;\" class=\"page-break\">";

fn page_break_class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<p\b[^>]*class="[^"]*page-break[^"]*"[^>]*>"#)
            .expect("valid page-break class regex")
    })
}

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r#"(?i)<(?:p|div)\b[^>]*style="[^"]*page-break-before:\s*always[^"]*"[^>]*>"#,
            r#"|<p\b[^>]*class="[^"]*page-break[^"]*"[^>]*>"#,
            r#"|<hr\b[^>]*class="[^"]*page-break[^"]*"[^>]*>"#,
        ))
        .expect("valid page marker regex")
    })
}

/// Rewrites every `page-break` paragraph to carry an explicit `page-break-before`.
pub fn normalize_page_breaks(html: &str) -> String {
    page_break_class_regex()
        .replace_all(html, PAGE_BREAK_PARAGRAPH)
        .into_owned()
}

/// Splits markup at page markers. Each marker starts a new page and
/// whitespace-only pages are dropped.
pub fn split_pages(html: &str) -> Vec<&str> {
    let mut pages = Vec::new();
    let mut start = 0;

    for marker in marker_regex().find_iter(html) {
        let page = &html[start..marker.start()];
        if !page.trim().is_empty() {
            pages.push(page);
        }
        start = marker.start();
    }

    let last = &html[start..];
    if !last.trim().is_empty() {
        pages.push(last);
    }
    pages
}

/// Wraps each page in a `.docx2html-root` container, falling back to a
/// single container when nothing survives the split.
pub fn wrap_pages(html: &str) -> String {
    let pages = split_pages(html);
    if pages.is_empty() {
        return wrap(html);
    }
    pages.into_iter().map(wrap).collect()
}

fn wrap(page: &str) -> String {
    format!("{PAGE_OPEN}{page}{PAGE_CLOSE}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_without_markers_wraps_once() {
        assert_eq!(
            wrap_pages("<p>a</p><p>b</p>"),
            "<div class=\"docx2html-root\"><p>a</p><p>b</p></div>"
        );
    }

    #[test]
    fn test_each_marker_opens_a_page() {
        let html = "<p>a</p><hr class=\"page-break\" /><p>b</p>";
        assert_eq!(
            wrap_pages(html),
            "<div class=\"docx2html-root\"><p>a</p></div>\
             <div class=\"docx2html-root\"><hr class=\"page-break\" /><p>b</p></div>"
        );
    }

    #[test]
    fn test_leading_marker_does_not_create_empty_page() {
        let html = "  <div style=\"page-break-before: always\">x</div>";
        assert_eq!(split_pages(html), vec!["<div style=\"page-break-before: always\">x</div>"]);
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        let html = "<p>a</p><HR CLASS=\"page-break\"><p>b</p>";
        assert_eq!(split_pages(html).len(), 2);
    }

    #[test]
    fn test_pre_is_not_a_marker() {
        let html = "<pre style=\"page-break-before: always\">code</pre>";
        assert_eq!(split_pages(html), vec![html]);
    }

    #[test]
    fn test_whitespace_only_markup_falls_back_to_one_container() {
        assert_eq!(wrap_pages("   "), "<div class=\"docx2html-root\">   </div>");
    }

    #[test]
    fn test_normalize_rewrites_page_break_paragraphs() {
        let html = "<p class=\"intro page-break\">x</p><p class=\"other\">y</p>";
        assert_eq!(
            normalize_page_breaks(html),
            concat!(
                "<p style=\"page-break-before: always;\" class=\"page-break\">x</p>",
                "<p class=\"other\">y</p>"
            )
        );
    }
}
