use regex::Regex;
use std::sync::OnceLock;

fn script_open_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^<script\b").expect("valid script regex"))
}

fn script_close_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</script\s*>").expect("valid script regex"))
}

/// Removes `<script>` elements, leaving all other markup untouched.
/// Comments and quoted attribute values are copied as they are. An
/// unterminated script element is removed to the end of the input.
pub fn strip_scripts(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        rest = &rest[lt..];

        if rest.starts_with("<!--") {
            let end = rest[4..].find("-->").map_or(rest.len(), |i| i + 7);
            out.push_str(&rest[..end]);
            rest = &rest[end..];
        } else if script_open_regex().is_match(rest) {
            let body = &rest[tag_end(rest)..];
            rest = match script_close_regex().find(body) {
                Some(close) => &body[close.end()..],
                None => "",
            };
        } else if starts_tag(rest) {
            let end = tag_end(rest);
            out.push_str(&rest[..end]);
            rest = &rest[end..];
        } else {
            out.push('<');
            rest = &rest[1..];
        }
    }

    out.push_str(rest);
    out
}

fn starts_tag(s: &str) -> bool {
    match s.as_bytes().get(1) {
        Some(&b) => b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'),
        None => false,
    }
}

/// Byte offset just past the `>` closing the tag at the start of `s`.
fn tag_end(s: &str) -> usize {
    let mut quote = None;
    for (i, b) in s.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return i + 1,
            (None, _) => {}
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removes_scripts_and_keeps_markup() {
        let html =
            "<p class=x>a</p><script>alert(1)</script><p>b</p><SCRIPT src=\"x.js\"></Script >c";
        assert_eq!(strip_scripts(html), "<p class=x>a</p><p>b</p>c");
    }

    #[test]
    fn test_unterminated_script_removed_to_end() {
        assert_eq!(strip_scripts("<p>a</p><script>var x;"), "<p>a</p>");
    }

    #[test]
    fn test_similar_tags_survive() {
        let html = "<scripture>ok</scripture>";
        assert_eq!(strip_scripts(html), html);
    }

    #[test]
    fn test_script_text_in_attribute_value_is_kept() {
        let html = "<img alt=\"<script>x</script>\" src='a>b.png'><p>after</p>";
        assert_eq!(strip_scripts(html), html);
    }

    #[test]
    fn test_script_text_in_comment_is_kept() {
        let html = "<!-- <script>x</script> --><p>a</p><script>y</script>";
        assert_eq!(strip_scripts(html), "<!-- <script>x</script> --><p>a</p>");
    }

    #[test]
    fn test_script_open_tag_with_quoted_gt() {
        let html = "<p>a</p><script data-x=\"a>b\">run()</script><p>b</p>";
        assert_eq!(strip_scripts(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_bare_less_than_in_text() {
        let html = "<p>1 < 2 and it's fine</p><script>x</script>";
        assert_eq!(strip_scripts(html), "<p>1 < 2 and it's fine</p>");
    }
}
