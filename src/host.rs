//! Shared document context: stylesheets, addressable elements and the blob store.
//!
//! A [`HostDocument`] is a cheap handle; clones share the same state. Most
//! callers use [`HostDocument::global`], tests create isolated instances.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

const BLOB_URL_PREFIX: &str = "blob:files-preview/";

#[derive(Debug, Clone, Default)]
pub struct HostDocument {
    inner: Arc<Mutex<HostState>>,
}

#[derive(Debug, Default)]
struct HostState {
    styles: Vec<StyleElement>,
    elements: HashMap<String, String>,
    blobs: HashMap<String, Blob>,
}

#[derive(Debug, Clone)]
struct StyleElement {
    id: String,
    css: String,
}

/// Binary payload behind a `blob:` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl HostDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide document.
    pub fn global() -> &'static HostDocument {
        static GLOBAL: OnceLock<HostDocument> = OnceLock::new();
        GLOBAL.get_or_init(HostDocument::new)
    }

    /// Registers a stylesheet under `id` unless one already exists.
    /// Returns whether it was inserted.
    pub fn ensure_style(&self, id: &str, css: &str) -> bool {
        if css.is_empty() {
            return false;
        }
        let mut state = self.inner.lock();
        if state.styles.iter().any(|style| style.id == id) {
            return false;
        }
        state.styles.push(StyleElement {
            id: id.to_string(),
            css: css.to_string(),
        });
        tracing::debug!(style_id = id, "injected stylesheet");
        true
    }

    pub fn style(&self, id: &str) -> Option<String> {
        self.inner
            .lock()
            .styles
            .iter()
            .find(|style| style.id == id)
            .map(|style| style.css.clone())
    }

    pub fn style_count(&self, id: &str) -> usize {
        self.inner
            .lock()
            .styles
            .iter()
            .filter(|style| style.id == id)
            .count()
    }

    /// Creates (or returns) the element with the given id.
    pub fn create_element(&self, id: &str) -> ElementRef {
        self.inner
            .lock()
            .elements
            .entry(id.to_string())
            .or_default();
        self.element_ref(id)
    }

    /// Resolves `#id` or a bare id to a live element.
    pub fn query_selector(&self, selector: &str) -> Option<ElementRef> {
        let selector = selector.trim();
        let id = selector.strip_prefix('#').unwrap_or(selector);
        if id.is_empty() || id.contains(|c: char| c.is_whitespace() || ".[]>:".contains(c)) {
            return None;
        }
        if self.inner.lock().elements.contains_key(id) {
            Some(self.element_ref(id))
        } else {
            None
        }
    }

    pub fn remove_element(&self, id: &str) -> bool {
        self.inner.lock().elements.remove(id).is_some()
    }

    /// Stores `data` and returns a `blob:` reference to it.
    pub fn create_object_url(&self, data: Vec<u8>, content_type: &str) -> String {
        let url = format!("{}{}", BLOB_URL_PREFIX, Uuid::new_v4());
        let content_type = if content_type.is_empty() {
            "application/octet-stream"
        } else {
            content_type
        };
        self.inner.lock().blobs.insert(
            url.clone(),
            Blob {
                content_type: content_type.to_string(),
                data,
            },
        );
        url
    }

    pub fn blob(&self, url: &str) -> Option<Blob> {
        self.inner.lock().blobs.get(url).cloned()
    }

    pub fn revoke_object_url(&self, url: &str) -> bool {
        self.inner.lock().blobs.remove(url).is_some()
    }

    /// Number of live `blob:` references.
    pub fn blob_count(&self) -> usize {
        self.inner.lock().blobs.len()
    }

    fn element_ref(&self, id: &str) -> ElementRef {
        ElementRef {
            id: id.to_string(),
            host: self.clone(),
        }
    }
}

/// Handle to an element in a [`HostDocument`].
#[derive(Debug, Clone)]
pub struct ElementRef {
    id: String,
    host: HostDocument,
}

impl ElementRef {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current content, empty once the element is removed.
    pub fn inner_html(&self) -> String {
        self.host
            .inner
            .lock()
            .elements
            .get(&self.id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the content. Returns `false` if the element is no longer attached.
    pub fn set_inner_html(&self, html: impl Into<String>) -> bool {
        match self.host.inner.lock().elements.get_mut(&self.id) {
            Some(content) => {
                *content = html.into();
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.host.inner.lock().elements.contains_key(&self.id)
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.host.inner, &other.host.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_style_is_idempotent() {
        let host = HostDocument::new();
        assert!(host.ensure_style("s", "p { margin: 0; }"));
        assert!(!host.ensure_style("s", "p { margin: 1em; }"));
        assert_eq!(host.style_count("s"), 1);
        assert_eq!(host.style("s").as_deref(), Some("p { margin: 0; }"));
    }

    #[test]
    fn test_empty_css_is_not_injected() {
        let host = HostDocument::new();
        assert!(!host.ensure_style("s", ""));
        assert_eq!(host.style_count("s"), 0);
    }

    #[test]
    fn test_query_selector_accepts_hash_and_bare_ids() {
        let host = HostDocument::new();
        let el = host.create_element("viewer");
        assert_eq!(host.query_selector("#viewer"), Some(el.clone()));
        assert_eq!(host.query_selector("viewer"), Some(el));
        assert!(host.query_selector("#missing").is_none());
        assert!(host.query_selector(".viewer").is_none());
    }

    #[test]
    fn test_removed_element_is_disconnected() {
        let host = HostDocument::new();
        let el = host.create_element("a");
        assert!(el.set_inner_html("<p>x</p>"));
        assert_eq!(el.inner_html(), "<p>x</p>");
        assert!(host.remove_element("a"));
        assert!(!el.is_connected());
        assert!(!el.set_inner_html("<p>y</p>"));
    }

    #[test]
    fn test_blob_urls_resolve_until_revoked() {
        let host = HostDocument::new();
        let url = host.create_object_url(vec![1, 2], "image/gif");
        assert!(url.starts_with("blob:files-preview/"));
        assert_eq!(
            host.blob(&url),
            Some(Blob {
                content_type: "image/gif".to_string(),
                data: vec![1, 2],
            })
        );
        assert_eq!(host.blob_count(), 1);
        assert!(host.revoke_object_url(&url));
        assert!(host.blob(&url).is_none());
        assert_eq!(host.blob_count(), 0);
    }
}
