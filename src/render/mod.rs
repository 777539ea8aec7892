mod escape;
mod html;
mod mime;

use crate::core::ast::DocumentAst;
use crate::Result;

pub use escape::{escape_html_attr, escape_html_text};
pub use html::HtmlRenderer;
pub use mime::mime_type_for_extension;

pub trait Renderer {
    fn render(&self, document: &DocumentAst) -> Result<String>;
}
