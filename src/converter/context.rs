use super::image::{ImageExtractor, ImageLookup};
use super::{Message, NumberingResolver, StyleResolver};
use crate::core::ast::NoteDefinitions;
use crate::render::escape_html_text;
use crate::{MarkupOptions, Result};
use rs_docx::document::BodyContent;
use std::collections::{HashMap, HashSet};

/// Context passed through conversion for shared mutable state.
pub struct ConversionContext<'a> {
    rels: &'a HashMap<String, String>,
    numbering: &'a NumberingResolver,
    image_extractor: ImageExtractor<'a>,
    options: &'a MarkupOptions,
    style_resolver: &'a StyleResolver<'a>,
    footnotes: Vec<String>,
    footnote_index_by_id: HashMap<isize, usize>,
    footnote_text_by_id: HashMap<isize, String>,
    endnotes: Vec<String>,
    endnote_index_by_id: HashMap<isize, usize>,
    endnote_text_by_id: HashMap<isize, String>,
    reported_styles: HashSet<String>,
    messages: Vec<Message>,
}

fn note_text<'a>(content: &[BodyContent<'a>]) -> String {
    let text = content
        .iter()
        .filter_map(|bc| match bc {
            BodyContent::Paragraph(p) => Some(p.text().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ");
    escape_html_text(text.trim())
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        rels: &'a HashMap<String, String>,
        numbering: &'a NumberingResolver,
        image_extractor: ImageExtractor<'a>,
        options: &'a MarkupOptions,
        docx_footnotes: Option<&'a rs_docx::document::FootNotes<'a>>,
        docx_endnotes: Option<&'a rs_docx::document::EndNotes<'a>>,
        style_resolver: &'a StyleResolver<'a>,
    ) -> Self {
        let footnote_text_by_id = docx_footnotes
            .map(|footnotes| {
                footnotes
                    .content
                    .iter()
                    .filter_map(|footnote| footnote.id.map(|id| (id, note_text(&footnote.content))))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        let endnote_text_by_id = docx_endnotes
            .map(|endnotes| {
                endnotes
                    .content
                    .iter()
                    .filter_map(|endnote| endnote.id.map(|id| (id, note_text(&endnote.content))))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        Self {
            rels,
            numbering,
            image_extractor,
            options,
            style_resolver,
            footnotes: Vec::new(),
            footnote_index_by_id: HashMap::new(),
            footnote_text_by_id,
            endnotes: Vec::new(),
            endnote_index_by_id: HashMap::new(),
            endnote_text_by_id,
            reported_styles: HashSet::new(),
            messages: Vec::new(),
        }
    }

    /// Returns the reference marker for a footnote, registering its body on first use.
    pub fn register_footnote_reference(&mut self, id: isize) -> String {
        let idx = match self.footnote_index_by_id.get(&id).copied() {
            Some(idx) => idx,
            None => {
                let text = self.footnote_text_by_id.get(&id).cloned().unwrap_or_else(|| {
                    self.messages
                        .push(Message::warning(format!("Missing footnote: {id}")));
                    String::new()
                });
                self.footnotes.push(text);
                let idx = self.footnotes.len();
                self.footnote_index_by_id.insert(id, idx);
                idx
            }
        };
        note_marker("footnote", idx)
    }

    pub fn register_endnote_reference(&mut self, id: isize) -> String {
        let idx = match self.endnote_index_by_id.get(&id).copied() {
            Some(idx) => idx,
            None => {
                let text = self.endnote_text_by_id.get(&id).cloned().unwrap_or_else(|| {
                    self.messages
                        .push(Message::warning(format!("Missing endnote: {id}")));
                    String::new()
                });
                self.endnotes.push(text);
                let idx = self.endnotes.len();
                self.endnote_index_by_id.insert(id, idx);
                idx
            }
        };
        note_marker("endnote", idx)
    }

    pub fn note_definitions(&self) -> NoteDefinitions {
        NoteDefinitions {
            footnotes: self.footnotes.clone(),
            endnotes: self.endnotes.clone(),
        }
    }

    pub fn relationship_target(&self, id: &str) -> Option<&str> {
        self.rels.get(id).map(String::as_str)
    }

    /// `<img>` markup for a drawing, or nothing with a warning recorded.
    pub fn image_from_drawing(
        &mut self,
        drawing: &rs_docx::document::Drawing,
    ) -> Result<Option<String>> {
        let lookup = self.image_extractor.extract_from_drawing(drawing, self.rels)?;
        Ok(self.accept_image(lookup))
    }

    pub fn image_from_pict(&mut self, pict: &rs_docx::document::Pict) -> Result<Option<String>> {
        let lookup = self.image_extractor.extract_from_pict(pict, self.rels)?;
        Ok(self.accept_image(lookup))
    }

    fn accept_image(&mut self, lookup: ImageLookup) -> Option<String> {
        match lookup {
            ImageLookup::Html(html) => Some(html),
            ImageLookup::NoImageData => {
                self.messages.push(Message::warning(
                    "Drawing without image data (chart or embedded OLE object) was not converted",
                ));
                None
            }
            ImageLookup::Missing(target) => {
                self.messages
                    .push(Message::warning(format!("Image could not be found: {target}")));
                None
            }
        }
    }

    pub fn resolve_run_property(
        &self,
        direct_props: Option<&rs_docx::formatting::CharacterProperty<'a>>,
        run_style_id: Option<&str>,
        para_style_id: Option<&str>,
    ) -> rs_docx::formatting::CharacterProperty<'a> {
        self.style_resolver
            .resolve_run_property(direct_props, run_style_id, para_style_id)
    }

    pub fn resolve_paragraph_property(
        &self,
        direct_props: Option<&rs_docx::formatting::ParagraphProperty<'a>>,
        para_style_id: Option<&str>,
    ) -> rs_docx::formatting::ParagraphProperty<'a> {
        self.style_resolver
            .resolve_paragraph_property(direct_props, para_style_id)
    }

    pub fn style_name(&self, style_id: &str) -> Option<&'a str> {
        self.style_resolver.style_name(style_id)
    }

    pub fn options(&self) -> &'a MarkupOptions {
        self.options
    }

    pub fn is_ordered_list(&self, num_id: i32, ilvl: i32) -> bool {
        self.numbering.is_ordered(num_id, ilvl)
    }

    pub fn list_indent_level(&self, num_id: i32, ilvl: i32) -> usize {
        self.numbering.get_indent(num_id, ilvl)
    }

    /// Records an unrecognised paragraph style once per style id.
    pub fn report_unrecognised_style(&mut self, style_id: &str, style_name: &str) {
        if self.reported_styles.insert(style_id.to_string()) {
            self.messages.push(Message::warning(format!(
                "Unrecognised paragraph style: '{style_name}' (Style ID: {style_id})"
            )));
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.messages.push(Message::warning(message));
    }

    pub fn take_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }
}

fn note_marker(kind: &str, idx: usize) -> String {
    format!("<sup><a href=\"#{kind}-{idx}\" id=\"{kind}-ref-{idx}\">[{idx}]</a></sup>")
}
