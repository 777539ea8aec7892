//! Run element converter - handles text runs with formatting.

use super::ConversionContext;
use crate::render::escape_html_text;
use crate::Result;
use rs_docx::document::{BreakType, CharType, Run, RunContent};

/// Converter for Run elements.
pub struct RunConverter;

/// Inline HTML with consistent styling.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct FormattedSegment {
    pub html: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub has_underline: bool,
    pub has_strike: bool,
}

impl FormattedSegment {
    fn same_format(&self, other: &Self) -> bool {
        self.is_bold == other.is_bold
            && self.is_italic == other.is_italic
            && self.has_underline == other.has_underline
            && self.has_strike == other.has_strike
    }

    /// Wraps the segment in its formatting tags.
    pub fn to_html(&self) -> String {
        let mut text = self.html.clone();
        if self.has_underline {
            text = format!("<u>{}</u>", text);
        }
        if self.has_strike {
            text = format!("<s>{}</s>", text);
        }
        if self.is_bold && self.is_italic {
            text = format!("<strong><em>{}</em></strong>", text);
        } else if self.is_bold {
            text = format!("<strong>{}</strong>", text);
        } else if self.is_italic {
            text = format!("<em>{}</em>", text);
        }
        text
    }
}

/// Paragraph content in document order; page breaks split the paragraph.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum InlinePiece {
    Segment(FormattedSegment),
    /// Raw markup that carries no run formatting (anchors, links).
    Markup(String),
    PageBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldPhase {
    Instruction,
    Result,
}

impl RunConverter {
    /// Filters a run so only field-visible content remains, updating field stack.
    pub(crate) fn filter_run_by_field_state<'a>(
        run: &Run<'a>,
        field_stack: &mut Vec<FieldPhase>,
    ) -> Run<'a> {
        let mut filtered = run.clone();
        filtered.content.clear();

        for content in &run.content {
            match content {
                RunContent::FieldChar(fc) => {
                    if let Some(char_type) = &fc.ty {
                        match char_type {
                            CharType::Begin => field_stack.push(FieldPhase::Instruction),
                            CharType::Separate => {
                                if let Some(last) = field_stack.last_mut() {
                                    *last = FieldPhase::Result;
                                }
                            }
                            CharType::End => {
                                let _ = field_stack.pop();
                            }
                        }
                    }
                }
                // Field instructions are never rendered.
                RunContent::InstrText(_) | RunContent::DelInstrText(_) => {}
                _ => {
                    if field_stack.last() != Some(&FieldPhase::Instruction) {
                        filtered.content.push(content.clone());
                    }
                }
            }
        }

        filtered
    }

    /// Converts a Run to inline pieces, resolving its effective formatting.
    pub(crate) fn convert<'a>(
        run: &Run<'a>,
        context: &mut ConversionContext<'a>,
        para_style_id: Option<&str>,
    ) -> Result<Vec<InlinePiece>> {
        let run_style_id = run
            .property
            .as_ref()
            .and_then(|props| props.style_id.as_ref())
            .map(|style| style.value.as_ref());

        let props =
            context.resolve_run_property(run.property.as_ref(), run_style_id, para_style_id);

        let template = FormattedSegment {
            html: String::new(),
            is_bold: props
                .bold
                .as_ref()
                .map(|b| b.value.unwrap_or(true))
                .unwrap_or(false),
            is_italic: props
                .italics
                .as_ref()
                .map(|i| i.value.unwrap_or(true))
                .unwrap_or(false),
            has_underline: props.underline.is_some(),
            has_strike: props
                .strike
                .as_ref()
                .map(|s| s.value.unwrap_or(true))
                .unwrap_or(false),
        };

        let mut pieces = Vec::new();
        let mut html = String::new();

        for content in &run.content {
            match content {
                RunContent::Text(t) => html.push_str(&escape_html_text(&t.text)),
                RunContent::Tab(_) => html.push('\t'),
                RunContent::Break(br) => match br.ty {
                    Some(BreakType::Page) => {
                        flush(&mut pieces, &mut html, &template);
                        pieces.push(InlinePiece::PageBreak);
                    }
                    _ => html.push_str("<br />"),
                },
                RunContent::CarriageReturn(_) => html.push_str("<br />"),
                RunContent::Drawing(drawing) => {
                    if let Some(img) = context.image_from_drawing(drawing)? {
                        html.push_str(&img);
                    }
                }
                RunContent::Pict(pict) => {
                    if let Some(img) = context.image_from_pict(pict)? {
                        html.push_str(&img);
                    }
                }
                RunContent::Sym(sym) => {
                    if let Some(c) = sym
                        .char
                        .as_ref()
                        .and_then(|code| u32::from_str_radix(code, 16).ok())
                        .and_then(char::from_u32)
                    {
                        html.push_str(&escape_html_text(&c.to_string()));
                    }
                }
                RunContent::FootnoteReference(fnref) => {
                    if let Some(id) = fnref.id.as_ref().and_then(|id| id.parse::<isize>().ok()) {
                        flush(&mut pieces, &mut html, &template);
                        let marker = context.register_footnote_reference(id);
                        pieces.push(InlinePiece::Markup(marker));
                    }
                }
                RunContent::EndnoteReference(enref) => {
                    if let Some(id) = enref.id.as_ref().and_then(|id| id.parse::<isize>().ok()) {
                        flush(&mut pieces, &mut html, &template);
                        let marker = context.register_endnote_reference(id);
                        pieces.push(InlinePiece::Markup(marker));
                    }
                }
                _ => {}
            }
        }

        flush(&mut pieces, &mut html, &template);
        Ok(pieces)
    }

    /// Merges adjacent segments with identical formatting.
    pub(crate) fn merge_pieces(pieces: Vec<InlinePiece>) -> Vec<InlinePiece> {
        let mut merged: Vec<InlinePiece> = Vec::new();

        for piece in pieces {
            if let (Some(InlinePiece::Segment(last)), InlinePiece::Segment(seg)) =
                (merged.last_mut(), &piece)
            {
                if last.same_format(seg) {
                    last.html.push_str(&seg.html);
                    continue;
                }
            }
            merged.push(piece);
        }

        merged
    }
}

fn flush(pieces: &mut Vec<InlinePiece>, html: &mut String, template: &FormattedSegment) {
    if html.is_empty() {
        return;
    }
    pieces.push(InlinePiece::Segment(FormattedSegment {
        html: std::mem::take(html),
        ..template.clone()
    }));
}
