//! Paragraph converter - handles paragraph elements and their structure.

use super::run::{FieldPhase, InlinePiece};
use super::styles::parse_heading_style;
use super::{ConversionContext, RunConverter};
use crate::core::ast::BlockNode;
use crate::render::escape_html_attr;
use crate::Result;
use rs_docx::document::{BodyContent, Hyperlink, Paragraph, ParagraphContent};

/// Converter for Paragraph elements.
pub struct ParagraphConverter;

/// Where a paragraph's content goes once its style is resolved.
#[derive(Debug, Clone, PartialEq)]
enum ParagraphTarget {
    Element { tag: String, class: Option<String> },
    ListItem { ordered: bool, level: usize },
}

impl ParagraphConverter {
    /// Converts a Paragraph to blocks. Page breaks inside the paragraph split it
    /// into several blocks of the same kind around a [`BlockNode::PageBreak`].
    pub fn convert<'a>(
        para: &Paragraph<'a>,
        context: &mut ConversionContext<'a>,
    ) -> Result<Vec<BlockNode>> {
        let pieces = RunConverter::merge_pieces(Self::collect_pieces(para, context)?);
        let target = Self::resolve_target(para, context);

        let mut blocks = Vec::new();
        let mut chunk: Vec<InlinePiece> = Vec::new();
        for piece in pieces {
            if piece == InlinePiece::PageBreak {
                Self::push_chunk(&mut blocks, std::mem::take(&mut chunk), &target);
                blocks.push(BlockNode::PageBreak);
            } else {
                chunk.push(piece);
            }
        }
        Self::push_chunk(&mut blocks, chunk, &target);

        Ok(blocks)
    }

    fn push_chunk(blocks: &mut Vec<BlockNode>, chunk: Vec<InlinePiece>, target: &ParagraphTarget) {
        let has_content = chunk.iter().any(|piece| match piece {
            InlinePiece::Segment(seg) => !seg.html.trim().is_empty(),
            InlinePiece::Markup(markup) => !markup.starts_with("<a id="),
            InlinePiece::PageBreak => false,
        });

        let html: String = chunk
            .iter()
            .map(|piece| match piece {
                InlinePiece::Segment(seg) => seg.to_html(),
                InlinePiece::Markup(markup) => markup.clone(),
                InlinePiece::PageBreak => String::new(),
            })
            .collect();

        if !has_content {
            // Bookmarks on an otherwise empty paragraph still need a target
            let anchors: String = chunk
                .iter()
                .filter_map(|piece| match piece {
                    InlinePiece::Markup(markup) if markup.starts_with("<a id=") => {
                        Some(markup.as_str())
                    }
                    _ => None,
                })
                .collect();
            if !anchors.is_empty() {
                blocks.push(BlockNode::RawHtml(anchors));
            }
            return;
        }

        let html = html.trim().to_string();
        match target {
            ParagraphTarget::Element { tag, class } => blocks.push(BlockNode::Paragraph {
                tag: tag.clone(),
                class: class.clone(),
                html,
            }),
            ParagraphTarget::ListItem { ordered, level } => blocks.push(BlockNode::ListItem {
                ordered: *ordered,
                level: *level,
                html,
            }),
        }
    }

    /// Style mapping first, then built-in headings, then numbering, then `<p>`.
    fn resolve_target<'a>(
        para: &Paragraph<'a>,
        context: &mut ConversionContext<'a>,
    ) -> ParagraphTarget {
        let para_style_id = para
            .property
            .as_ref()
            .and_then(|p| p.style_id.as_ref())
            .map(|s| s.value.to_string());

        let effective_props =
            context.resolve_paragraph_property(para.property.as_ref(), para_style_id.as_deref());

        let style_id = effective_props
            .style_id
            .as_ref()
            .map(|style| style.value.to_string());
        let style_name = style_id
            .as_deref()
            .map(|id| context.style_name(id).unwrap_or(id).to_string());

        if let Some(name) = &style_name {
            if let Some(mapping) = context.options().style_map.iter().find(|m| m.matches(name)) {
                return ParagraphTarget::Element {
                    tag: mapping.tag.clone(),
                    class: mapping.class.clone(),
                };
            }

            if context.options().include_default_style_map {
                if let Some(level) = parse_heading_style(name) {
                    return ParagraphTarget::Element {
                        tag: format!("h{}", level),
                        class: None,
                    };
                }
            }
        }

        if let Some(num_pr) = &effective_props.numbering {
            if let (Some(num_id), Some(ilvl)) = (&num_pr.id, &num_pr.level) {
                let num_id = num_id.value as i32;
                let ilvl = ilvl.value as i32;
                return ParagraphTarget::ListItem {
                    ordered: context.is_ordered_list(num_id, ilvl),
                    level: context.list_indent_level(num_id, ilvl),
                };
            }
        }

        if let (Some(id), Some(name)) = (&style_id, &style_name) {
            if !is_default_paragraph_style(name) {
                context.report_unrecognised_style(id, name);
            }
        }

        ParagraphTarget::Element {
            tag: "p".to_string(),
            class: None,
        }
    }

    /// Collects inline pieces from paragraph content.
    fn collect_pieces<'a>(
        para: &Paragraph<'a>,
        context: &mut ConversionContext<'a>,
    ) -> Result<Vec<InlinePiece>> {
        let mut pieces = Vec::new();
        let mut field_stack = Vec::new();

        let para_style_id = para
            .property
            .as_ref()
            .and_then(|p| p.style_id.as_ref())
            .map(|s| s.value.to_string());

        for content in &para.content {
            match content {
                ParagraphContent::Run(run) => {
                    let filtered_run =
                        RunConverter::filter_run_by_field_state(run, &mut field_stack);
                    if filtered_run.content.is_empty() {
                        continue;
                    }
                    pieces.extend(RunConverter::convert(
                        &filtered_run,
                        context,
                        para_style_id.as_deref(),
                    )?);
                }
                ParagraphContent::Link(hyperlink) => {
                    if let Some(link) =
                        Self::convert_hyperlink(hyperlink, context, para_style_id.as_deref())?
                    {
                        pieces.push(InlinePiece::Markup(link));
                    }
                }
                ParagraphContent::BookmarkStart(bookmark) => {
                    if let Some(name) = &bookmark.name {
                        // _GoBack marks the last edit position, not a real target
                        if name.as_ref() != "_GoBack" {
                            pieces.push(InlinePiece::Markup(format!(
                                "<a id=\"{}\"></a>",
                                escape_html_attr(name)
                            )));
                        }
                    }
                }
                ParagraphContent::SDT(sdt) => {
                    if let Some(sdt_content) = &sdt.content {
                        for bc in &sdt_content.content {
                            if let BodyContent::Paragraph(inner_para) = bc {
                                pieces.extend(Self::collect_pieces(inner_para, context)?);
                            }
                        }
                    }
                }
                ParagraphContent::Insertion(ins) => {
                    for run in &ins.runs {
                        pieces.extend(RunConverter::convert(
                            run,
                            context,
                            para_style_id.as_deref(),
                        )?);
                    }
                }
                // Deleted text is not part of the rendered document.
                ParagraphContent::Deletion(_) => {}
                _ => {}
            }
        }

        Ok(pieces)
    }

    /// Converts a hyperlink to an `<a>` element; `None` when it has no visible text.
    fn convert_hyperlink<'a>(
        hyperlink: &Hyperlink<'a>,
        context: &mut ConversionContext<'a>,
        para_style_id: Option<&str>,
    ) -> Result<Option<String>> {
        let mut field_stack: Vec<FieldPhase> = Vec::new();
        let mut pieces = Vec::new();
        for run in &hyperlink.content {
            let filtered_run = RunConverter::filter_run_by_field_state(run, &mut field_stack);
            if filtered_run.content.is_empty() {
                continue;
            }
            pieces.extend(RunConverter::convert(&filtered_run, context, para_style_id)?);
        }

        let link_html: String = RunConverter::merge_pieces(pieces)
            .iter()
            .map(|piece| match piece {
                InlinePiece::Segment(seg) => seg.to_html(),
                InlinePiece::Markup(markup) => markup.clone(),
                InlinePiece::PageBreak => String::new(),
            })
            .collect();

        if link_html.trim().is_empty() {
            return Ok(None);
        }

        let href = if let Some(anchor) = &hyperlink.anchor {
            // Internal bookmark link (used in TOC entries)
            format!("#{}", anchor)
        } else if let Some(id) = &hyperlink.id {
            context
                .relationship_target(id.as_ref())
                .map(str::to_owned)
                .unwrap_or_else(|| "#".to_string())
        } else {
            "#".to_string()
        };

        Ok(Some(format!(
            "<a href=\"{}\">{}</a>",
            escape_html_attr(&href),
            link_html
        )))
    }
}

fn is_default_paragraph_style(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "normal" | "default paragraph font" | "list paragraph" | "body text"
    )
}
