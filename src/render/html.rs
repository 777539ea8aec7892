use crate::core::ast::{BlockNode, DocumentAst, NoteDefinitions, TableNode};
use crate::render::{escape_html_attr, Renderer};
use crate::Result;

/// Serializes the document tree as an HTML fragment with no whitespace between blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, document: &DocumentAst) -> Result<String> {
        let mut out = render_blocks(&document.blocks);
        render_notes(&document.notes, &mut out);
        Ok(out)
    }
}

/// Renders a block sequence, grouping consecutive list items into nested lists.
fn render_blocks(blocks: &[BlockNode]) -> String {
    let mut out = String::new();
    let mut open_lists: Vec<bool> = Vec::new();

    for block in blocks {
        if let BlockNode::ListItem {
            ordered,
            level,
            html,
        } = block
        {
            let depth = level + 1;
            while open_lists.len() > depth {
                close_list(&mut out, &mut open_lists);
            }
            if open_lists.len() == depth && open_lists.last() != Some(ordered) {
                close_list(&mut out, &mut open_lists);
            }
            if open_lists.len() == depth {
                out.push_str("</li>");
            }
            while open_lists.len() < depth {
                out.push_str(list_tag(*ordered, true));
                open_lists.push(*ordered);
            }
            out.push_str("<li>");
            out.push_str(html);
            continue;
        }

        while !open_lists.is_empty() {
            close_list(&mut out, &mut open_lists);
        }

        match block {
            BlockNode::Paragraph { tag, class, html } => {
                match class {
                    Some(class) => out.push_str(&format!(
                        "<{} class=\"{}\">",
                        tag,
                        escape_html_attr(class)
                    )),
                    None => out.push_str(&format!("<{}>", tag)),
                }
                out.push_str(html);
                out.push_str(&format!("</{}>", tag));
            }
            BlockNode::Table(table) => render_table(table, &mut out),
            BlockNode::RawHtml(html) => out.push_str(html),
            BlockNode::PageBreak => out.push_str("<hr class=\"page-break\" />"),
            BlockNode::ListItem { .. } => {}
        }
    }

    while !open_lists.is_empty() {
        close_list(&mut out, &mut open_lists);
    }
    out
}

fn render_table(table: &TableNode, out: &mut String) {
    out.push_str("<table>");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td");
            if cell.rowspan > 1 {
                out.push_str(&format!(" rowspan=\"{}\"", cell.rowspan));
            }
            if cell.colspan > 1 {
                out.push_str(&format!(" colspan=\"{}\"", cell.colspan));
            }
            out.push('>');
            out.push_str(&render_blocks(&cell.blocks));
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

fn close_list(out: &mut String, open_lists: &mut Vec<bool>) {
    if let Some(ordered) = open_lists.pop() {
        out.push_str("</li>");
        out.push_str(list_tag(ordered, false));
    }
}

fn list_tag(ordered: bool, open: bool) -> &'static str {
    match (ordered, open) {
        (true, true) => "<ol>",
        (true, false) => "</ol>",
        (false, true) => "<ul>",
        (false, false) => "</ul>",
    }
}

fn render_notes(notes: &NoteDefinitions, out: &mut String) {
    if notes.is_empty() {
        return;
    }
    for (prefix, bodies) in [("footnote", &notes.footnotes), ("endnote", &notes.endnotes)] {
        if bodies.is_empty() {
            continue;
        }
        out.push_str("<ol>");
        for (i, body) in bodies.iter().enumerate() {
            let n = i + 1;
            out.push_str(&format!(
                "<li id=\"{prefix}-{n}\"><p>{body} <a href=\"#{prefix}-ref-{n}\">↑</a></p></li>"
            ));
        }
        out.push_str("</ol>");
    }
}
