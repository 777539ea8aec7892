#[derive(Debug, Clone, Default)]
pub struct DocumentAst {
    pub blocks: Vec<BlockNode>,
    pub notes: NoteDefinitions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockNode {
    /// A paragraph-level element; `tag` is `p` or a heading tag.
    Paragraph {
        tag: String,
        class: Option<String>,
        html: String,
    },
    ListItem {
        ordered: bool,
        level: usize,
        html: String,
    },
    Table(TableNode),
    RawHtml(String),
    PageBreak,
}

/// A table laid out row by row. Cells covered by a merge are not listed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableNode {
    pub rows: Vec<Vec<TableCellNode>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCellNode {
    pub blocks: Vec<BlockNode>,
    pub rowspan: usize,
    pub colspan: usize,
}

#[derive(Debug, Clone, Default)]
pub struct NoteDefinitions {
    pub footnotes: Vec<String>,
    pub endnotes: Vec<String>,
}

impl NoteDefinitions {
    pub fn is_empty(&self) -> bool {
        self.footnotes.is_empty() && self.endnotes.is_empty()
    }
}
