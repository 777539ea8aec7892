//! Table converter - lays out rows and cells, resolving `gridSpan` and `vMerge`.

use super::{ConversionContext, ParagraphConverter};
use crate::core::ast::{BlockNode, TableCellNode, TableNode};
use crate::Result;
use rs_docx::document::{Table, TableCell, TableCellContent, TableRowContent};
use rs_docx::formatting::VMergeType;

/// Converter for Table elements.
pub struct TableConverter;

/// A vertically merged cell still accepting continuation rows.
struct OpenMerge {
    row: usize,
    cell: usize,
    column: usize,
    span: usize,
    last_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VerticalMerge {
    None,
    Restart,
    Continue,
}

impl TableConverter {
    /// Converts a Table into rows of cells. Continuation cells of a vertical
    /// merge are folded into the `rowspan` of the cell that started it.
    pub fn convert<'a>(
        table: &Table<'a>,
        context: &mut ConversionContext<'a>,
    ) -> Result<TableNode> {
        let mut rows: Vec<Vec<TableCellNode>> = Vec::with_capacity(table.rows.len());
        let mut open: Vec<OpenMerge> = Vec::new();

        for (row_idx, row) in table.rows.iter().enumerate() {
            let mut cells = Vec::new();
            let mut column = 0;

            for content in &row.cells {
                let TableRowContent::TableCell(cell) = content else {
                    continue;
                };
                let span = column_span(cell);

                match vertical_merge(cell) {
                    VerticalMerge::Continue => {
                        let covering = open
                            .iter_mut()
                            .find(|m| m.column <= column && column < m.column + m.span);
                        if let Some(merge) = covering {
                            // Split continuation cells under one master count once
                            if merge.last_row != row_idx {
                                merge.last_row = row_idx;
                                rows[merge.row][merge.cell].rowspan += 1;
                            }
                        }
                    }
                    merge => {
                        open.retain(|m| m.column + m.span <= column || column + span <= m.column);
                        if merge == VerticalMerge::Restart {
                            open.push(OpenMerge {
                                row: row_idx,
                                cell: cells.len(),
                                column,
                                span,
                                last_row: row_idx,
                            });
                        }
                        cells.push(TableCellNode {
                            blocks: Self::convert_cell_content(cell, context)?,
                            rowspan: 1,
                            colspan: span,
                        });
                    }
                }

                column += span;
            }

            rows.push(cells);
        }

        Ok(TableNode { rows })
    }

    /// Page breaks are dropped inside cells; pages never split a table.
    fn convert_cell_content<'a>(
        cell: &TableCell<'a>,
        context: &mut ConversionContext<'a>,
    ) -> Result<Vec<BlockNode>> {
        let mut blocks = Vec::new();
        for item in &cell.content {
            match item {
                TableCellContent::Paragraph(para) => {
                    blocks.extend(
                        ParagraphConverter::convert(para, context)?
                            .into_iter()
                            .filter(|block| *block != BlockNode::PageBreak),
                    );
                }
                TableCellContent::Table(table) => {
                    blocks.push(BlockNode::Table(Self::convert(table, context)?));
                }
            }
        }
        Ok(blocks)
    }
}

fn column_span(cell: &TableCell<'_>) -> usize {
    cell.property
        .grid_span
        .as_ref()
        .map(|span| (span.val as usize).max(1))
        .unwrap_or(1)
}

fn vertical_merge(cell: &TableCell<'_>) -> VerticalMerge {
    match &cell.property.v_merge {
        None => VerticalMerge::None,
        Some(v_merge) => match v_merge.val {
            Some(VMergeType::Restart) => VerticalMerge::Restart,
            _ => VerticalMerge::Continue,
        },
    }
}
