//! Units of document content consumed by the [`LayoutEngine`](crate::LayoutEngine).

use crate::LayoutError;
use std::sync::Arc;
use tpt_style::{ParagraphStyle, TableStyle};

#[derive(Debug, Clone)]
pub enum Flowable {
    Paragraph(Paragraph),
    /// Vertical gap in points. Dropped when it would start a new page.
    Spacer(f32),
    /// Forces following content onto a new page.
    PageBreak,
    Table(Table),
}

impl From<Paragraph> for Flowable {
    fn from(p: Paragraph) -> Self {
        Flowable::Paragraph(p)
    }
}

impl From<Table> for Flowable {
    fn from(t: Table) -> Self {
        Flowable::Table(t)
    }
}

/// A run of text wrapped to the available width with a single style.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    text: String,
    style: Arc<ParagraphStyle>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: Arc<ParagraphStyle>) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &Arc<ParagraphStyle> {
        &self.style
    }
}

/// A grid of paragraphs with fixed column widths.
///
/// The first `header_rows` rows form the header, which is redrawn at the top
/// of every continuation page when the table style asks for it.
#[derive(Debug, Clone)]
pub struct Table {
    column_widths: Vec<f32>,
    rows: Vec<Vec<Paragraph>>,
    style: Arc<TableStyle>,
    header_rows: usize,
}

impl Table {
    /// Builds a table with one header row.
    ///
    /// Every row must have exactly one cell per column width, and widths must
    /// be finite and positive.
    pub fn new(
        column_widths: Vec<f32>,
        rows: Vec<Vec<Paragraph>>,
        style: Arc<TableStyle>,
    ) -> Result<Self, LayoutError> {
        for (column, width) in column_widths.iter().enumerate() {
            if !width.is_finite() || *width <= 0.0 {
                return Err(LayoutError::InvalidColumnWidth {
                    column,
                    width: *width,
                });
            }
        }
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != column_widths.len() {
                return Err(LayoutError::RaggedTable {
                    row,
                    found: cells.len(),
                    expected: column_widths.len(),
                });
            }
        }
        Ok(Self {
            header_rows: rows.len().min(1),
            column_widths,
            rows,
            style,
        })
    }

    /// Overrides the number of header rows, clamped to the row count.
    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows.min(self.rows.len());
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn header_rows(&self) -> usize {
        self.header_rows
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn rows(&self) -> &[Vec<Paragraph>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&[Paragraph]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Paragraph> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn style(&self) -> &Arc<TableStyle> {
        &self.style
    }
}
