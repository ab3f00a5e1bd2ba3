//! Turns a [`Dataset`] into a styled [`Table`] flowable.
//!
//! The first row holds the column names; every data cell becomes its own
//! paragraph so it wraps independently and can carry its own style. Cells
//! whose text is a protection outcome are drawn in the matching category
//! style.

use crate::model::{Dataset, Protection};
use crate::report::styles;
use std::sync::Arc;
use thiserror::Error;
use tpt_layout::{LayoutError, Paragraph, Table};
use tpt_style::{ParagraphStyle, StyleError, StyleRegistry, TableStyle};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Expected {expected} {what} (one per column), got {found}")]
    ColumnCountMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("A table needs at least one column")]
    NoColumns,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCategory {
    Blocked,
    NotBlocked,
    Plain,
}

impl CellCategory {
    /// Only the exact protection texts are categorised.
    pub fn classify(value: &str) -> Self {
        if value == Protection::Blocked.as_str() {
            CellCategory::Blocked
        } else if value == Protection::NotBlocked.as_str() {
            CellCategory::NotBlocked
        } else {
            CellCategory::Plain
        }
    }
}

/// Styles that override a column's body style for categorised cells.
#[derive(Debug, Clone)]
pub struct CategoryStyles {
    pub blocked: Arc<ParagraphStyle>,
    pub not_blocked: Arc<ParagraphStyle>,
}

impl CategoryStyles {
    pub fn from_registry(registry: &StyleRegistry) -> Result<Self, StyleError> {
        Ok(Self {
            blocked: registry.get(styles::CELL_BLOCKED)?,
            not_blocked: registry.get(styles::CELL_NOT_BLOCKED)?,
        })
    }

    pub fn style_for<'a>(
        &'a self,
        category: CellCategory,
        plain: &'a Arc<ParagraphStyle>,
    ) -> &'a Arc<ParagraphStyle> {
        match category {
            CellCategory::Blocked => &self.blocked,
            CellCategory::NotBlocked => &self.not_blocked,
            CellCategory::Plain => plain,
        }
    }
}

/// Builds a table whose first row is the dataset's column names.
///
/// `column_widths` and `column_styles` must each hold one entry per column.
/// An empty dataset yields a header-only table.
pub fn format_table(
    dataset: &Dataset,
    header_style: &Arc<ParagraphStyle>,
    column_widths: &[f32],
    column_styles: &[Arc<ParagraphStyle>],
    category_styles: &CategoryStyles,
    table_style: Arc<TableStyle>,
) -> Result<Table, TableError> {
    let columns = dataset.column_count();
    if columns == 0 {
        return Err(TableError::NoColumns);
    }
    for (what, found) in [
        ("column widths", column_widths.len()),
        ("column styles", column_styles.len()),
    ] {
        if found != columns {
            return Err(TableError::ColumnCountMismatch {
                what,
                expected: columns,
                found,
            });
        }
    }

    let mut rows = Vec::with_capacity(dataset.len() + 1);
    rows.push(
        dataset
            .columns()
            .iter()
            .map(|name| Paragraph::new(name.as_str(), header_style.clone()))
            .collect(),
    );
    for record in dataset.rows() {
        rows.push(
            record
                .iter()
                .zip(column_styles)
                .map(|(value, plain)| {
                    let style = category_styles.style_for(CellCategory::classify(value), plain);
                    Paragraph::new(value.as_str(), style.clone())
                })
                .collect(),
        );
    }

    log::debug!("Formatted table: {} rows x {} columns", rows.len(), columns);
    Ok(Table::new(column_widths.to_vec(), rows, table_style)?)
}

/// Formats datasets with one set of styles resolved up front.
#[derive(Debug, Clone)]
pub struct TableFormatter {
    header_style: Arc<ParagraphStyle>,
    cell_style: Arc<ParagraphStyle>,
    categories: CategoryStyles,
    table_style: Arc<TableStyle>,
}

impl TableFormatter {
    pub fn new(registry: &StyleRegistry, table_style: &str) -> Result<Self, StyleError> {
        Ok(Self {
            header_style: registry.get(styles::TABLE_HEADER)?,
            cell_style: registry.get(styles::TABLE_CELL)?,
            categories: CategoryStyles::from_registry(registry)?,
            table_style: registry.table_style(table_style)?,
        })
    }

    /// Every column uses the plain cell style unless a category applies.
    pub fn format(&self, dataset: &Dataset, column_widths: &[f32]) -> Result<Table, TableError> {
        let column_styles = vec![self.cell_style.clone(); dataset.column_count()];
        format_table(
            dataset,
            &self.header_style,
            column_widths,
            &column_styles,
            &self.categories,
            self.table_style.clone(),
        )
    }

    /// Splits `total_width` evenly over the dataset's columns.
    pub fn format_even(&self, dataset: &Dataset, total_width: f32) -> Result<Table, TableError> {
        let columns = dataset.column_count();
        if columns == 0 {
            return Err(TableError::NoColumns);
        }
        let widths = vec![total_width / columns as f32; columns];
        self.format(dataset, &widths)
    }
}
