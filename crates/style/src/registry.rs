//! The named collection of styles used throughout a document.

use crate::error::StyleError;
use crate::paragraph::ParagraphStyle;
use crate::table::TableStyle;
use std::collections::HashMap;
use std::sync::Arc;

/// Styles keyed by stable name. Registration validates and freezes each
/// style; lookups hand out shared, immutable handles.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, Arc<ParagraphStyle>>,
    table_styles: HashMap<String, Arc<TableStyle>>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a paragraph style under its own name. Names are unique.
    pub fn register(&mut self, style: ParagraphStyle) -> Result<Arc<ParagraphStyle>, StyleError> {
        let name = style.name().to_string();
        if self.styles.contains_key(&name) {
            return Err(StyleError::DuplicateStyle(name));
        }
        let style = Arc::new(style);
        self.styles.insert(name, style.clone());
        Ok(style)
    }

    pub fn register_table_style(
        &mut self,
        name: impl Into<String>,
        style: TableStyle,
    ) -> Result<Arc<TableStyle>, StyleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StyleError::EmptyName);
        }
        if self.table_styles.contains_key(&name) {
            return Err(StyleError::DuplicateStyle(name));
        }
        style.validate()?;
        let style = Arc::new(style);
        self.table_styles.insert(name, style.clone());
        Ok(style)
    }

    /// Looks up a paragraph style by name.
    pub fn get(&self, name: &str) -> Result<Arc<ParagraphStyle>, StyleError> {
        self.styles
            .get(name)
            .cloned()
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))
    }

    pub fn table_style(&self, name: &str) -> Result<Arc<TableStyle>, StyleError> {
        self.table_styles
            .get(name)
            .cloned()
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Every registered paragraph style name, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
