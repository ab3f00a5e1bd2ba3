//! Report construction: styles, table formatting, the document template,
//! and the composer that ties them together.

pub mod composer;
pub mod styles;
pub mod table;
pub mod template;

pub use composer::{report_filename, report_gen, ReportComposer, ReportRequest};
pub use table::{format_table, CategoryStyles, CellCategory, TableError, TableFormatter};
pub use template::{
    decorate_page, Logo, PageDecoration, ReportDocTemplate, TemplateError, TemplateState,
};
