//! The named styles a TPT report is typeset with.

use tpt_style::{
    Color, FontWeight, ParagraphStyle, StyleError, StyleRegistry, TableStyle, TextAlign,
};

pub const TITLE: &str = "title";
pub const HEADING: &str = "heading";
pub const BODY: &str = "body";
pub const TABLE_HEADER: &str = "table-header";
pub const TABLE_CELL: &str = "table-cell";
pub const CELL_BLOCKED: &str = "cell-blocked";
pub const CELL_NOT_BLOCKED: &str = "cell-not-blocked";
pub const FOOTER: &str = "footer";

pub const DETAIL_TABLE: &str = "detail";
pub const SUMMARY_TABLE: &str = "summary";

pub const NAVY: Color = Color::rgb(0x00, 0x33, 0x66);
pub const WARNING_RED: Color = Color::rgb(0xC0, 0x00, 0x00);
pub const POSITIVE_GREEN: Color = Color::rgb(0x00, 0x80, 0x00);

/// Builds the registry every report shares, with all text set in
/// `font_family`.
pub fn report_styles(font_family: &str) -> Result<StyleRegistry, StyleError> {
    let mut registry = StyleRegistry::new();

    let body = ParagraphStyle::builder(BODY)
        .font_family(font_family)
        .font_size(10.0)
        .leading(13.0)
        .space_after(6.0)
        .build()?;

    registry.register(
        body.derive(TITLE)
            .bold()
            .font_size(20.0)
            .leading(24.0)
            .color(NAVY)
            .space_after(10.0)
            .build()?,
    )?;
    registry.register(
        body.derive(HEADING)
            .bold()
            .font_size(14.0)
            .leading(18.0)
            .color(NAVY)
            .space_before(8.0)
            .build()?,
    )?;
    registry.register(
        body.derive(TABLE_HEADER)
            .bold()
            .font_size(9.0)
            .leading(11.0)
            .color(Color::WHITE)
            .space_after(0.0)
            .build()?,
    )?;

    let cell = body
        .derive(TABLE_CELL)
        .font_size(9.0)
        .leading(11.0)
        .space_after(0.0)
        .build()?;
    for (name, color) in [(CELL_BLOCKED, WARNING_RED), (CELL_NOT_BLOCKED, POSITIVE_GREEN)] {
        registry.register(
            cell.derive(name)
                .font_weight(FontWeight::Bold)
                .color(color)
                .build()?,
        )?;
    }
    registry.register(cell)?;

    registry.register(
        body.derive(FOOTER)
            .font_size(8.0)
            .leading(10.0)
            .color(Color::gray(0x66))
            .alignment(TextAlign::Left)
            .space_after(0.0)
            .build()?,
    )?;
    registry.register(body)?;

    registry.register_table_style(DETAIL_TABLE, TableStyle::default())?;
    registry.register_table_style(
        SUMMARY_TABLE,
        TableStyle {
            header_background: Some(NAVY),
            band_colors: vec![Color::gray(0xF2), Color::WHITE],
            ..TableStyle::default()
        },
    )?;

    Ok(registry)
}
