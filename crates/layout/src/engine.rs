//! Frame-based pagination.
//!
//! Flowables are stacked top to bottom inside the page frame. Paragraphs
//! break between lines, tables break between rows and repeat their header
//! rows on continuation pages. A single line or table row is never split; if
//! one cannot fit on an empty page the engine fails with
//! [`LayoutError::ElementTooLarge`].

use crate::algorithms::pagination::check_child_fit;
use crate::canvas::PageCanvas;
use crate::elements::RectElement;
use crate::flowable::{Flowable, Paragraph, Table};
use crate::fonts::TextMeasurer;
use crate::page::{LaidOutPage, PageGeometry};
use crate::text::wrapper::{wrap_text, Line};
use crate::LayoutError;
use log::debug;
use tpt_types::{Color, Rect};

const EPSILON: f32 = 0.01;

pub struct LayoutEngine<'a> {
    measurer: &'a dyn TextMeasurer,
    geometry: PageGeometry,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        measurer: &'a dyn TextMeasurer,
        geometry: PageGeometry,
    ) -> Result<Self, LayoutError> {
        let frame = geometry.frame();
        if frame.width <= 0.0 || frame.height <= 0.0 {
            return Err(LayoutError::EmptyFrame {
                width: frame.width,
                height: frame.height,
            });
        }
        Ok(Self { measurer, geometry })
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Lays out `flowables` in order. Always yields at least one page.
    pub fn paginate(&self, flowables: &[Flowable]) -> Result<Vec<LaidOutPage>, LayoutError> {
        let mut cursor = PageCursor::new(self.measurer, self.geometry.frame());

        for flowable in flowables {
            match flowable {
                Flowable::Paragraph(p) => self.layout_paragraph(&mut cursor, p)?,
                Flowable::Spacer(height) => {
                    if cursor.at_top() {
                        continue;
                    }
                    if cursor.fits(*height) {
                        cursor.advance(*height);
                    } else {
                        cursor.new_page();
                    }
                }
                Flowable::PageBreak => {
                    if !cursor.at_top() {
                        cursor.new_page();
                    }
                }
                Flowable::Table(t) => self.layout_table(&mut cursor, t)?,
            }
        }

        let pages = cursor.finish();
        debug!("Laid out {} flowables on {} pages", flowables.len(), pages.len());
        Ok(pages)
    }

    fn layout_paragraph(
        &self,
        cursor: &mut PageCursor<'a>,
        paragraph: &Paragraph,
    ) -> Result<(), LayoutError> {
        let style = paragraph.style();
        let frame = cursor.frame;
        let leading = style.leading();
        if leading > frame.height + EPSILON {
            return Err(LayoutError::ElementTooLarge(leading, frame.height));
        }

        if !cursor.at_top() && style.space_before() > 0.0 {
            if cursor.fits(style.space_before()) {
                cursor.advance(style.space_before());
            } else {
                cursor.new_page();
            }
        }

        let lines = wrap_text(paragraph.text(), frame.width, |s| {
            self.measurer.text_width(s, style)
        });
        for line in lines {
            if !cursor.fits(leading) {
                debug!("Paragraph continues on a new page at line '{}'", line.text);
                cursor.new_page();
            }
            if !line.text.is_empty() {
                let x = frame.x + style.alignment().offset(line.width, frame.width);
                let y = cursor.absolute_y();
                cursor.canvas.draw_string(x, y, &line.text, style);
            }
            cursor.advance(leading);
        }

        cursor.advance_clamped(style.space_after());
        Ok(())
    }

    fn measure_rows(&self, table: &Table) -> Vec<RowLayout> {
        let padding = table.style().cell_padding;
        table
            .rows()
            .iter()
            .map(|cells| {
                let mut height = 2.0 * padding;
                let lines = cells
                    .iter()
                    .zip(table.column_widths())
                    .map(|(cell, width)| {
                        let style = cell.style();
                        let inner = (width - 2.0 * padding).max(1.0);
                        let lines =
                            wrap_text(cell.text(), inner, |s| self.measurer.text_width(s, style));
                        height = height.max(lines.len() as f32 * style.leading() + 2.0 * padding);
                        lines
                    })
                    .collect();
                RowLayout { height, lines }
            })
            .collect()
    }

    fn layout_table(&self, cursor: &mut PageCursor<'a>, table: &Table) -> Result<(), LayoutError> {
        let frame = cursor.frame;
        let total_width = table.total_width();
        if total_width > frame.width + EPSILON {
            return Err(LayoutError::TooWide(total_width, frame.width));
        }

        let rows = self.measure_rows(table);
        let header_count = table.header_rows();
        let header_height: f32 = rows[..header_count].iter().map(|r| r.height).sum();
        let repeat_header = table.style().repeat_header && header_count > 0;

        if header_height > frame.height + EPSILON {
            return Err(LayoutError::ElementTooLarge(header_height, frame.height));
        }
        for row in &rows[header_count..] {
            let needed = row.height + if repeat_header { header_height } else { 0.0 };
            if needed > frame.height + EPSILON {
                return Err(LayoutError::ElementTooLarge(needed, frame.height));
            }
        }

        let x = frame.x + (frame.width - total_width) / 2.0;

        // Keep the header together with the first body row.
        let opening = header_height + rows.get(header_count).map_or(0.0, |r| r.height);
        if !cursor.fits(opening) && !cursor.at_top() {
            cursor.new_page();
        }

        let draw_header = |cursor: &mut PageCursor<'a>| {
            for (index, row) in rows[..header_count].iter().enumerate() {
                draw_row(cursor, table, index, row, x, table.style().header_background);
            }
        };

        draw_header(cursor);
        for (body_index, row) in rows.iter().enumerate().skip(header_count) {
            if !cursor.fits(row.height) {
                debug!(
                    "Table breaks before row {} of {}",
                    body_index,
                    table.row_count()
                );
                cursor.new_page();
                if repeat_header {
                    draw_header(cursor);
                }
            }
            let band = table.style().band_for_row(body_index - header_count);
            draw_row(cursor, table, body_index, row, x, band);
        }

        Ok(())
    }
}

struct RowLayout {
    height: f32,
    lines: Vec<Vec<Line>>,
}

fn draw_row(
    cursor: &mut PageCursor<'_>,
    table: &Table,
    index: usize,
    layout: &RowLayout,
    x: f32,
    background: Option<Color>,
) {
    let style = table.style();
    let padding = style.cell_padding;
    let stroke = (style.grid_width > 0.0).then_some(style.grid_color);
    let y = cursor.absolute_y();
    let mut cell_x = x;

    for (column, width) in table.column_widths().iter().enumerate() {
        if background.is_some() || stroke.is_some() {
            cursor.canvas.draw_rect(
                Rect::new(cell_x, y, *width, layout.height),
                RectElement {
                    fill: background,
                    stroke,
                    stroke_width: style.grid_width,
                },
            );
        }

        if let Some(cell) = table.cell(index, column) {
            let cell_style = cell.style();
            let inner = width - 2.0 * padding;
            for (n, line) in layout.lines[column].iter().enumerate() {
                if line.text.is_empty() {
                    continue;
                }
                let lx = cell_x + padding + cell_style.alignment().offset(line.width, inner);
                let ly = y + padding + n as f32 * cell_style.leading();
                cursor.canvas.draw_string(lx, ly, &line.text, cell_style);
            }
        }
        cell_x += width;
    }

    cursor.advance(layout.height);
}

/// Tracks the page being filled and the vertical offset into its frame.
struct PageCursor<'a> {
    measurer: &'a dyn TextMeasurer,
    frame: Rect,
    canvas: PageCanvas<'a>,
    pages: Vec<LaidOutPage>,
    offset: f32,
}

impl<'a> PageCursor<'a> {
    fn new(measurer: &'a dyn TextMeasurer, frame: Rect) -> Self {
        Self {
            measurer,
            frame,
            canvas: PageCanvas::new(measurer),
            pages: Vec::new(),
            offset: 0.0,
        }
    }

    fn at_top(&self) -> bool {
        self.offset <= 0.0 && self.canvas.is_empty()
    }

    fn fits(&self, height: f32) -> bool {
        !check_child_fit(self.offset, height, self.frame).should_break
    }

    fn advance(&mut self, height: f32) {
        self.offset += height;
    }

    fn advance_clamped(&mut self, height: f32) {
        self.offset = (self.offset + height).min(self.frame.height);
    }

    fn absolute_y(&self) -> f32 {
        self.frame.y + self.offset
    }

    fn new_page(&mut self) {
        let canvas = std::mem::replace(&mut self.canvas, PageCanvas::new(self.measurer));
        self.pages.push(LaidOutPage {
            elements: canvas.into_elements(),
        });
        self.offset = 0.0;
        debug!("Starting page {}", self.pages.len() + 1);
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        if !self.canvas.is_empty() || self.pages.is_empty() {
            self.pages.push(LaidOutPage {
                elements: self.canvas.into_elements(),
            });
        }
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::LayoutElement;
    use crate::test_utils::{frame_geometry, init_logger, style, FixedWidthMeasurer};
    use std::sync::Arc;
    use tpt_style::{TableStyle, TextAlign};

    fn plain_table_style() -> TableStyle {
        TableStyle {
            header_background: None,
            band_colors: vec![],
            grid_width: 0.0,
            cell_padding: 0.0,
            ..Default::default()
        }
    }

    fn row(texts: &[&str]) -> Vec<Paragraph> {
        let s = style("cell", 10.0);
        texts.iter().map(|t| Paragraph::new(*t, s.clone())).collect()
    }

    fn table(rows: Vec<Vec<Paragraph>>, widths: Vec<f32>, table_style: TableStyle) -> Flowable {
        Table::new(widths, rows, Arc::new(table_style)).unwrap().into()
    }

    #[test]
    fn paragraph_wraps_inside_frame() {
        init_logger();
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(50.0, 100.0)).unwrap();
        let para = Paragraph::new("aaaa bbbb cccc", style("body", 10.0));

        let pages = engine.paginate(&[para.into()]).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text_lines(), vec!["aaaa bbbb", "cccc"]);
        let ys: Vec<f32> = pages[0].elements.iter().map(|e| e.y).collect();
        assert_eq!(ys, vec![10.0, 20.0]);
    }

    #[test]
    fn paragraph_splits_between_lines() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(20.0, 30.0)).unwrap();
        let para = Paragraph::new("l1\nl2\nl3\nl4\nl5", style("body", 10.0));

        let pages = engine.paginate(&[para.into()]).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text_lines(), vec!["l1", "l2", "l3"]);
        assert_eq!(pages[1].text_lines(), vec!["l4", "l5"]);
        assert_eq!(pages[1].elements[0].y, 10.0);
    }

    #[test]
    fn centred_alignment_offsets_lines() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 100.0)).unwrap();
        let centred = Arc::new(
            style("title", 10.0)
                .derive("centred")
                .alignment(TextAlign::Center)
                .build()
                .unwrap(),
        );
        let pages = engine.paginate(&[Paragraph::new("abcd", centred).into()]).unwrap();
        // 20pt of text centred in a 100pt frame that starts at x = 10.
        assert_eq!(pages[0].elements[0].x, 50.0);
    }

    #[test]
    fn page_breaks_never_produce_empty_pages() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 100.0)).unwrap();
        let s = style("body", 10.0);
        let flowables = vec![
            Flowable::PageBreak,
            Paragraph::new("one", s.clone()).into(),
            Flowable::PageBreak,
            Flowable::PageBreak,
            Paragraph::new("two", s).into(),
            Flowable::PageBreak,
        ];

        let pages = engine.paginate(&flowables).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text_lines(), vec!["one"]);
        assert_eq!(pages[1].text_lines(), vec!["two"]);
    }

    #[test]
    fn spacer_that_overflows_moves_to_next_page() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 30.0)).unwrap();
        let s = style("body", 10.0);
        let flowables = vec![
            Paragraph::new("a", s.clone()).into(),
            Flowable::Spacer(10.0),
            Paragraph::new("b", s.clone()).into(),
            Flowable::Spacer(15.0),
            Paragraph::new("c", s).into(),
        ];

        let pages = engine.paginate(&flowables).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text_lines(), vec!["a", "b"]);
        assert_eq!(pages[0].elements[1].y, 30.0);
        assert_eq!(pages[1].text_lines(), vec!["c"]);
        assert_eq!(pages[1].elements[0].y, 10.0);
    }

    #[test]
    fn table_repeats_header_on_continuation_pages() {
        init_logger();
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 50.0)).unwrap();
        let mut rows = vec![row(&["H"])];
        rows.extend((1..=6).map(|i| row(&[&format!("r{}", i)])));

        let pages = engine
            .paginate(&[table(rows, vec![40.0], plain_table_style())])
            .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text_lines(), vec!["H", "r1", "r2", "r3", "r4"]);
        assert_eq!(pages[1].text_lines(), vec!["H", "r5", "r6"]);
    }

    #[test]
    fn header_is_not_repeated_when_disabled() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 20.0)).unwrap();
        let rows = vec![row(&["H"]), row(&["r1"]), row(&["r2"])];
        let table_style = TableStyle {
            repeat_header: false,
            ..plain_table_style()
        };

        let pages = engine.paginate(&[table(rows, vec![40.0], table_style)]).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].text_lines(), vec!["r2"]);
    }

    #[test]
    fn table_moves_to_new_page_to_keep_header_with_first_row() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 30.0)).unwrap();
        let s = style("body", 10.0);
        let flowables = vec![
            Paragraph::new("intro", s).into(),
            Paragraph::new("more", style("body", 10.0)).into(),
            table(vec![row(&["H"]), row(&["r1"])], vec![40.0], plain_table_style()),
        ];

        let pages = engine.paginate(&flowables).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].text_lines(), vec!["H", "r1"]);
    }

    #[test]
    fn table_is_centred_and_cells_are_offset_by_padding() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 100.0)).unwrap();
        let table_style = TableStyle {
            cell_padding: 2.0,
            ..plain_table_style()
        };

        let pages = engine
            .paginate(&[table(vec![row(&["a", "b"])], vec![30.0, 30.0], table_style)])
            .unwrap();

        let xs: Vec<f32> = pages[0].elements.iter().map(|e| e.x).collect();
        // Frame starts at 10; the 60pt table is centred in 100pt.
        assert_eq!(xs, vec![32.0, 62.0]);
        assert_eq!(pages[0].elements[0].y, 12.0);
    }

    #[test]
    fn body_rows_alternate_band_colours() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 100.0)).unwrap();
        let navy = Color::rgb(0, 0x33, 0x66);
        let band_a = Color::WHITE;
        let band_b = Color::gray(0xEE);
        let table_style = TableStyle {
            header_background: Some(navy),
            band_colors: vec![band_a, band_b],
            ..plain_table_style()
        };
        let rows = vec![row(&["H"]), row(&["1"]), row(&["2"]), row(&["3"])];

        let pages = engine.paginate(&[table(rows, vec![40.0], table_style)]).unwrap();

        let fills: Vec<Color> = pages[0]
            .elements
            .iter()
            .filter_map(|e| match &e.element {
                LayoutElement::Rectangle(r) => r.fill,
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![navy, band_a, band_b, band_a]);
    }

    #[test]
    fn row_height_follows_tallest_cell() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 100.0)).unwrap();
        let rows = vec![row(&["one two", "x"]), row(&["y", "z"])];

        let pages = engine
            .paginate(&[table(rows, vec![20.0, 20.0], plain_table_style())])
            .unwrap();

        // "one two" wraps into two 10pt lines, so the second row starts 20pt down.
        let y_of = |text: &str| {
            pages[0]
                .elements
                .iter()
                .find(|e| matches!(&e.element, LayoutElement::Text(t) if t.content == text))
                .map(|e| e.y)
                .unwrap()
        };
        assert_eq!(y_of("two"), 20.0);
        assert_eq!(y_of("y"), 30.0);
    }

    #[test]
    fn too_wide_table_is_rejected() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 100.0)).unwrap();
        let err = engine
            .paginate(&[table(vec![row(&["a", "b"])], vec![60.0, 60.0], plain_table_style())])
            .unwrap_err();
        assert!(matches!(err, LayoutError::TooWide(w, f) if w == 120.0 && f == 100.0));
    }

    #[test]
    fn row_taller_than_a_page_is_rejected() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 25.0)).unwrap();
        let rows = vec![row(&["H"]), row(&["a\nb"])];
        let err = engine
            .paginate(&[table(rows, vec![40.0], plain_table_style())])
            .unwrap_err();
        assert!(matches!(err, LayoutError::ElementTooLarge(h, _) if h == 30.0));
    }

    #[test]
    fn empty_frame_is_rejected() {
        let measurer = FixedWidthMeasurer;
        let geometry = PageGeometry::new(
            tpt_style::PageSize::Custom {
                width: 100.0,
                height: 100.0,
            },
            tpt_style::Margins::all(60.0),
        );
        assert!(matches!(
            LayoutEngine::new(&measurer, geometry),
            Err(LayoutError::EmptyFrame { .. })
        ));
    }

    #[test]
    fn no_content_yields_one_blank_page() {
        let measurer = FixedWidthMeasurer;
        let engine = LayoutEngine::new(&measurer, frame_geometry(100.0, 100.0)).unwrap();
        let pages = engine.paginate(&[]).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }
}
