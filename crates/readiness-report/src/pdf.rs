//! PDF encoding
//!
//! Draws a [`ReportDocument`] onto A4 pages with the two standard Helvetica
//! faces. Text is WinAnsi encoded; characters outside that set print as `?`.

use crate::layout::{Block, ReportDocument, Section};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use readiness_core::RenderError;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN_LEFT: f32 = 40.0;
const MARGIN_RIGHT: f32 = 40.0;
const MARGIN_TOP: f32 = 60.0;
const MARGIN_BOTTOM: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const LEADING: f32 = 1.4;
const GAP: f32 = 14.0;

const CELL_PADDING: f32 = 4.0;
const NOTE_PADDING: f32 = 6.0;
const FIRST_COLUMN: f32 = 0.7;

type Rgb = (f32, f32, f32);

const TITLE_COLOR: Rgb = (0.008, 0.243, 0.541);
const HEADING_COLOR: Rgb = (0.0, 0.467, 0.714);
const TEXT_COLOR: Rgb = (0.0, 0.0, 0.0);
const HEADER_TEXT_COLOR: Rgb = (1.0, 1.0, 1.0);
const GRID_COLOR: Rgb = (0.5, 0.5, 0.5);
const NOTE_FILL: Rgb = (1.0, 0.973, 0.769);
const NOTE_BORDER: Rgb = (0.722, 0.525, 0.043);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// Average Helvetica advance as a fraction of the font size
    fn advance(self) -> f32 {
        match self {
            Self::Regular => 0.5,
            Self::Bold => 0.55,
        }
    }
}

/// Approximate rendered width of `text`
fn text_width(text: &str, font: Font, size: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let chars = text.chars().count() as f32;
    chars * size * font.advance()
}

/// Greedy word wrap; a single overlong word gets a line of its own
fn wrap(text: &str, font: Font, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if line.is_empty() || text_width(&candidate, font, size) <= width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Map text to WinAnsi bytes
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            c if c.is_ascii() => u8::try_from(c).unwrap_or(b'?'),
            c => u8::try_from(u32::from(c))
                .ok()
                .filter(|b| *b >= 0xA0)
                .unwrap_or(b'?'),
        })
        .collect()
}

fn rgb_operands((r, g, b): Rgb) -> Vec<Object> {
    vec![r.into(), g.into(), b.into()]
}

/// Accumulates drawing operations page by page
struct PageWriter {
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    /// Start a new page unless `height` still fits on this one
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN_BOTTOM && !self.ops.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
            self.y = PAGE_HEIGHT - MARGIN_TOP;
        }
    }

    fn skip(&mut self, height: f32) {
        self.y -= height;
    }

    /// Place one run of text with its baseline at `y`
    fn text_at(&mut self, x: f32, y: f32, runs: &[(Font, &str)], size: f32, color: Rgb) {
        self.ops.push(Operation::new("rg", rgb_operands(color)));
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        for (font, text) in runs {
            self.ops.push(Operation::new(
                "Tf",
                vec![font.resource().into(), size.into()],
            ));
            self.ops.push(Operation::new(
                "Tj",
                vec![Object::String(encode_text(text), StringFormat::Literal)],
            ));
        }
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Write one line at the cursor and move down
    fn line(&mut self, x: f32, runs: &[(Font, &str)], size: f32, color: Rgb) {
        let height = size * LEADING;
        self.reserve(height);
        self.y -= height;
        let y = self.y;
        self.text_at(x, y, runs, size, color);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Option<Rgb>, stroke: Option<(Rgb, f32)>) {
        if let Some(color) = fill {
            self.ops.push(Operation::new("rg", rgb_operands(color)));
            self.ops.push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
            self.ops.push(Operation::new("f", vec![]));
        }
        if let Some((color, width)) = stroke {
            self.ops.push(Operation::new("RG", rgb_operands(color)));
            self.ops.push(Operation::new("w", vec![width.into()]));
            self.ops.push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
            self.ops.push(Operation::new("S", vec![]));
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.ops);
        }
        self.pages
    }
}

fn draw_title(writer: &mut PageWriter, doc: &ReportDocument) {
    let width = text_width(&doc.title, Font::Bold, TITLE_SIZE);
    let x = MARGIN_LEFT + ((CONTENT_WIDTH - width) / 2.0).max(0.0);
    writer.line(x, &[(Font::Bold, doc.title.as_str())], TITLE_SIZE, TITLE_COLOR);
    writer.skip(GAP);
    writer.line(MARGIN_LEFT, &[(Font::Regular, doc.generated.as_str())], BODY_SIZE, TEXT_COLOR);
    writer.skip(GAP);
}

fn draw_fields(writer: &mut PageWriter, fields: &[(String, String)]) {
    for (label, value) in fields {
        let prefix = format!("{label}: ");
        let indent = text_width(&prefix, Font::Bold, BODY_SIZE);
        let lines = wrap(value, Font::Regular, BODY_SIZE, CONTENT_WIDTH - indent);
        let mut lines = lines.iter().map(String::as_str);

        let first = lines.next().unwrap_or("");
        writer.line(
            MARGIN_LEFT,
            &[(Font::Bold, prefix.as_str()), (Font::Regular, first)],
            BODY_SIZE,
            TEXT_COLOR,
        );
        for rest in lines {
            writer.line(MARGIN_LEFT + indent, &[(Font::Regular, rest)], BODY_SIZE, TEXT_COLOR);
        }
        writer.skip(2.0);
    }
}

fn draw_row(writer: &mut PageWriter, cells: [&str; 2], header: bool) {
    let widths = [CONTENT_WIDTH * FIRST_COLUMN, CONTENT_WIDTH * (1.0 - FIRST_COLUMN)];
    let font = if header { Font::Bold } else { Font::Regular };
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .zip(widths)
        .map(|(text, w)| wrap(text, font, BODY_SIZE, w - 2.0 * CELL_PADDING))
        .collect();
    let line_height = BODY_SIZE * LEADING;
    #[allow(clippy::cast_precision_loss)]
    let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1) as f32;
    let height = lines * line_height + 2.0 * CELL_PADDING;

    writer.reserve(height);
    let top = writer.y;
    let bottom = top - height;
    if header {
        writer.rect(MARGIN_LEFT, bottom, CONTENT_WIDTH, height, Some(HEADING_COLOR), None);
    }

    let mut x = MARGIN_LEFT;
    for (cell, width) in wrapped.iter().zip(widths) {
        writer.rect(x, bottom, width, height, None, Some((GRID_COLOR, 0.4)));
        let color = if header { HEADER_TEXT_COLOR } else { TEXT_COLOR };
        let mut baseline = top - CELL_PADDING;
        for line in cell {
            baseline -= line_height;
            writer.text_at(
                x + CELL_PADDING,
                baseline + BODY_SIZE * 0.3,
                &[(font, line.as_str())],
                BODY_SIZE,
                color,
            );
        }
        x += width;
    }
    writer.y = bottom;
}

fn draw_table(writer: &mut PageWriter, header: &[String; 2], rows: &[[String; 2]]) {
    draw_row(writer, [header[0].as_str(), header[1].as_str()], true);
    for row in rows {
        draw_row(writer, [row[0].as_str(), row[1].as_str()], false);
    }
}

fn draw_note(writer: &mut PageWriter, note: &str) {
    const LABEL: &str = "Note: ";
    let inner = CONTENT_WIDTH - 2.0 * NOTE_PADDING;
    let lines = wrap(&format!("{LABEL}{note}"), Font::Regular, BODY_SIZE, inner);
    let line_height = BODY_SIZE * LEADING;
    #[allow(clippy::cast_precision_loss)]
    let height = lines.len() as f32 * line_height + 2.0 * NOTE_PADDING;

    writer.reserve(height);
    let top = writer.y;
    writer.rect(
        MARGIN_LEFT,
        top - height,
        CONTENT_WIDTH,
        height,
        Some(NOTE_FILL),
        Some((NOTE_BORDER, 1.0)),
    );

    let mut baseline = top - NOTE_PADDING;
    for (i, line) in lines.iter().enumerate() {
        baseline -= line_height;
        let y = baseline + BODY_SIZE * 0.3;
        match line.strip_prefix(LABEL).filter(|_| i == 0) {
            Some(rest) => writer.text_at(
                MARGIN_LEFT + NOTE_PADDING,
                y,
                &[(Font::Bold, LABEL), (Font::Regular, rest)],
                BODY_SIZE,
                TEXT_COLOR,
            ),
            None => writer.text_at(
                MARGIN_LEFT + NOTE_PADDING,
                y,
                &[(Font::Regular, line.as_str())],
                BODY_SIZE,
                TEXT_COLOR,
            ),
        }
    }
    writer.y = top - height;
}

fn draw_section(writer: &mut PageWriter, section: &Section) {
    if let Some(heading) = &section.heading {
        // keep a heading together with at least its first line
        writer.reserve(HEADING_SIZE * LEADING + BODY_SIZE * LEADING * 2.0);
        writer.line(MARGIN_LEFT, &[(Font::Bold, heading.as_str())], HEADING_SIZE, HEADING_COLOR);
        writer.skip(4.0);
    }
    match &section.block {
        Block::Fields(fields) => draw_fields(writer, fields),
        Block::Table { header, rows } => draw_table(writer, header, rows),
        Block::Note(note) => draw_note(writer, note),
    }
    writer.skip(GAP);
}

fn encoding_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Encoding(e.to_string())
}

/// Encode `report` as PDF bytes.
///
/// # Errors
/// [`RenderError::Encoding`] when content streams or the file cannot be written.
pub fn encode(report: &ReportDocument) -> Result<Vec<u8>, RenderError> {
    let mut writer = PageWriter::new();
    draw_title(&mut writer, report);
    for section in &report.sections {
        draw_section(&mut writer, section);
    }
    let pages = writer.finish();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let stream = Stream::new(dictionary! {}, content.encode().map_err(encoding_error)?);
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).map_err(encoding_error)?;
    let page_tree = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(page_tree));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(encoding_error)?;
    tracing::debug!("Encoded {} page(s), {} bytes", count, bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Block, Section};

    fn document(sections: Vec<Section>) -> ReportDocument {
        ReportDocument {
            title: "Business Personality & Readiness Report".into(),
            generated: "Generated on 01 January 2025, 09:00 AM".into(),
            sections,
            filename: "report.pdf".into(),
        }
    }

    fn shown_text(bytes: &[u8]) -> (usize, Vec<String>) {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        let mut shown = Vec::new();
        for page_id in pages.values() {
            let content = Content::decode(&doc.get_page_content(*page_id).unwrap()).unwrap();
            for op in content.operations {
                if op.operator == "Tj" {
                    if let Some(Object::String(raw, _)) = op.operands.first() {
                        shown.push(raw.iter().map(|b| char::from(*b)).collect());
                    }
                }
            }
        }
        (pages.len(), shown)
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("alpha beta gamma delta", Font::Regular, 10.0, 60.0);
        assert_eq!(lines, ["alpha beta", "gamma delta"]);
        assert!(wrap("", Font::Regular, 10.0, 60.0).is_empty());
        assert_eq!(wrap("supercalifragilistic", Font::Regular, 10.0, 20.0).len(), 1);
    }

    #[test]
    fn dashes_map_to_winansi() {
        assert_eq!(encode_text("Stage 1 – A"), b"Stage 1 \x96 A");
        assert_eq!(encode_text("é"), [0xE9]);
        assert_eq!(encode_text("✓"), b"?");
    }

    #[test]
    fn encodes_single_page_pdf() {
        let report = document(vec![
            Section {
                heading: Some("Stage 1 – Personal Information".into()),
                block: Block::Fields(vec![("Gender".into(), "Female".into())]),
            },
            Section {
                heading: None,
                block: Block::Note("Parents/guardians should supervise.".into()),
            },
        ]);
        let bytes = encode(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let (pages, shown) = shown_text(&bytes);
        assert_eq!(pages, 1);
        assert!(shown.iter().any(|t| t == "Business Personality & Readiness Report"));
        assert!(shown.iter().any(|t| t == "Gender: "));
        assert!(shown.iter().any(|t| t == "Female"));
        assert!(shown.iter().any(|t| t == "Note: "));
    }

    #[test]
    fn long_content_is_paginated() {
        let rows = (1..=80)
            .map(|i| [format!("Requirement {i}"), "Yes".to_string()])
            .collect();
        let report = document(vec![Section {
            heading: Some("Stage 3 – Mandatory Requirements".into()),
            block: Block::Table {
                header: ["Requirement".into(), "Status".into()],
                rows,
            },
        }]);
        let (pages, shown) = shown_text(&encode(&report).unwrap());
        assert!(pages > 1, "expected several pages, got {pages}");
        assert!(shown.iter().any(|t| t == "Requirement 80"));
    }
}
