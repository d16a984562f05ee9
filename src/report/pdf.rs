//! Paginated PDF rendering of the amortization table.
//!
//! The document is plain PDF 1.4 using the standard Helvetica fonts, so it
//! needs no embedded font data. Layout is fixed to US Letter portrait:
//! - page 1 carries the title and the loan summary above the table
//! - the table header row repeats on every page
//! - each page footer shows `Page i of n`

use std::io::Write;
use std::ops::Range;

use crate::core::{LoanParameters, PeriodRecord, Schedule};
use crate::error::{LoanError, Result};

use super::format::{format_currency, format_percent, format_term};

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 40.0;
const TITLE_SIZE: f64 = 18.0;
const SUMMARY_SIZE: f64 = 10.0;
const TABLE_SIZE: f64 = 8.0;
const HEADER_ROW_HEIGHT: f64 = 20.0;
const ROW_HEIGHT: f64 = 14.0;
const FIRST_PAGE_TABLE_TOP: f64 = 620.0;
const TABLE_TOP: f64 = PAGE_HEIGHT - MARGIN;

const COLUMNS: [(&str, f64); 7] = [
    ("Month", 40.0),
    ("Loan Installment", 80.0),
    ("Interest", 72.0),
    ("Principal Payment", 84.0),
    ("Insurance", 64.0),
    ("Total Payment", 80.0),
    ("Remaining Balance", 92.0),
];

/// Render the full schedule with a title and a loan summary header.
pub fn render_schedule_pdf(params: &LoanParameters, schedule: &Schedule) -> Result<Vec<u8>> {
    if schedule.is_empty() {
        return Err(LoanError::export("PDF", "the schedule has no rows"));
    }

    let pages = paginate(schedule.len());
    let page_count = pages.len();
    let mut streams = Vec::with_capacity(page_count);
    for (page_index, rows) in pages.into_iter().enumerate() {
        let mut content = PageContent::default();
        let table_top = if page_index == 0 {
            draw_heading(&mut content, params);
            FIRST_PAGE_TABLE_TOP
        } else {
            TABLE_TOP
        };
        draw_table(&mut content, table_top, &schedule.records()[rows]);
        content.text_centered(
            "F1",
            TABLE_SIZE,
            PAGE_WIDTH / 2.0,
            MARGIN / 2.0,
            &format!("Page {} of {page_count}", page_index + 1),
        );
        streams.push(content.ops);
    }

    assemble(&streams)
}

/// Row ranges for each page; the first page has less room because of the heading.
fn paginate(rows: usize) -> Vec<Range<usize>> {
    let first_capacity = rows_fitting(FIRST_PAGE_TABLE_TOP);
    let capacity = rows_fitting(TABLE_TOP);

    let mut pages = Vec::new();
    let mut start = 0;
    let mut page_capacity = first_capacity;
    while start < rows {
        let end = (start + page_capacity).min(rows);
        pages.push(start..end);
        start = end;
        page_capacity = capacity;
    }
    pages
}

fn rows_fitting(table_top: f64) -> usize {
    ((table_top - HEADER_ROW_HEIGHT - MARGIN) / ROW_HEIGHT).floor() as usize
}

fn table_width() -> f64 {
    COLUMNS.iter().map(|(_, w)| w).sum()
}

fn draw_heading(content: &mut PageContent, params: &LoanParameters) {
    content.text_centered(
        "F2",
        TITLE_SIZE,
        PAGE_WIDTH / 2.0,
        PAGE_HEIGHT - MARGIN - TITLE_SIZE,
        "Amortization Schedule",
    );

    let left = (PAGE_WIDTH - table_width()) / 2.0;
    let mut y = PAGE_HEIGHT - MARGIN - TITLE_SIZE - 30.0;
    content.text("F2", SUMMARY_SIZE, left, y, "Loan details:");
    let lines = [
        format!("Principal: {}", format_currency(params.principal)),
        format!("Annual Rate: {}", format_percent(params.annual_rate_percent)),
        format!("Term: {}", format_term(params.term_years)),
        format!("Monthly Insurance: {}", format_currency(params.monthly_insurance)),
    ];
    for line in &lines {
        y -= SUMMARY_SIZE + 4.0;
        content.text("F1", SUMMARY_SIZE, left, y, line);
    }
}

fn draw_table(content: &mut PageContent, top: f64, rows: &[PeriodRecord]) {
    let width = table_width();
    let left = (PAGE_WIDTH - width) / 2.0;
    let body_height = ROW_HEIGHT * rows.len() as f64;
    let bottom = top - HEADER_ROW_HEIGHT - body_height;

    content.fill_rect((0.5, 0.5, 0.5), left, top - HEADER_ROW_HEIGHT, width, HEADER_ROW_HEIGHT);
    content.fill_rect((0.96, 0.96, 0.86), left, bottom, width, body_height);

    let mut x = left;
    for (title, column_width) in COLUMNS {
        content.set_fill_gray(1.0);
        content.text_centered(
            "F2",
            TABLE_SIZE,
            x + column_width / 2.0,
            top - HEADER_ROW_HEIGHT + 7.0,
            title,
        );
        x += column_width;
    }

    content.set_fill_gray(0.0);
    for (row_index, record) in rows.iter().enumerate() {
        let baseline = top - HEADER_ROW_HEIGHT - ROW_HEIGHT * (row_index as f64 + 1.0) + 4.0;
        let cells = [
            record.period_index.to_string(),
            format_currency(record.payment_principal_interest),
            format_currency(record.interest_component),
            format_currency(record.principal_component),
            format_currency(record.insurance_component),
            format_currency(record.total_payment),
            format_currency(record.remaining_balance),
        ];
        let mut x = left;
        for ((_, column_width), cell) in COLUMNS.iter().zip(cells.iter()) {
            content.text_centered("F1", TABLE_SIZE, x + column_width / 2.0, baseline, cell);
            x += column_width;
        }
    }

    let mut y = top;
    content.line(left, y, left + width, y);
    y -= HEADER_ROW_HEIGHT;
    for _ in 0..=rows.len() {
        content.line(left, y, left + width, y);
        y -= ROW_HEIGHT;
    }
    let mut x = left;
    content.line(x, top, x, bottom);
    for (_, column_width) in COLUMNS {
        x += column_width;
        content.line(x, top, x, bottom);
    }
}

#[derive(Default)]
struct PageContent {
    ops: String,
}

impl PageContent {
    fn text(&mut self, font: &str, size: f64, x: f64, y: f64, text: &str) {
        self.ops.push_str(&format!(
            "BT /{font} {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET\n",
            escape_text(text)
        ));
    }

    fn text_centered(&mut self, font: &str, size: f64, center_x: f64, y: f64, text: &str) {
        let x = center_x - text_width(text, size) / 2.0;
        self.text(font, size, x, y, text);
    }

    fn fill_rect(&mut self, (r, g, b): (f64, f64, f64), x: f64, y: f64, w: f64, h: f64) {
        self.ops.push_str(&format!(
            "{r:.2} {g:.2} {b:.2} rg {x:.2} {y:.2} {w:.2} {h:.2} re f\n"
        ));
    }

    fn set_fill_gray(&mut self, level: f64) {
        self.ops.push_str(&format!("{level:.2} g\n"));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ops.push_str(&format!(
            "0 G 0.5 w {x1:.2} {y1:.2} m {x2:.2} {y2:.2} l S\n"
        ));
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

/// Approximate Helvetica advance width, in points.
fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = text.chars().map(glyph_width).sum();
    f64::from(units) * size / 1000.0
}

fn glyph_width(ch: char) -> u32 {
    match ch {
        '0'..='9' | '$' | '_' | '?' | '#' => 556,
        ' ' | ',' | '.' | ':' | ';' | '/' | '!' | 'I' | 'f' | 't' | '[' | ']' => 278,
        'i' | 'j' | 'l' => 222,
        '-' | '(' | ')' | 'r' => 333,
        'm' | 'M' => 833,
        'w' => 722,
        'W' => 944,
        '%' => 889,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
        'G' | 'O' | 'Q' => 778,
        'F' | 'T' | 'Z' => 611,
        'L' => 556,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        _ => 556,
    }
}

/// Lay out catalog, page tree, fonts, and one page + content stream per page.
fn assemble(streams: &[String]) -> Result<Vec<u8>> {
    let page_count = streams.len();
    let first_page_id = 5;
    let object_count = 4 + 2 * page_count;

    let mut out: Vec<u8> = Vec::new();
    let mut offsets = Vec::with_capacity(object_count);
    out.write_all(b"%PDF-1.4\n")?;

    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", first_page_id + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");

    offsets.push(out.len());
    write!(out, "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n")?;
    offsets.push(out.len());
    write!(
        out,
        "2 0 obj\n<< /Type /Pages /Kids [{kids}] /Count {page_count} >>\nendobj\n"
    )?;
    for (id, base_font) in [(3, "Helvetica"), (4, "Helvetica-Bold")] {
        offsets.push(out.len());
        write!(
            out,
            "{id} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>\nendobj\n"
        )?;
    }

    for (i, stream) in streams.iter().enumerate() {
        let page_id = first_page_id + 2 * i;
        let content_id = page_id + 1;
        offsets.push(out.len());
        write!(
            out,
            "{page_id} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>\nendobj\n"
        )?;
        offsets.push(out.len());
        write!(
            out,
            "{content_id} 0 obj\n<< /Length {} >>\nstream\n{stream}endstream\nendobj\n",
            stream.len()
        )?;
    }

    let xref_offset = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", object_count + 1)?;
    for offset in &offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        object_count + 1
    )?;
    Ok(out)
}
