//! Styled workbook writer: header style, row banding, SET and warning fills.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

use crate::errors::AppResult;
use crate::export::excel_date::date_to_excel_serial;
use crate::export::sheets::{Cell, Fill, Sheet, Value};

const HEADER_BG: u32 = 0x2F75B5;
const BAND_ODD: u32 = 0xEAF3FB;
const BAND_EVEN: u32 = 0xFFFFFF;
const WARNING_BG: u32 = 0xFFF3CD;
const DANGER_BG: u32 = 0xF8D7DA;
const DATE_FORMAT: &str = "dd/mm/yyyy";
const MAX_COLUMN_WIDTH: usize = 50;

fn fill_color(fill: Fill) -> Color {
    match fill {
        Fill::Rgb(rgb) => Color::RGB(rgb),
        Fill::Warning => Color::RGB(WARNING_BG),
        Fill::Danger => Color::RGB(DANGER_BG),
    }
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(HEADER_BG))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

fn cell_format(bg: Color) -> Format {
    Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

/// Display width of a cell, used for column sizing.
fn cell_width(cell: &Cell) -> usize {
    match &cell.value {
        Value::Date(_) => DATE_FORMAT.len(),
        other => UnicodeWidthStr::width(other.to_text().as_str()),
    }
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell, band: Color) -> AppResult<()> {
    let bg = cell.fill.map(fill_color).unwrap_or(band);
    let fmt = cell_format(bg);

    match &cell.value {
        Value::Text(s) => {
            worksheet.write_with_format(row, col, s.as_str(), &fmt)?;
        }
        Value::Int(n) => {
            let fmt = fmt.set_align(FormatAlign::Right);
            worksheet.write_with_format(row, col, *n as f64, &fmt)?;
        }
        Value::Float(f) => {
            let fmt = fmt.set_align(FormatAlign::Right).set_num_format("0.0");
            worksheet.write_with_format(row, col, *f, &fmt)?;
        }
        Value::Date(d) => {
            let fmt = fmt.set_num_format(DATE_FORMAT);
            worksheet.write_with_format(row, col, date_to_excel_serial(*d), &fmt)?;
        }
    }
    Ok(())
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> AppResult<()> {
    worksheet.set_name(sheet.name)?;

    if sheet.rows.is_empty() && sheet.headers.is_empty() {
        worksheet.write(0, 0, "No data available")?;
        return Ok(());
    }

    let header = header_format();
    for (col, title) in sheet.headers.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *title, &header)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let mut widths: Vec<usize> = sheet
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(*h))
        .collect();

    for (row_index, cells) in sheet.rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 {
            Color::RGB(BAND_ODD)
        } else {
            Color::RGB(BAND_EVEN)
        };

        for (col, cell) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, cell, band)?;
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(cell_width(cell));
            }
        }
    }

    for (col, w) in widths.iter().enumerate() {
        let width = (*w).min(MAX_COLUMN_WIDTH) as f64 + 2.0;
        worksheet.set_column_width(col as u16, width)?;
    }

    Ok(())
}

pub(crate) fn build_workbook(sheets: &[Sheet]) -> AppResult<Workbook> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet)?;
    }
    Ok(workbook)
}

pub(crate) fn write_xlsx(sheets: &[Sheet], path: &Path) -> AppResult<()> {
    let mut workbook = build_workbook(sheets)?;
    workbook.save(path)?;
    Ok(())
}

pub(crate) fn xlsx_bytes(sheets: &[Sheet]) -> AppResult<Vec<u8>> {
    let mut workbook = build_workbook(sheets)?;
    Ok(workbook.save_to_buffer()?)
}
