//! CSV and spreadsheet readers.
//!
//! Both formats are rendered into the same plain-text grid: a row index on the
//! left, the header line on top and right-aligned columns, the way a dataframe
//! prints itself. That text goes into the prompt as-is.

use std::io::Cursor;

use calamine::{Reader, Xlsx, open_workbook_from_rs};
use tracing::debug;

use super::Result;
use crate::error::DocumentError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read CSV bytes (first row is the header) and render them as a text grid.
pub fn csv_to_text(data: &[u8]) -> Result<String> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| DocumentError::Csv(e.to_string()))?
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| DocumentError::Csv(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect::<Vec<_>>(),
        );
    }

    debug!("CSV: {} columns, {} rows", headers.len(), rows.len());
    Ok(render_grid(&headers, &rows))
}

/// Read the first worksheet of an XLSX workbook and render it as a text grid.
pub fn xlsx_to_text(data: &[u8]) -> Result<String> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))
        .map_err(|e| DocumentError::Spreadsheet(format!("Failed to open XLSX: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DocumentError::Spreadsheet("Workbook has no worksheets".to_string()))?
        .map_err(|e| DocumentError::Spreadsheet(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

    let headers = rows.next().unwrap_or_default();
    let rows: Vec<Vec<String>> = rows.collect();

    debug!("XLSX: {} columns, {} rows", headers.len(), rows.len());
    Ok(render_grid(&headers, &rows))
}

/// Render a header and rows as an aligned text grid with a row index.
///
/// Short rows are padded with empty cells; an empty header with no rows
/// renders as an empty string.
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);

    if columns == 0 {
        return String::new();
    }

    fn cell(row: &[String], col: usize) -> &str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
    let width = |s: &str| s.chars().count();

    let index_width = rows.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .map(|row| width(cell(row, col)))
                .chain(std::iter::once(width(cell(headers, col))))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |index: &str, row: &[String]| {
        let mut line = format!("{:>w$}", index, w = index_width);
        for (col, w) in widths.iter().enumerate() {
            let value = cell(row, col);
            let pad = w.saturating_sub(width(value));
            line.push_str("  ");
            line.push_str(&" ".repeat(pad));
            line.push_str(value);
        }
        line.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_line("", headers));
    for (i, row) in rows.iter().enumerate() {
        lines.push(format_line(&i.to_string(), row));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_render_grid_alignment() {
        let grid = render_grid(
            &strings(&["PO", "Qty"]),
            &[strings(&["PO-1", "5"]), strings(&["PO-22", "100"])],
        );
        assert_eq!(grid, "      PO  Qty\n0   PO-1    5\n1  PO-22  100");
    }

    #[test]
    fn test_render_grid_pads_short_rows() {
        let grid = render_grid(&strings(&["a", "b"]), &[strings(&["1"])]);
        assert_eq!(grid, "   a  b\n0  1");
    }

    #[test]
    fn test_render_grid_empty() {
        assert_eq!(render_grid(&[], &[]), "");
    }

    #[test]
    fn test_csv_to_text_strips_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice("物料编码,数量\nM-1,3\n".as_bytes());

        let text = csv_to_text(&data).unwrap();
        assert!(text.starts_with("   物料编码"));
        assert!(text.contains("M-1"));
    }

    #[test]
    fn test_csv_to_text_ragged_rows() {
        let text = csv_to_text(b"a,b,c\n1,2\n3,4,5,6\n").unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains('6'));
    }

    #[test]
    fn test_xlsx_first_sheet_rendered() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "物料编码").unwrap();
        sheet.write_string(0, 1, "数量").unwrap();
        sheet.write_string(1, 0, "M-1").unwrap();
        sheet.write_number(1, 1, 10.0).unwrap();
        sheet.write_string(2, 0, "M-22").unwrap();
        sheet.write_number(2, 1, 2.5).unwrap();
        workbook.add_worksheet().write_string(0, 0, "second sheet").unwrap();
        let data = workbook.save_to_buffer().unwrap();

        let text = xlsx_to_text(&data).unwrap();
        assert_eq!(text, "   物料编码   数量\n0   M-1   10\n1  M-22  2.5");
    }

    #[test]
    fn test_xlsx_garbage_fails() {
        let err = xlsx_to_text(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, DocumentError::Spreadsheet(_)));
    }
}
