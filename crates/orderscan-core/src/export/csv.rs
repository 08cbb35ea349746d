//! CSV export (UTF-8, optional byte-order mark).

use std::path::Path;

use tracing::debug;

use super::{Result, UTF8_BOM};
use crate::error::ExportError;
use crate::models::order::OrderTable;

/// Encode a table as CSV: header row, then data rows.
pub fn to_csv_bytes(table: &OrderTable, bom: bool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    if bom {
        out.extend_from_slice(UTF8_BOM);
    }

    let mut wtr = ::csv::Writer::from_writer(out);
    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Write a table to a CSV file.
pub fn write_csv(table: &OrderTable, path: &Path, bom: bool) -> Result<()> {
    let data = to_csv_bytes(table, bom)?;
    std::fs::write(path, &data)?;
    debug!("Wrote {} rows ({} bytes) to {}", table.len(), data.len(), path.display());
    Ok(())
}

/// Read a CSV export back into a table, ignoring a leading byte-order mark.
pub fn read_csv(data: &[u8]) -> Result<OrderTable> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ::csv::Reader::from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    if headers.is_empty() {
        return Err(ExportError::MissingHeader);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(String::from).collect());
    }

    Ok(OrderTable::new(headers, rows))
}
