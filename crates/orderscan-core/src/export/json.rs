//! JSON export.

use serde_json::Value;

use super::Result;
use crate::models::order::OrderTable;

/// Encode a table as a JSON array.
///
/// Eight-column tables become an array of order line objects; anything else
/// becomes an array of header-keyed objects.
pub fn to_json(table: &OrderTable) -> Result<String> {
    let lines = table.lines();
    if !lines.is_empty() {
        return Ok(serde_json::to_string_pretty(&lines)?);
    }

    let records: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| {
            let object = table
                .headers()
                .iter()
                .cloned()
                .zip(row.iter().cloned().map(Value::String))
                .collect();
            Value::Object(object)
        })
        .collect();

    Ok(serde_json::to_string_pretty(&records)?)
}
