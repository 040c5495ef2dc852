//! Record-to-row plumbing shared by the writers.

use std::collections::BTreeSet;

use dscout_core::DemandRecord;
use serde::ser::Error as _;
use serde_json::{Map, Value};

use crate::error::ExportError;

pub(crate) type Row = Map<String, Value>;

/// Serialize records into JSON object rows.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if a record fails to serialize.
pub(crate) fn to_rows(records: &[DemandRecord]) -> Result<Vec<Row>, ExportError> {
    records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(ExportError::Serialize(serde_json::Error::custom(
                "record did not serialize to an object",
            ))),
        })
        .collect()
}

/// Header columns for a row set.
///
/// Normally the canonical [`DemandRecord::COLUMNS`] order. If any row
/// carries a key outside the frozen schema (which the frozen struct should
/// make impossible), the header becomes the sorted union of all keys across
/// rows so no record's field is silently dropped.
pub(crate) fn columns(rows: &[Row]) -> Vec<String> {
    let union: BTreeSet<&str> = rows.iter().flat_map(|row| row.keys()).map(String::as_str).collect();

    let all_known = union
        .iter()
        .all(|key| DemandRecord::COLUMNS.iter().any(|column| column == key));
    if all_known {
        DemandRecord::COLUMNS.iter().map(|c| (*c).to_string()).collect()
    } else {
        union.into_iter().map(str::to_string).collect()
    }
}

/// Render one cell as plain text for the delimited writer.
pub(crate) fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
