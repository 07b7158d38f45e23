//! Raw tabular input as it arrives from an allocation export.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An untyped table: ordered headers plus rows of raw cell values.
///
/// Rows are padded/truncated to the header width by the reader; cell values
/// are already trimmed. Column meaning is unknown until detection runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|name| name.eq_ignore_ascii_case(header))
    }

    /// Cell value at `(row, header)`, empty string when out of range.
    pub fn value(&self, row: usize, header: &str) -> &str {
        let Some(column) = self.column_index(header) else {
            return "";
        };
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The row as a header → value record, for traceability of ingested rows.
    pub fn record(&self, row: usize) -> BTreeMap<String, String> {
        let mut record = BTreeMap::new();
        let Some(cells) = self.rows.get(row) else {
            return record;
        };
        for (index, header) in self.headers.iter().enumerate() {
            let value = cells.get(index).map(String::as_str).unwrap_or("");
            record.insert(header.clone(), value.to_string());
        }
        record
    }

    /// True when the row repeats the header line inside the data body.
    ///
    /// Exports glued together from several sheets carry the header row again
    /// before each section; such a row has more than half of its non-empty
    /// values equal to (or contained in) the name of their own column.
    pub fn row_echoes_header(&self, row: usize) -> bool {
        let Some(cells) = self.rows.get(row) else {
            return false;
        };
        let mut non_empty = 0usize;
        let mut echoes = 0usize;
        for (index, cell) in cells.iter().enumerate() {
            let value = cell.trim();
            if value.is_empty() {
                continue;
            }
            non_empty += 1;
            let Some(header) = self.headers.get(index) else {
                continue;
            };
            let header_lower = header.to_lowercase();
            let value_lower = value.to_lowercase();
            if header_lower == value_lower || header_lower.contains(&value_lower) {
                echoes += 1;
            }
        }
        non_empty > 0 && echoes * 2 > non_empty
    }
}

/// Hints about a raw column's contents, computed from a full pass over the
/// table and consumed by callers that want cheap shape information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnHint {
    /// True if every non-empty value parses as a number.
    pub is_numeric: bool,
    /// Ratio of unique values to non-empty values (0.0 to 1.0).
    pub unique_ratio: f64,
    /// Ratio of empty values to total rows (0.0 to 1.0).
    pub null_ratio: f64,
}
