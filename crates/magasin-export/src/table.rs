//! Header-plus-rows tables shared by the CSV, XLSX and sheet writers

use chrono::{DateTime, SecondsFormat, Utc};
use magasin_core::AuditDetails;

/// A rectangular text table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column titles
    pub headers: Vec<&'static str>,
    /// Data rows, each as wide as `headers`
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create table with headers and no rows
    #[must_use]
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    /// Header row followed by every data row
    #[must_use]
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        std::iter::once(self.headers.iter().map(ToString::to_string).collect())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

/// `2024-01-15T08:00:00.000Z`
pub(crate) fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `2024-01-15 08:00:00`
pub(crate) fn readable(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub(crate) fn details_json(details: &AuditDetails) -> String {
    serde_json::to_string(details).unwrap_or_default()
}
