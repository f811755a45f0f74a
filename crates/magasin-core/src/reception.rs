//! Bulk reception input
//!
//! Accepts either a JSON array of material objects or header-first CSV text
//! whose headers are the JSON keys (`partNumber,serialNumber,type,...`).
//! Rows that cannot be read at all are counted, not fatal.

use crate::types::MaterialDraft;

/// Reception rows parsed from operator input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceptionBatch {
    /// Readable rows, input order
    pub rows: Vec<MaterialDraft>,
    /// Rows that could not be decoded into a draft
    pub unreadable: usize,
}

impl ReceptionBatch {
    /// Parse JSON first, falling back to CSV
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Array(items)) => Self::from_json_items(items),
            Ok(_) => {
                tracing::warn!("Bulk reception JSON is not an array, nothing to import");
                Self::default()
            }
            Err(_) => Self::from_csv(trimmed),
        }
    }

    fn from_json_items(items: Vec<serde_json::Value>) -> Self {
        let mut batch = Self::default();
        for item in items {
            match serde_json::from_value::<MaterialDraft>(item) {
                Ok(draft) => batch.rows.push(draft),
                Err(e) => {
                    tracing::debug!("Unreadable reception row: {}", e);
                    batch.unreadable += 1;
                }
            }
        }
        batch
    }

    fn from_csv(text: &str) -> Self {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut batch = Self::default();
        for record in reader.deserialize::<MaterialDraft>() {
            match record {
                Ok(draft) => batch.rows.push(draft),
                Err(e) => {
                    tracing::debug!("Unreadable reception row: {}", e);
                    batch.unreadable += 1;
                }
            }
        }
        batch
    }

    /// Total rows seen
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len() + self.unreadable
    }

    /// Whether no row was found
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<MaterialDraft>> for ReceptionBatch {
    fn from(rows: Vec<MaterialDraft>) -> Self {
        Self {
            rows,
            unreadable: 0,
        }
    }
}

/// Outcome of a bulk reception
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Materials created
    pub added: usize,
    /// Rows failing validation or unreadable
    pub invalid: usize,
    /// Rows whose P/N + S/N already existed
    pub duplicates: usize,
}

impl BulkReport {
    /// Rows not imported
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.invalid + self.duplicates
    }
}
