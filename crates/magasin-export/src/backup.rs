//! JSON backup
//!
//! A backup is the snapshot document plus `backupDate` and `version`, so it
//! can be loaded back as a snapshot directly.

use crate::error::{ExportError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use magasin_core::Snapshot;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Backup format version
pub const BACKUP_VERSION: &str = "1.0";

/// Backup document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup<'a> {
    /// Full snapshot, inlined
    #[serde(flatten)]
    pub snapshot: &'a Snapshot,
    /// Creation time
    pub backup_date: DateTime<Utc>,
    /// Format version
    pub version: &'static str,
}

impl<'a> Backup<'a> {
    /// Wrap a snapshot
    #[must_use]
    pub fn new(snapshot: &'a Snapshot, backup_date: DateTime<Utc>) -> Self {
        Self {
            snapshot,
            backup_date,
            version: BACKUP_VERSION,
        }
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Encoding failure.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `warehouse_backup_YYYY-MM-DD.json`
#[must_use]
pub fn default_backup_name(date: NaiveDate) -> String {
    format!("warehouse_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Write a dated backup into `dir`
///
/// # Errors
/// Encoding or IO failure.
pub fn write_backup(snapshot: &Snapshot, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    let path = dir.join(default_backup_name(now.date_naive()));
    let json = Backup::new(snapshot, now).to_json()?;
    std::fs::write(&path, json).map_err(|e| ExportError::io_error(&path, e))?;
    tracing::info!("Backup written to {}", path.display());
    Ok(path)
}
