//! Magasin Export - read-only views of a warehouse snapshot
//!
//! Provides:
//! - CSV per collection
//! - Four-sheet XLSX workbook
//! - Spreadsheet sync payload and change signature
//! - Dated JSON backup
//!
//! Nothing here mutates the snapshot.

#![warn(unreachable_pub)]

pub mod backup;
pub mod csv_export;
pub mod error;
pub mod sheets;
pub mod table;
pub mod xlsx;

pub use backup::{default_backup_name, write_backup, Backup, BACKUP_VERSION};
pub use csv_export::{csv_table, export_csv, to_csv_string, write_csv, Collection};
pub use error::{ExportError, Result};
pub use sheets::{ChangeSignature, SheetsPayload, SyncRequest};
pub use table::Table;
pub use xlsx::{default_workbook_name, workbook_tables, write_workbook};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
