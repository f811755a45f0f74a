//! Spreadsheet sync payload
//!
//! Builds the body a sheet-sync endpoint receives (`action: updateSheets`)
//! and a change signature used to skip syncs when nothing changed. Sending
//! the body is left to the caller.

use crate::table::{readable, Table};
use chrono::{DateTime, Utc};
use magasin_core::Snapshot;
use serde::{Deserialize, Serialize};

/// Row tables keyed by sheet, header row first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetsPayload {
    /// Materials sheet
    pub materials: Vec<Vec<String>>,
    /// Racks sheet
    pub racks: Vec<Vec<String>>,
    /// Placements sheet
    pub placements: Vec<Vec<String>>,
    /// Summary sheet
    pub summary: Vec<Vec<String>>,
}

impl SheetsPayload {
    /// Build every sheet from a snapshot at `generated_at`
    #[must_use]
    pub fn build(snapshot: &Snapshot, generated_at: DateTime<Utc>) -> Self {
        Self {
            materials: materials_table(snapshot).to_grid(),
            racks: racks_table(snapshot).to_grid(),
            placements: placements_table(snapshot).to_grid(),
            summary: summary_table(snapshot, generated_at).to_grid(),
        }
    }
}

/// Request body wrapping the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncRequest {
    /// Always `updateSheets`
    pub action: &'static str,
    /// Sheet contents
    pub data: SheetsPayload,
    /// Build time
    pub timestamp: DateTime<Utc>,
}

impl SyncRequest {
    /// Wrap a freshly built payload
    #[must_use]
    pub fn new(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        Self {
            action: "updateSheets",
            data: SheetsPayload::build(snapshot, now),
            timestamp: now,
        }
    }
}

fn or_system(created_by: &str) -> String {
    if created_by.is_empty() {
        "System".to_string()
    } else {
        created_by.to_string()
    }
}

fn materials_table(snapshot: &Snapshot) -> Table {
    let mut table = Table::new(&[
        "ID",
        "Part Number",
        "Serial Number",
        "Type",
        "Description",
        "Supplier",
        "Date Received",
        "Barcode",
        "Created By",
        "Timestamp",
    ]);
    for m in &snapshot.materials {
        table.push(vec![
            m.id().to_string(),
            m.part_number().to_string(),
            m.serial_number().to_string(),
            m.material_type().to_string(),
            m.description().to_string(),
            m.supplier().to_string(),
            m.date_received().to_string(),
            m.barcode().to_string(),
            or_system(m.created_by()),
            readable(m.timestamp()),
        ]);
    }
    table
}

fn racks_table(snapshot: &Snapshot) -> Table {
    let mut table = Table::new(&[
        "ID",
        "Zone",
        "Row",
        "Level",
        "Code",
        "Capacity Note",
        "Barcode",
        "Created By",
        "Timestamp",
    ]);
    for r in &snapshot.racks {
        table.push(vec![
            r.id().to_string(),
            r.zone().to_string(),
            r.row().to_string(),
            r.level().to_string(),
            r.code().to_string(),
            r.capacity_note().to_string(),
            r.barcode().to_string(),
            or_system(r.created_by()),
            readable(r.timestamp()),
        ]);
    }
    table
}

fn placements_table(snapshot: &Snapshot) -> Table {
    let mut table = Table::new(&[
        "ID",
        "Material ID",
        "Rack ID",
        "Material Barcode",
        "Rack Barcode",
        "Matricule",
        "Created By",
        "Timestamp",
    ]);
    for p in &snapshot.placements {
        table.push(vec![
            p.id().to_string(),
            p.material_id().to_string(),
            p.rack_id().to_string(),
            p.material_barcode().to_string(),
            p.rack_barcode().to_string(),
            p.magasinier_matricule().to_string(),
            or_system(p.created_by()),
            readable(p.timestamp()),
        ]);
    }
    table
}

fn summary_table(snapshot: &Snapshot, generated_at: DateTime<Utc>) -> Table {
    let stamp = readable(generated_at);
    let mut table = Table::new(&["Metric", "Value", "Last Updated"]);
    for (metric, count) in [
        ("Total Materials", snapshot.materials.len()),
        ("Total Racks", snapshot.racks.len()),
        ("Total Placements", snapshot.placements.len()),
    ] {
        table.push(vec![metric.to_string(), count.to_string(), stamp.clone()]);
    }
    table.push(vec![
        "Last Sync".to_string(),
        generated_at.to_rfc3339(),
        stamp,
    ]);
    table
}

/// Cheap change detector: collection sizes and newest timestamps
///
/// Two snapshots with equal signatures are treated as unchanged for sync
/// purposes. Edits that keep sizes and tail timestamps (a capacity note)
/// are not detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSignature {
    /// Material count
    pub materials_count: usize,
    /// Rack count
    pub racks_count: usize,
    /// Placement count
    pub placements_count: usize,
    /// Timestamp of the last material
    pub last_material: Option<DateTime<Utc>>,
    /// Timestamp of the last rack
    pub last_rack: Option<DateTime<Utc>>,
    /// Timestamp of the last placement
    pub last_placement: Option<DateTime<Utc>>,
}

impl ChangeSignature {
    /// Signature of a snapshot
    #[must_use]
    pub fn of(snapshot: &Snapshot) -> Self {
        Self {
            materials_count: snapshot.materials.len(),
            racks_count: snapshot.racks.len(),
            placements_count: snapshot.placements.len(),
            last_material: snapshot.materials.last().map(|m| m.timestamp()),
            last_rack: snapshot.racks.last().map(|r| r.timestamp()),
            last_placement: snapshot.placements.last().map(|p| p.timestamp()),
        }
    }

    /// Stable string form, suitable for storing between runs
    #[must_use]
    pub fn key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Whether a sync is needed given the last synced key
    #[must_use]
    pub fn differs_from(&self, last_key: Option<&str>) -> bool {
        last_key != Some(self.key().as_str())
    }
}
