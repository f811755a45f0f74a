//! Per-collection CSV export
//!
//! One file per collection, header row first, timestamps in ISO-8601.

use crate::error::{ExportError, Result};
use crate::table::{details_json, iso, Table};
use magasin_core::Snapshot;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exportable collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Materials
    Materials,
    /// Racks
    Racks,
    /// Placements
    Placements,
    /// Audit log
    Audit,
}

impl Collection {
    /// All collections
    pub const ALL: [Collection; 4] = [
        Collection::Materials,
        Collection::Racks,
        Collection::Placements,
        Collection::Audit,
    ];

    /// Lower-case name, also the file stem
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Materials => "materials",
            Collection::Racks => "racks",
            Collection::Placements => "placements",
            Collection::Audit => "audit",
        }
    }

    /// `materials.csv` etc.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl std::str::FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown collection '{s}'"))
    }
}

/// Table for one collection with the CSV column set
#[must_use]
pub fn csv_table(snapshot: &Snapshot, collection: Collection) -> Table {
    match collection {
        Collection::Materials => {
            let mut table = Table::new(&[
                "ID",
                "Part Number",
                "Serial Number",
                "Type",
                "Description",
                "Supplier",
                "Date Received",
                "Barcode",
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
                    iso(m.timestamp()),
                ]);
            }
            table
        }
        Collection::Racks => {
            let mut table = Table::new(&[
                "ID",
                "Zone",
                "Row",
                "Level",
                "Code",
                "Description",
                "Barcode",
                "Timestamp",
            ]);
            for r in &snapshot.racks {
                table.push(vec![
                    r.id().to_string(),
                    r.zone().to_string(),
                    r.row().to_string(),
                    r.level().to_string(),
                    r.code().to_string(),
                    r.description().to_string(),
                    r.barcode().to_string(),
                    iso(r.timestamp()),
                ]);
            }
            table
        }
        Collection::Placements => {
            let mut table = Table::new(&[
                "ID",
                "Material ID",
                "Rack ID",
                "Material Barcode",
                "Rack Barcode",
                "User",
                "Timestamp",
            ]);
            for p in &snapshot.placements {
                table.push(vec![
                    p.id().to_string(),
                    p.material_id().to_string(),
                    p.rack_id().to_string(),
                    p.material_barcode().to_string(),
                    p.rack_barcode().to_string(),
                    p.user().to_string(),
                    iso(p.timestamp()),
                ]);
            }
            table
        }
        Collection::Audit => {
            let mut table = Table::new(&[
                "ID",
                "Timestamp",
                "User",
                "Action",
                "Entity Type",
                "Entity ID",
                "Details",
            ]);
            for e in snapshot.audit_log.entries() {
                table.push(vec![
                    e.id.to_string(),
                    iso(e.timestamp),
                    e.user.clone(),
                    e.action.to_string(),
                    e.entity_type.to_string(),
                    e.entity_id.to_string(),
                    details_json(&e.details),
                ]);
            }
            table
        }
    }
}

/// Write one collection as CSV
///
/// # Errors
/// Any writer failure.
pub fn write_csv<W: Write>(snapshot: &Snapshot, collection: Collection, out: W) -> Result<()> {
    let table = csv_table(snapshot, collection);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// One collection as a CSV string
///
/// # Errors
/// Any writer failure.
pub fn to_csv_string(snapshot: &Snapshot, collection: Collection) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(snapshot, collection, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `<collection>.csv` into `dir`
///
/// # Errors
/// IO or writer failure.
pub fn export_csv(snapshot: &Snapshot, collection: Collection, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(collection.file_name());
    let file = std::fs::File::create(&path).map_err(|e| ExportError::io_error(&path, e))?;
    write_csv(snapshot, collection, std::io::BufWriter::new(file))?;
    tracing::info!("Exported {} to {}", collection.as_str(), path.display());
    Ok(path)
}
