//! Excel workbook export
//!
//! Four sheets (Materials, Racks, Placements, Audit), each headed by the
//! record field names so the workbook maps one-to-one onto the JSON document.

use crate::error::{ExportError, Result};
use crate::table::{details_json, iso, Table};
use chrono::NaiveDate;
use magasin_core::Snapshot;
use std::path::Path;
use umya_spreadsheet::helper::coordinate::coordinate_from_index;

/// `warehouse_YYYY-MM-DD.xlsx`
#[must_use]
pub fn default_workbook_name(date: NaiveDate) -> String {
    format!("warehouse_{}.xlsx", date.format("%Y-%m-%d"))
}

/// Sheet name and contents, in workbook order
#[must_use]
pub fn workbook_tables(snapshot: &Snapshot) -> Vec<(&'static str, Table)> {
    let mut materials = Table::new(&[
        "id",
        "partNumber",
        "serialNumber",
        "type",
        "description",
        "supplier",
        "receptionMatricule",
        "dateReceived",
        "barcode",
        "createdBy",
        "timestamp",
    ]);
    for m in &snapshot.materials {
        materials.push(vec![
            m.id().to_string(),
            m.part_number().to_string(),
            m.serial_number().to_string(),
            m.material_type().to_string(),
            m.description().to_string(),
            m.supplier().to_string(),
            m.reception_matricule().to_string(),
            m.date_received().to_string(),
            m.barcode().to_string(),
            m.created_by().to_string(),
            iso(m.timestamp()),
        ]);
    }

    let mut racks = Table::new(&[
        "id",
        "zone",
        "row",
        "level",
        "code",
        "description",
        "capacityNote",
        "barcode",
        "createdBy",
        "timestamp",
    ]);
    for r in &snapshot.racks {
        racks.push(vec![
            r.id().to_string(),
            r.zone().to_string(),
            r.row().to_string(),
            r.level().to_string(),
            r.code().to_string(),
            r.description().to_string(),
            r.capacity_note().to_string(),
            r.barcode().to_string(),
            r.created_by().to_string(),
            iso(r.timestamp()),
        ]);
    }

    let mut placements = Table::new(&[
        "id",
        "materialId",
        "rackId",
        "materialBarcode",
        "rackBarcode",
        "user",
        "magasinierMatricule",
        "createdBy",
        "timestamp",
    ]);
    for p in &snapshot.placements {
        placements.push(vec![
            p.id().to_string(),
            p.material_id().to_string(),
            p.rack_id().to_string(),
            p.material_barcode().to_string(),
            p.rack_barcode().to_string(),
            p.user().to_string(),
            p.magasinier_matricule().to_string(),
            p.created_by().to_string(),
            iso(p.timestamp()),
        ]);
    }

    let mut audit = Table::new(&[
        "id",
        "timestamp",
        "user",
        "action",
        "entityType",
        "entityId",
        "details",
    ]);
    for e in snapshot.audit_log.entries() {
        audit.push(vec![
            e.id.to_string(),
            iso(e.timestamp),
            e.user.clone(),
            e.action.to_string(),
            e.entity_type.to_string(),
            e.entity_id.to_string(),
            details_json(&e.details),
        ]);
    }

    vec![
        ("Materials", materials),
        ("Racks", racks),
        ("Placements", placements),
        ("Audit", audit),
    ]
}

fn fill_sheet(sheet: &mut umya_spreadsheet::Worksheet, table: &Table) {
    for (row_idx, cells) in table.to_grid().into_iter().enumerate() {
        for (col_idx, value) in cells.into_iter().enumerate() {
            let (Ok(col), Ok(row)) = (u32::try_from(col_idx + 1), u32::try_from(row_idx + 1))
            else {
                return;
            };
            sheet
                .get_cell_mut(coordinate_from_index(&col, &row).as_str())
                .set_value(value);
        }
    }
}

/// Write the four-sheet workbook to `path`
///
/// # Errors
/// `Xlsx` when a sheet cannot be created or the file cannot be written.
pub fn write_workbook(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    for (name, table) in workbook_tables(snapshot) {
        let sheet = book
            .new_sheet(name)
            .map_err(|e| ExportError::Xlsx(format!("failed to create sheet {name}: {e}")))?;
        fill_sheet(sheet, &table);
    }
    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| ExportError::Xlsx(e.to_string()))?;
    tracing::info!("Exported workbook to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_workbook_name(date), "warehouse_2024-03-09.xlsx");
    }

    #[test]
    fn sheet_order_and_columns() {
        let tables = workbook_tables(&Snapshot::new());
        let names: Vec<_> = tables.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Materials", "Racks", "Placements", "Audit"]);
        assert!(tables[1].1.headers.contains(&"capacityNote"));
        assert!(tables[2].1.headers.contains(&"magasinierMatricule"));
    }
}
