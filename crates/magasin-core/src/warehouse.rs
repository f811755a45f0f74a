//! Warehouse repository
//!
//! Owns the in-memory [`Snapshot`] and the persistence port. Every mutation
//! follows the same staged commit:
//! 1. clone the snapshot
//! 2. apply the change and its audit entry to the clone
//! 3. save the clone
//! 4. swap it in
//!
//! A failed step leaves the live snapshot untouched, so a storage failure
//! never produces a record without its audit entry or the reverse.

use crate::audit::{AuditEntry, AuditEvent};
use crate::clock::{Clock, SystemClock};
use crate::config::MagasinConfig;
use crate::error::{MagasinError, Result, ValidationError};
use crate::input::{fold, sanitize};
use crate::reception::{BulkReport, ReceptionBatch};
use crate::resolver::{resolve_material, resolve_rack, Resolution};
use crate::store::{Persistence, Snapshot};
use crate::types::{
    EntityType, IdPrefix, Material, MaterialDraft, Placement, Rack, RackDraft, RecordId,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Audit reason recorded by [`Warehouse::undo_last_placement`]
pub const UNDO_REASON: &str = "User undo last placement";

/// Collection sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarehouseStats {
    /// Materials
    pub materials: usize,
    /// Racks
    pub racks: usize,
    /// Placements
    pub placements: usize,
    /// Audit entries
    pub audit_entries: usize,
}

/// Result of an undo request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    /// No placement exists
    NothingToUndo,
    /// Operator declined the confirmation
    Declined,
    /// Placement removed and DELETE audited
    Removed(Placement),
}

/// Staged copy of the snapshot
struct Txn {
    next: Snapshot,
    now: DateTime<Utc>,
    user: String,
}

impl Txn {
    fn next_id(&mut self, prefix: IdPrefix) -> Result<RecordId> {
        Ok(self.next.sequences.next(prefix)?)
    }

    fn audit(&mut self, event: AuditEvent) -> Result<()> {
        let id = self.next.sequences.next(IdPrefix::Audit)?;
        self.next.audit_log.record(id, self.now, &self.user, event);
        Ok(())
    }
}

/// Repository over materials, racks, placements and the audit log
#[derive(Debug)]
pub struct Warehouse {
    snapshot: Snapshot,
    store: Box<dyn Persistence>,
    clock: Arc<dyn Clock>,
    config: MagasinConfig,
}

impl Warehouse {
    /// Load the warehouse from `store`
    ///
    /// # Errors
    /// `Storage` when the stored document cannot be read.
    pub fn open(store: impl Persistence + 'static, config: MagasinConfig) -> Result<Self> {
        let snapshot = store.load()?;
        tracing::info!(
            "Opened warehouse: {} materials, {} racks, {} placements, {} audit entries",
            snapshot.materials.len(),
            snapshot.racks.len(),
            snapshot.placements.len(),
            snapshot.audit_log.len()
        );
        Ok(Self {
            snapshot,
            store: Box::new(store),
            clock: Arc::new(SystemClock),
            config,
        })
    }

    /// With time source
    #[inline]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MagasinConfig {
        &self.config
    }

    fn begin(&self) -> Txn {
        Txn {
            next: self.snapshot.clone(),
            now: self.clock.now(),
            user: self.config.operator.clone(),
        }
    }

    fn finish(&mut self, txn: Txn) -> Result<()> {
        if let Err(e) = self.store.save(&txn.next) {
            tracing::error!("Save failed, mutation discarded: {}", e);
            return Err(e.into());
        }
        self.snapshot = txn.next;
        Ok(())
    }

    // ---- Reception ------------------------------------------------------

    /// Register a received material
    ///
    /// # Errors
    /// - `ValidationFailed` on a missing or short P/N or S/N
    /// - `DuplicateEntity` when the P/N + S/N pair exists
    /// - `Storage` when the save fails
    pub fn register_material(&mut self, draft: &MaterialDraft) -> Result<Material> {
        let mut txn = self.begin();
        let material =
            self.stage_material(&mut txn, draft, self.config.min_identifier_len)?;
        self.finish(txn)?;

        tracing::info!(
            "Registered material {} ({} / {})",
            material.id(),
            material.part_number(),
            material.serial_number()
        );
        Ok(material)
    }

    /// `min_len` is the configured minimum for single receptions and 1 for
    /// bulk rows, which only require both identifiers to be present.
    fn stage_material(
        &self,
        txn: &mut Txn,
        draft: &MaterialDraft,
        min_len: usize,
    ) -> Result<Material> {
        let (part_number, serial_number) = draft.natural_key(min_len)?;
        if txn
            .next
            .materials
            .iter()
            .any(|m| m.has_natural_key(&part_number, &serial_number))
        {
            return Err(MagasinError::duplicate(
                EntityType::Material,
                format!("{part_number} / {serial_number}"),
            ));
        }

        let id = txn.next_id(IdPrefix::Material)?;
        let material = Material::create(id, draft, &self.config, &txn.user, txn.now)?;
        txn.audit(
            AuditEvent::created(EntityType::Material, material.id().clone())
                .detail("partNumber", material.part_number())
                .detail("serialNumber", material.serial_number())
                .detail("type", material.material_type())
                .detail("receptionMatricule", material.reception_matricule()),
        )?;
        txn.next.materials.push(material.clone());
        Ok(material)
    }

    /// Register every valid, new row of a reception batch in one save
    ///
    /// Rows only need a non-empty P/N and S/N; the minimum length of single
    /// receptions does not apply. Invalid rows and P/N + S/N duplicates (against the store or earlier
    /// rows of the batch) are skipped and counted. Nothing is saved when no
    /// row is added.
    ///
    /// # Errors
    /// `Storage` when the save fails; no row is kept in that case.
    pub fn bulk_receive(&mut self, batch: &ReceptionBatch) -> Result<BulkReport> {
        let mut txn = self.begin();
        let mut report = BulkReport {
            invalid: batch.unreadable,
            ..BulkReport::default()
        };

        for draft in &batch.rows {
            match self.stage_material(&mut txn, draft, 1) {
                Ok(_) => report.added += 1,
                Err(MagasinError::DuplicateEntity { .. }) => report.duplicates += 1,
                Err(MagasinError::ValidationFailed(e)) => {
                    tracing::debug!("Skipping reception row: {}", e);
                    report.invalid += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if report.added > 0 {
            self.finish(txn)?;
        }
        tracing::info!(
            "Bulk reception: {} added, {} invalid, {} duplicates",
            report.added,
            report.invalid,
            report.duplicates
        );
        Ok(report)
    }

    // ---- Racks ----------------------------------------------------------

    /// Create a rack
    ///
    /// # Errors
    /// - `ValidationFailed` on an incomplete location
    /// - `DuplicateEntity` when the code exists (case-insensitive)
    /// - `Storage` when the save fails
    pub fn register_rack(&mut self, draft: &RackDraft) -> Result<Rack> {
        let mut txn = self.begin();
        let (_, _, _, code) = draft.location()?;
        let folded = fold(&code);
        if txn.next.racks.iter().any(|r| fold(r.code()) == folded) {
            return Err(MagasinError::duplicate(EntityType::Rack, code));
        }

        let id = txn.next_id(IdPrefix::Rack)?;
        let rack = Rack::create(id, draft, &txn.user, txn.now)?;
        txn.audit(
            AuditEvent::created(EntityType::Rack, rack.id().clone())
                .detail("code", rack.code())
                .detail("zone", rack.zone())
                .detail("row", rack.row())
                .detail("level", rack.level()),
        )?;
        txn.next.racks.push(rack.clone());
        self.finish(txn)?;

        tracing::info!("Registered rack {} ({})", rack.id(), rack.code());
        Ok(rack)
    }

    /// Set the capacity note of the rack with `code`
    ///
    /// # Errors
    /// `NotFound` for an unknown code, `Storage` when the save fails.
    pub fn set_rack_capacity_note(&mut self, code: &str, note: &str) -> Result<Rack> {
        let rack_id = resolve_rack(code, &self.snapshot.racks)?.id().clone();
        let note = sanitize(note);

        let mut txn = self.begin();
        let rack = txn
            .next
            .racks
            .iter_mut()
            .find(|r| r.id() == &rack_id)
            .ok_or_else(|| MagasinError::not_found(EntityType::Rack, code.trim()))?;
        rack.set_capacity_note(note.clone());
        let updated = rack.clone();
        txn.audit(
            AuditEvent::updated(EntityType::Rack, rack_id).detail("capacityNote", note),
        )?;
        self.finish(txn)?;

        tracing::info!("Capacity note set on rack {}", updated.code());
        Ok(updated)
    }

    // ---- Lookup ---------------------------------------------------------

    /// Resolve a material scan
    ///
    /// # Errors
    /// `NotFound` when no tier matches.
    pub fn resolve_material(&self, scan: &str) -> Result<Resolution<'_>> {
        resolve_material(scan, &self.snapshot.materials)
    }

    /// Resolve a material scan to its record
    ///
    /// # Errors
    /// `NotFound` when no tier matches.
    pub fn find_material(&self, scan: &str) -> Result<&Material> {
        self.resolve_material(scan).map(|r| r.material)
    }

    /// Resolve a rack scan by barcode, then code
    ///
    /// # Errors
    /// `NotFound` when neither matches.
    pub fn find_rack(&self, scan: &str) -> Result<&Rack> {
        resolve_rack(scan, &self.snapshot.racks)
    }

    /// Material with exactly this id
    #[must_use]
    pub fn material(&self, id: &RecordId) -> Option<&Material> {
        self.snapshot.materials.iter().find(|m| m.id() == id)
    }

    /// Rack with exactly this id
    #[must_use]
    pub fn rack(&self, id: &RecordId) -> Option<&Rack> {
        self.snapshot.racks.iter().find(|r| r.id() == id)
    }

    /// Materials whose P/N, S/N, type, supplier or description contain `query`
    #[must_use]
    pub fn search_materials(&self, query: &str) -> Vec<&Material> {
        let q = fold(query);
        self.snapshot
            .materials
            .iter()
            .filter(|m| {
                [
                    m.part_number(),
                    m.serial_number(),
                    m.material_type(),
                    m.supplier(),
                    m.description(),
                ]
                .iter()
                .any(|field| contains_folded(field, &q))
            })
            .collect()
    }

    /// Racks whose code, zone or description contain `query`
    #[must_use]
    pub fn search_racks(&self, query: &str) -> Vec<&Rack> {
        let q = fold(query);
        self.snapshot
            .racks
            .iter()
            .filter(|r| {
                [r.code(), r.zone(), r.description()]
                    .iter()
                    .any(|field| contains_folded(field, &q))
            })
            .collect()
    }

    /// Placements whose material P/N or S/N, or rack code, contain `query`
    ///
    /// Placements whose material or rack no longer exists only match an
    /// empty query.
    #[must_use]
    pub fn search_placements(&self, query: &str) -> Vec<&Placement> {
        let q = fold(query);
        self.snapshot
            .placements
            .iter()
            .filter(|p| {
                if q.is_empty() {
                    return true;
                }
                let material_hit = self.material(p.material_id()).is_some_and(|m| {
                    contains_folded(m.part_number(), &q) || contains_folded(m.serial_number(), &q)
                });
                let rack_hit = self
                    .rack(p.rack_id())
                    .is_some_and(|r| contains_folded(r.code(), &q));
                material_hit || rack_hit
            })
            .collect()
    }

    /// Collection sizes
    #[must_use]
    pub fn stats(&self) -> WarehouseStats {
        WarehouseStats {
            materials: self.snapshot.materials.len(),
            racks: self.snapshot.racks.len(),
            placements: self.snapshot.placements.len(),
            audit_entries: self.snapshot.audit_log.len(),
        }
    }

    /// Newest audit entries, capped at the configured display limit
    #[must_use]
    pub fn recent_audit(&self) -> Vec<&AuditEntry> {
        self.snapshot
            .audit_log
            .list_recent(self.config.audit_display_limit)
    }

    // ---- Placement ------------------------------------------------------

    /// Create a placement and its CREATE audit entry
    ///
    /// Both ids must still exist in the current snapshot.
    pub(crate) fn record_placement(
        &mut self,
        material_id: &RecordId,
        rack_id: &RecordId,
        matricule: &str,
    ) -> Result<Placement> {
        let matricule = sanitize(matricule);
        if matricule.is_empty() {
            return Err(ValidationError::MissingMatricule.into());
        }
        let material = self
            .material(material_id)
            .ok_or_else(|| MagasinError::not_found(EntityType::Material, material_id.as_str()))?;
        let rack = self
            .rack(rack_id)
            .ok_or_else(|| MagasinError::not_found(EntityType::Rack, rack_id.as_str()))?;

        let mut txn = self.begin();
        let id = txn.next_id(IdPrefix::Placement)?;
        let placement = Placement::create(id, material, rack, matricule, &txn.user, txn.now);
        txn.audit(
            AuditEvent::created(EntityType::Placement, placement.id().clone())
                .detail("materialId", placement.material_id().as_str())
                .detail("rackId", placement.rack_id().as_str())
                .detail("materialBarcode", placement.material_barcode())
                .detail("rackBarcode", placement.rack_barcode())
                .detail("magasinierMatricule", placement.magasinier_matricule()),
        )?;
        txn.next.placements.push(placement.clone());
        self.finish(txn)?;

        tracing::info!(
            "Placement {} committed: {} -> {} by {}",
            placement.id(),
            placement.material_barcode(),
            placement.rack_barcode(),
            placement.magasinier_matricule()
        );
        Ok(placement)
    }

    /// Remove the most recently inserted placement
    ///
    /// `confirm` sees the placement about to be removed; returning `false`
    /// leaves everything unchanged.
    ///
    /// # Errors
    /// `Storage` when the save fails; the placement is kept in that case.
    pub fn undo_last_placement(
        &mut self,
        confirm: impl FnOnce(&Placement) -> bool,
    ) -> Result<UndoOutcome> {
        let Some(last) = self.snapshot.placements.last() else {
            tracing::info!("No placement to undo");
            return Ok(UndoOutcome::NothingToUndo);
        };
        if !confirm(last) {
            return Ok(UndoOutcome::Declined);
        }

        let mut txn = self.begin();
        let Some(removed) = txn.next.placements.pop() else {
            return Ok(UndoOutcome::NothingToUndo);
        };
        txn.audit(
            AuditEvent::deleted(EntityType::Placement, removed.id().clone())
                .detail("reason", UNDO_REASON),
        )?;
        self.finish(txn)?;

        tracing::info!("Undid placement {}", removed.id());
        Ok(UndoOutcome::Removed(removed))
    }

    // ---- Whole-store operations -----------------------------------------

    /// Wipe every collection, the audit log and the id counters
    ///
    /// Returns `false` without touching anything when `confirm` declines.
    ///
    /// # Errors
    /// `Storage` when the save fails.
    pub fn clear_all(&mut self, confirm: impl FnOnce(&WarehouseStats) -> bool) -> Result<bool> {
        let stats = self.stats();
        if !confirm(&stats) {
            return Ok(false);
        }
        let txn = Txn {
            next: Snapshot::default(),
            now: self.clock.now(),
            user: self.config.operator.clone(),
        };
        self.finish(txn)?;
        tracing::warn!(
            "Cleared all data: {} materials, {} racks, {} placements, {} audit entries",
            stats.materials,
            stats.racks,
            stats.placements,
            stats.audit_entries
        );
        Ok(true)
    }

    /// Replace everything with an imported snapshot
    ///
    /// The import is rejected when it repeats a P/N + S/N pair or a rack code.
    ///
    /// # Errors
    /// `ValidationFailed` on a conflicting document, `Storage` when the save
    /// fails.
    pub fn import_snapshot(&mut self, mut snapshot: Snapshot) -> Result<WarehouseStats> {
        validate_import(&snapshot)?;
        snapshot.reconcile_sequences();

        let txn = Txn {
            next: snapshot,
            now: self.clock.now(),
            user: self.config.operator.clone(),
        };
        self.finish(txn)?;

        let stats = self.stats();
        tracing::info!(
            "Imported {} materials, {} racks, {} placements",
            stats.materials,
            stats.racks,
            stats.placements
        );
        Ok(stats)
    }
}

fn contains_folded(field: &str, folded_query: &str) -> bool {
    field.to_lowercase().contains(folded_query)
}

fn validate_import(snapshot: &Snapshot) -> Result<(), ValidationError> {
    let mut keys = std::collections::HashSet::new();
    for m in &snapshot.materials {
        if !keys.insert((m.part_number(), m.serial_number())) {
            return Err(ValidationError::InvalidImport(format!(
                "duplicate material {} / {}",
                m.part_number(),
                m.serial_number()
            )));
        }
    }
    let mut codes = std::collections::HashSet::new();
    for r in &snapshot.racks {
        if !codes.insert(fold(r.code())) {
            return Err(ValidationError::InvalidImport(format!(
                "duplicate rack code {}",
                r.code()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::AuditAction;

    fn warehouse() -> Warehouse {
        Warehouse::open(MemoryStore::new(), MagasinConfig::default()).unwrap()
    }

    #[test]
    fn register_material_audits_create() {
        let mut wh = warehouse();
        let m = wh
            .register_material(&MaterialDraft::new("PN-100", "SN-200").with_reception_matricule("R7"))
            .unwrap();
        assert_eq!(m.id().as_str(), "MAT001");

        let entry = wh.snapshot().audit_log.last().unwrap();
        assert_eq!(entry.action, AuditAction::Create);
        assert_eq!(entry.entity_type, EntityType::Material);
        assert_eq!(entry.details["receptionMatricule"], "R7");
        assert_eq!(entry.details["type"], "Electronic");
    }

    #[test]
    fn duplicate_natural_key_rejected() {
        let mut wh = warehouse();
        wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        let err = wh
            .register_material(&MaterialDraft::new(" PN-100", "SN-200 "))
            .unwrap_err();
        assert!(matches!(err, MagasinError::DuplicateEntity { .. }));
        assert_eq!(wh.stats().materials, 1);
        assert_eq!(wh.stats().audit_entries, 1);
    }

    #[test]
    fn rack_code_unique_ignoring_case() {
        let mut wh = warehouse();
        wh.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
        let err = wh.register_rack(&RackDraft::new("a", "01", "01")).unwrap_err();
        assert!(matches!(
            err,
            MagasinError::DuplicateEntity {
                entity: EntityType::Rack,
                ..
            }
        ));
    }

    #[test]
    fn capacity_note_is_audited_update() {
        let mut wh = warehouse();
        wh.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
        let rack = wh.set_rack_capacity_note("a-01-01", "Max 20 items").unwrap();
        assert_eq!(rack.capacity_note(), "Max 20 items");

        let entry = wh.snapshot().audit_log.last().unwrap();
        assert_eq!(entry.action, AuditAction::Update);
        assert_eq!(entry.details["capacityNote"], "Max 20 items");

        assert!(wh.set_rack_capacity_note("Z-99-99", "x").is_err());
    }

    #[test]
    fn bulk_receive_skips_invalid_and_duplicates() {
        let mut wh = warehouse();
        wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        let batch = ReceptionBatch::from(vec![
            MaterialDraft::new("PN-100", "SN-200"),
            MaterialDraft::new("PN-101", "SN-201"),
            MaterialDraft::new("PN-101", "SN-201"),
            MaterialDraft::new("", "SN-202"),
            MaterialDraft::new("PN-103", "SN-203"),
        ]);
        let report = wh.bulk_receive(&batch).unwrap();
        assert_eq!(
            report,
            BulkReport {
                added: 2,
                invalid: 1,
                duplicates: 2
            }
        );
        assert_eq!(wh.stats().materials, 3);
        assert_eq!(wh.stats().audit_entries, 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut wh = warehouse();
        wh.register_material(&MaterialDraft::new("PN-100", "SN-200").with_supplier("Safran"))
            .unwrap();
        wh.register_material(&MaterialDraft::new("PN-300", "SN-400")).unwrap();
        wh.register_rack(&RackDraft::new("B", "02", "03").with_description("Cold room"))
            .unwrap();

        assert_eq!(wh.search_materials("safr").len(), 1);
        assert_eq!(wh.search_materials("").len(), 2);
        assert_eq!(wh.search_racks("COLD").len(), 1);
    }

    #[test]
    fn search_placements_by_linked_records() {
        let mut wh = warehouse();
        let m = wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        let r = wh.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
        wh.record_placement(m.id(), r.id(), "OP42").unwrap();

        assert_eq!(wh.search_placements("sn-2").len(), 1);
        assert_eq!(wh.search_placements("a-01").len(), 1);
        assert!(wh.search_placements("zzz").is_empty());
    }

    #[test]
    fn record_placement_requires_matricule() {
        let mut wh = warehouse();
        let m = wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        let r = wh.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
        let err = wh.record_placement(m.id(), r.id(), " <b></b> ").unwrap_err();
        assert!(matches!(
            err,
            MagasinError::ValidationFailed(ValidationError::MissingMatricule)
        ));
        assert_eq!(wh.stats().placements, 0);
    }

    #[test]
    fn undo_nothing_and_declined() {
        let mut wh = warehouse();
        assert_eq!(
            wh.undo_last_placement(|_| true).unwrap(),
            UndoOutcome::NothingToUndo
        );

        let m = wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        let r = wh.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
        wh.record_placement(m.id(), r.id(), "OP42").unwrap();
        let before = wh.stats();
        assert_eq!(wh.undo_last_placement(|_| false).unwrap(), UndoOutcome::Declined);
        assert_eq!(wh.stats(), before);
    }

    #[test]
    fn ids_not_reused_after_undo() {
        let mut wh = warehouse();
        let m = wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        let r = wh.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
        wh.record_placement(m.id(), r.id(), "OP42").unwrap();
        wh.undo_last_placement(|_| true).unwrap();
        let again = wh.record_placement(m.id(), r.id(), "OP42").unwrap();
        assert_eq!(again.id().as_str(), "PLACE002");
    }

    #[test]
    fn clear_all_resets_counters() {
        let mut wh = warehouse();
        wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        assert!(!wh.clear_all(|_| false).unwrap());
        assert_eq!(wh.stats().materials, 1);

        assert!(wh.clear_all(|s| s.materials == 1).unwrap());
        assert_eq!(wh.stats(), WarehouseStats::default());
        let m = wh.register_material(&MaterialDraft::new("PN-100", "SN-200")).unwrap();
        assert_eq!(m.id().as_str(), "MAT001");
    }

    #[test]
    fn import_rejects_duplicate_codes() {
        let mut source = warehouse();
        source.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
        let mut snapshot = source.snapshot().clone();
        snapshot.racks.push(snapshot.racks[0].clone());

        let mut wh = warehouse();
        let err = wh.import_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            MagasinError::ValidationFailed(ValidationError::InvalidImport(_))
        ));
        assert_eq!(wh.stats(), WarehouseStats::default());
    }

    #[test]
    fn bulk_rows_skip_minimum_length() {
        let mut wh = warehouse();
        assert!(wh.register_material(&MaterialDraft::new("AB", "SN-1")).is_err());

        let batch = ReceptionBatch::from(vec![MaterialDraft::new("AB", "SN-1")]);
        let report = wh.bulk_receive(&batch).unwrap();
        assert_eq!(
            report,
            BulkReport {
                added: 1,
                invalid: 0,
                duplicates: 0
            }
        );
        assert_eq!(wh.snapshot().materials[0].part_number(), "AB");
    }

    #[test]
    fn exhausted_sequence_fails_without_change() {
        let store = MemoryStore::new()
            .with_document(r#"{"sequences":{"material":18446744073709551615}}"#);
        let mut wh = Warehouse::open(store, MagasinConfig::default()).unwrap();
        let err = wh
            .register_material(&MaterialDraft::new("PN-100", "SN-200"))
            .unwrap_err();
        assert!(err.is_storage_failure());
        assert_eq!(wh.stats(), WarehouseStats::default());

        wh.register_rack(&RackDraft::new("A", "01", "01")).unwrap();
    }
}
