//! Persistence port
//!
//! The warehouse never writes partial state: every mutation hands the full
//! [`Snapshot`] to a [`Persistence`] implementation.
//!
//! - [`MemoryStore`]: in-memory JSON document with an optional byte quota
//! - [`JsonFileStore`]: one JSON file, replaced atomically on each save

use crate::audit::AuditLog;
use crate::error::StorageError;
use crate::ids::IdSequences;
use crate::types::{IdPrefix, Material, Placement, Rack};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Full persisted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    /// Received materials, insertion order
    pub materials: Vec<Material>,
    /// Storage locations, insertion order
    pub racks: Vec<Rack>,
    /// Placements, insertion order
    pub placements: Vec<Placement>,
    /// Audit ledger
    pub audit_log: AuditLog,
    /// Id counters
    pub sequences: IdSequences,
}

impl Snapshot {
    /// Create empty snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document and reconcile its counters
    ///
    /// # Errors
    /// `Corrupt` when the document does not match the schema.
    pub fn from_json(text: &str) -> Result<Self, StorageError> {
        let mut snapshot: Self =
            serde_json::from_str(text).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        snapshot.reconcile_sequences();
        Ok(snapshot)
    }

    /// Raise every counter to the largest id suffix present
    pub fn reconcile_sequences(&mut self) {
        self.sequences
            .observe(IdPrefix::Material, self.materials.iter().map(Material::id));
        self.sequences
            .observe(IdPrefix::Rack, self.racks.iter().map(Rack::id));
        self.sequences
            .observe(IdPrefix::Placement, self.placements.iter().map(Placement::id));
        self.sequences.observe(IdPrefix::Audit, self.audit_log.ids());
    }

    /// Whether all four collections are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
            && self.racks.is_empty()
            && self.placements.is_empty()
            && self.audit_log.is_empty()
    }
}

/// Load/save port for the warehouse document
pub trait Persistence: std::fmt::Debug + Send {
    /// Read the stored document; an absent document is an empty snapshot
    ///
    /// # Errors
    /// Any failure to read or decode the document.
    fn load(&self) -> Result<Snapshot, StorageError>;

    /// Replace the stored document
    ///
    /// # Errors
    /// Any failure to encode or durably write the document.
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError>;
}

/// In-memory store holding the serialized document
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Option<String>,
    quota: Option<usize>,
    saves: usize,
}

impl MemoryStore {
    /// Create empty store without quota
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With byte quota on the serialized document
    #[inline]
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Seed with an existing document
    #[inline]
    #[must_use]
    pub fn with_document(mut self, json: impl Into<String>) -> Self {
        self.document = Some(json.into());
        self
    }

    /// Change the quota on a live store
    pub fn set_quota(&mut self, bytes: Option<usize>) {
        self.quota = bytes;
    }

    /// Last saved document
    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful saves
    #[inline]
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Result<Snapshot, StorageError> {
        match &self.document {
            Some(text) => Snapshot::from_json(text),
            None => Ok(Snapshot::default()),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let text = serde_json::to_string(snapshot)?;
        if let Some(quota) = self.quota {
            if text.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    needed: text.len(),
                    quota,
                });
            }
        }
        self.document = Some(text);
        self.saves += 1;
        Ok(())
    }
}

/// Single JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    quota: Option<usize>,
}

impl JsonFileStore {
    /// Create store for `path`; nothing is read until `load`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
        }
    }

    /// With byte quota on the serialized document
    #[inline]
    #[must_use]
    pub fn with_quota(mut self, bytes: Option<usize>) -> Self {
        self.quota = bytes;
        self
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> Result<Snapshot, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Snapshot::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No data file at {}, starting empty", self.path.display());
                Ok(Snapshot::default())
            }
            Err(e) => Err(StorageError::io_error(&self.path, e)),
        }
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(snapshot)?;
        if let Some(quota) = self.quota {
            if text.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    needed: text.len(),
                    quota,
                });
            }
        }

        let dir = self.directory();
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| StorageError::io_error(dir, e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StorageError::io_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StorageError::io_error(&self.path, e.error))?;

        tracing::debug!("Saved {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_blob_without_counters_reconciles() {
        let json = r#"{
            "materials": [],
            "racks": [{"id":"RACK004","zone":"A","row":"01","level":"01","code":"A-01-01",
                       "barcode":"A-01-01","timestamp":"2024-01-01T00:00:00Z"}],
            "placements": []
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.sequences.current(IdPrefix::Rack), 4);
        assert!(snapshot.audit_log.is_empty());
    }

    #[test]
    fn garbage_is_corrupt() {
        let err = Snapshot::from_json("{not json").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }

    #[test]
    fn memory_store_roundtrip_and_quota() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let snapshot = Snapshot::new();
        store.save(&snapshot).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap(), snapshot);

        store.set_quota(Some(4));
        let err = store.save(&snapshot).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 4, .. }));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("warehouse_data.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn file_store_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warehouse_data.json");
        let mut store = JsonFileStore::new(&path);

        store.save(&Snapshot::new()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"auditLog\""));
        assert!(text.contains("\"sequences\""));
        assert_eq!(store.load().unwrap(), Snapshot::new());
    }
}
