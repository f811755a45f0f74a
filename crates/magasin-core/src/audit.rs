//! Append-only audit ledger
//!
//! Every create, update and delete in the warehouse appends exactly one entry.
//! Entries are never edited; the only way to remove them is a full data clear.

use crate::types::{AuditAction, EntityType, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form key/value payload attached to an entry
pub type AuditDetails = BTreeMap<String, serde_json::Value>;

/// One ledger line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// `AUDIT###`
    pub id: RecordId,
    /// Append time
    pub timestamp: DateTime<Utc>,
    /// Session user
    pub user: String,
    /// Mutation kind
    pub action: AuditAction,
    /// Kind of record touched
    pub entity_type: EntityType,
    /// Record touched
    pub entity_id: RecordId,
    /// Mutation-specific payload
    #[serde(default)]
    pub details: AuditDetails,
}

/// Mutation description, before it is stamped with id, time and user
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    action: AuditAction,
    entity_type: EntityType,
    entity_id: RecordId,
    details: AuditDetails,
}

impl AuditEvent {
    /// Create event
    #[inline]
    #[must_use]
    pub fn new(action: AuditAction, entity_type: EntityType, entity_id: RecordId) -> Self {
        Self {
            action,
            entity_type,
            entity_id,
            details: AuditDetails::new(),
        }
    }

    /// CREATE event
    #[inline]
    #[must_use]
    pub fn created(entity_type: EntityType, entity_id: RecordId) -> Self {
        Self::new(AuditAction::Create, entity_type, entity_id)
    }

    /// UPDATE event
    #[inline]
    #[must_use]
    pub fn updated(entity_type: EntityType, entity_id: RecordId) -> Self {
        Self::new(AuditAction::Update, entity_type, entity_id)
    }

    /// DELETE event
    #[inline]
    #[must_use]
    pub fn deleted(entity_type: EntityType, entity_id: RecordId) -> Self {
        Self::new(AuditAction::Delete, entity_type, entity_id)
    }

    /// Attach a detail
    #[inline]
    #[must_use]
    pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Ordered audit entries, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event stamped with `id`, `timestamp` and `user`
    pub fn record(
        &mut self,
        id: RecordId,
        timestamp: DateTime<Utc>,
        user: &str,
        event: AuditEvent,
    ) -> &AuditEntry {
        tracing::debug!(
            "Audit {} {} {} as {}",
            event.action,
            event.entity_type,
            event.entity_id,
            id
        );
        let index = self.entries.len();
        self.entries.push(AuditEntry {
            id,
            timestamp,
            user: user.to_string(),
            action: event.action,
            entity_type: event.entity_type,
            entity_id: event.entity_id,
            details: event.details,
        });
        &self.entries[index]
    }

    /// Up to `limit` entries, newest timestamp first
    ///
    /// Entries sharing a timestamp are returned most recently appended first.
    #[must_use]
    pub fn list_recent(&self, limit: usize) -> Vec<&AuditEntry> {
        let mut ordered: Vec<(usize, &AuditEntry)> = self.entries.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
        ordered.into_iter().take(limit).map(|(_, e)| e).collect()
    }

    /// Entries about one record, oldest first
    pub fn for_entity<'a>(
        &'a self,
        entity_type: EntityType,
        entity_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a AuditEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.entity_type == entity_type && &e.entity_id == entity_id)
    }

    /// All entries, oldest first
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Most recently appended entry
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&AuditEntry> {
        self.entries.last()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids present in the log
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.entries.iter().map(|e| &e.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn record_appends_with_details() {
        let mut log = AuditLog::new();
        let entry = log.record(
            RecordId::from("AUDIT001"),
            t0(),
            "Admin",
            AuditEvent::created(EntityType::Placement, RecordId::from("PLACE001"))
                .detail("magasinierMatricule", "OP42"),
        );
        assert_eq!(entry.action, AuditAction::Create);
        assert_eq!(entry.details["magasinierMatricule"], "OP42");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn list_recent_orders_and_caps() {
        let mut log = AuditLog::new();
        for i in 0..60 {
            log.record(
                RecordId::new(crate::types::IdPrefix::Audit, i + 1),
                t0() + Duration::seconds(i64::try_from(i).unwrap()),
                "Admin",
                AuditEvent::created(EntityType::Material, RecordId::from("MAT001")),
            );
        }
        let recent = log.list_recent(50);
        assert_eq!(recent.len(), 50);
        assert_eq!(recent[0].id.as_str(), "AUDIT060");
        assert_eq!(recent[49].id.as_str(), "AUDIT011");
    }

    #[test]
    fn list_recent_ties_prefer_latest_append() {
        let mut log = AuditLog::new();
        log.record(
            RecordId::from("AUDIT001"),
            t0(),
            "Admin",
            AuditEvent::created(EntityType::Rack, RecordId::from("RACK001")),
        );
        log.record(
            RecordId::from("AUDIT002"),
            t0(),
            "Admin",
            AuditEvent::updated(EntityType::Rack, RecordId::from("RACK001")),
        );
        let recent = log.list_recent(10);
        assert_eq!(recent[0].id.as_str(), "AUDIT002");
    }

    #[test]
    fn for_entity_filters() {
        let mut log = AuditLog::new();
        let place = RecordId::from("PLACE001");
        log.record(
            RecordId::from("AUDIT001"),
            t0(),
            "Admin",
            AuditEvent::created(EntityType::Placement, place.clone()),
        );
        log.record(
            RecordId::from("AUDIT002"),
            t0(),
            "Admin",
            AuditEvent::created(EntityType::Material, RecordId::from("MAT001")),
        );
        log.record(
            RecordId::from("AUDIT003"),
            t0(),
            "Admin",
            AuditEvent::deleted(EntityType::Placement, place.clone()),
        );
        let actions: Vec<_> = log
            .for_entity(EntityType::Placement, &place)
            .map(|e| e.action)
            .collect();
        assert_eq!(actions, vec![AuditAction::Create, AuditAction::Delete]);
    }

    #[test]
    fn legacy_entry_without_details_loads() {
        let json = r#"[{"id":"AUDIT001","timestamp":"2024-05-01T12:00:00Z","user":"Admin",
            "action":"DELETE","entityType":"PLACEMENT","entityId":"PLACE001"}]"#;
        let log: AuditLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.entries()[0].action, AuditAction::Delete);
        assert!(log.entries()[0].details.is_empty());
    }
}
