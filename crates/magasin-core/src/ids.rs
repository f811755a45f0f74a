//! Per-collection id sequences
//!
//! Each collection owns a monotonic counter persisted alongside the data.
//! Ids are never reused, even after the newest record is undone.
//!
//! Counters are only safe under a single writer. A multi-writer deployment
//! needs a real sequence or UUIDs instead.

use crate::error::StorageError;
use crate::types::{IdPrefix, RecordId};
use serde::{Deserialize, Serialize};

/// Last issued sequence number per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdSequences {
    material: u64,
    rack: u64,
    placement: u64,
    audit: u64,
}

impl IdSequences {
    /// Issue the next id for a collection
    ///
    /// # Errors
    /// `Corrupt` when the counter cannot advance; a loaded document carrying
    /// `u64::MAX` would otherwise wrap around and reissue ids.
    pub fn next(&mut self, prefix: IdPrefix) -> Result<RecordId, StorageError> {
        let counter = self.counter_mut(prefix);
        let issued = counter.checked_add(1).ok_or_else(|| {
            StorageError::Corrupt(format!("{} id sequence exhausted", prefix.as_str()))
        })?;
        *counter = issued;
        Ok(RecordId::new(prefix, issued))
    }

    /// Last issued sequence number
    #[inline]
    #[must_use]
    pub fn current(&self, prefix: IdPrefix) -> u64 {
        match prefix {
            IdPrefix::Material => self.material,
            IdPrefix::Rack => self.rack,
            IdPrefix::Placement => self.placement,
            IdPrefix::Audit => self.audit,
        }
    }

    /// Raise a counter to at least the largest suffix among `ids`
    ///
    /// Documents written before counters were persisted carry none, so the
    /// counter is rebuilt from the ids actually present.
    pub fn observe<'a>(&mut self, prefix: IdPrefix, ids: impl IntoIterator<Item = &'a RecordId>) {
        let max = ids
            .into_iter()
            .filter_map(|id| id.sequence(prefix))
            .max()
            .unwrap_or(0);
        let counter = self.counter_mut(prefix);
        if max > *counter {
            *counter = max;
        }
    }

    fn counter_mut(&mut self, prefix: IdPrefix) -> &mut u64 {
        match prefix {
            IdPrefix::Material => &mut self.material,
            IdPrefix::Rack => &mut self.rack,
            IdPrefix::Placement => &mut self.placement,
            IdPrefix::Audit => &mut self.audit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_are_independent() {
        let mut seq = IdSequences::default();
        assert_eq!(seq.next(IdPrefix::Material).unwrap().as_str(), "MAT001");
        assert_eq!(seq.next(IdPrefix::Material).unwrap().as_str(), "MAT002");
        assert_eq!(seq.next(IdPrefix::Rack).unwrap().as_str(), "RACK001");
        assert_eq!(seq.current(IdPrefix::Placement), 0);
    }

    #[test]
    fn observe_raises_but_never_lowers() {
        let mut seq = IdSequences::default();
        let ids = [RecordId::from("PLACE007"), RecordId::from("PLACE003")];
        seq.observe(IdPrefix::Placement, &ids);
        assert_eq!(seq.current(IdPrefix::Placement), 7);

        seq.observe(IdPrefix::Placement, &[RecordId::from("PLACE001")]);
        assert_eq!(seq.next(IdPrefix::Placement).unwrap().as_str(), "PLACE008");
    }

    #[test]
    fn observe_ignores_foreign_ids() {
        let mut seq = IdSequences::default();
        seq.observe(IdPrefix::Rack, &[RecordId::from("MAT900"), RecordId::from("legacy")]);
        assert_eq!(seq.current(IdPrefix::Rack), 0);
    }

    #[test]
    fn width_grows_past_999() {
        let mut seq = IdSequences::default();
        seq.observe(IdPrefix::Audit, &[RecordId::from("AUDIT999")]);
        assert_eq!(seq.next(IdPrefix::Audit).unwrap().as_str(), "AUDIT1000");
    }

    #[test]
    fn exhausted_counter_is_an_error() {
        let mut seq = IdSequences::default();
        seq.observe(IdPrefix::Material, &[RecordId::from("MAT18446744073709551615")]);
        assert!(matches!(
            seq.next(IdPrefix::Material),
            Err(StorageError::Corrupt(_))
        ));
        assert_eq!(seq.current(IdPrefix::Material), u64::MAX);
    }
}
