//! Testing utilities for Magasin workspace
//!
//! Shared test helpers and fixtures.

#![allow(missing_docs)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use magasin_core::{
    Clock, MagasinConfig, Material, MaterialDraft, MemoryStore, Persistence, Rack, RackDraft,
    RecordId, Snapshot, StorageError, Warehouse,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Deterministic clock advancing by a fixed step on every read
#[derive(Debug)]
pub struct StepClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl StepClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// Starts at [`epoch`], one second per read
    pub fn seconds() -> Arc<Self> {
        Arc::new(Self::new(epoch(), Duration::seconds(1)))
    }

    /// Frozen clock: every read returns `at`
    pub fn frozen(at: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self::new(at, Duration::zero()))
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock();
        let now = *next;
        *next = now + self.step;
        now
    }
}

/// In-memory store whose saves can be made to fail from outside
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared switch: `true` makes every following save fail
    pub fn switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.failing)
    }
}

impl Persistence for FailingStore {
    fn load(&self) -> Result<Snapshot, StorageError> {
        self.inner.load()
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded {
                needed: 1,
                quota: 0,
            });
        }
        self.inner.save(snapshot)
    }
}

/// Warehouse over a [`FailingStore`], with its failure switch
pub fn failing_warehouse() -> (Warehouse, Arc<AtomicBool>) {
    let store = FailingStore::new();
    let switch = store.switch();
    let warehouse = Warehouse::open(store, MagasinConfig::default())
        .unwrap()
        .with_clock(StepClock::seconds());
    (warehouse, switch)
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
}

pub fn at_seconds(secs: i64) -> DateTime<Utc> {
    epoch() + Duration::seconds(secs)
}

/// Material built outside a warehouse, for resolver tests
pub fn material_at(id: &str, part_number: &str, serial_number: &str, secs: i64) -> Material {
    Material::create(
        RecordId::from(id),
        &MaterialDraft::new(part_number, serial_number),
        &MagasinConfig::default(),
        "Admin",
        at_seconds(secs),
    )
    .unwrap()
}

/// Rack built outside a warehouse
pub fn rack_at(id: &str, zone: &str, row: &str, level: &str) -> Rack {
    Rack::create(
        RecordId::from(id),
        &RackDraft::new(zone, row, level),
        "Admin",
        epoch(),
    )
    .unwrap()
}

/// Empty in-memory warehouse on a stepping clock
pub fn setup_test_warehouse() -> Warehouse {
    Warehouse::open(MemoryStore::new(), MagasinConfig::default())
        .unwrap()
        .with_clock(StepClock::seconds())
}

/// Warehouse holding the given material pairs and rack triples
pub fn seeded_warehouse(materials: &[(&str, &str)], racks: &[(&str, &str, &str)]) -> Warehouse {
    let mut warehouse = setup_test_warehouse();
    for (part_number, serial_number) in materials {
        warehouse
            .register_material(&MaterialDraft::new(*part_number, *serial_number))
            .unwrap();
    }
    for (zone, row, level) in racks {
        warehouse
            .register_rack(&RackDraft::new(*zone, *row, *level))
            .unwrap();
    }
    warehouse
}

/// The `PN-100 / SN-200` material and the `A-01-01` rack
pub fn scenario_warehouse() -> Warehouse {
    seeded_warehouse(&[("PN-100", "SN-200")], &[("A", "01", "01")])
}
