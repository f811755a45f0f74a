//! Magasin Core - warehouse inventory engine
//!
//! Tracks received materials, rack locations and material-to-rack
//! placements:
//! - Resolves raw scanner input to a single material (tiered matching)
//! - Drives the scan material / scan rack / confirm placement workflow
//! - Records every mutation in an append-only audit log
//! - Persists the whole document through a pluggable [`Persistence`] port
//!
//! # Example
//!
//! ```rust
//! use magasin_core::prelude::*;
//!
//! # fn main() -> magasin_core::Result<()> {
//! let mut warehouse = Warehouse::open(MemoryStore::new(), MagasinConfig::new())?;
//! warehouse.register_material(&MaterialDraft::new("PN-100", "SN-200"))?;
//! warehouse.register_rack(&RackDraft::new("A", "01", "01"))?;
//!
//! let mut workflow = PlacementWorkflow::new();
//! workflow.scan_material(&warehouse, "pn-100-sn-200")?;
//! workflow.scan_rack(&warehouse, "A-01-01")?;
//! let placement = workflow.confirm(&mut warehouse, "OP42")?;
//!
//! assert_eq!(placement.id().as_str(), "PLACE001");
//! assert_eq!(workflow.step(), PlacementStep::AwaitingMaterial);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod audit;
pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod input;
pub mod reception;
pub mod resolver;
pub mod store;
pub mod types;
pub mod warehouse;
pub mod workflow;

pub use audit::{AuditDetails, AuditEntry, AuditEvent, AuditLog};
pub use clock::{Clock, SystemClock};
pub use config::MagasinConfig;
pub use error::{
    ConfigError, MagasinError, Result, StateMachineError, StorageError, ValidationError,
};
pub use ids::IdSequences;
pub use reception::{BulkReport, ReceptionBatch};
pub use resolver::{latest_first, resolve_material, resolve_rack, MatchTier, Resolution};
pub use store::{JsonFileStore, MemoryStore, Persistence, Snapshot};
pub use types::{
    AuditAction, EntityType, IdPrefix, Material, MaterialDraft, Placement, Rack, RackDraft,
    RecordId,
};
pub use warehouse::{UndoOutcome, Warehouse, WarehouseStats};
pub use workflow::{ConfirmationSummary, PlacementStep, PlacementWorkflow};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Magasin Core
    pub use crate::{
        MagasinConfig, MagasinError, Material, MaterialDraft, MemoryStore, Persistence,
        Placement, PlacementStep, PlacementWorkflow, Rack, RackDraft, UndoOutcome, Warehouse,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
