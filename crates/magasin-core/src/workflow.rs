//! Placement workflow state machine
//!
//! `AwaitingMaterial -> AwaitingRack -> AwaitingConfirmation -> Committed`,
//! with `Committed` falling straight back to `AwaitingMaterial` once the
//! placement is saved. `reset` returns to `AwaitingMaterial` from anywhere.
//!
//! A failed scan or confirmation leaves the step and the selected records
//! as they were. A step issued out of order is rejected with
//! [`StateMachineError::IllegalTransition`].

use crate::error::{MagasinError, Result, StateMachineError, ValidationError};
use crate::types::{Material, Placement, Rack};
use crate::warehouse::Warehouse;
use std::fmt;

/// Workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementStep {
    /// Waiting for a material scan
    AwaitingMaterial,
    /// Material selected, waiting for a rack scan
    AwaitingRack,
    /// Both selected, waiting for the operator matricule
    AwaitingConfirmation,
    /// Placement saved
    Committed,
}

/// Validates a step transition
pub fn validate_transition(from: PlacementStep, to: PlacementStep) -> Result<(), StateMachineError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(StateMachineError::IllegalTransition { from, to })
    }
}

/// Steps reachable from `from`
pub fn allowed_transitions(from: PlacementStep) -> Vec<PlacementStep> {
    use PlacementStep::*;
    match from {
        AwaitingMaterial => vec![AwaitingRack, AwaitingMaterial],
        AwaitingRack => vec![AwaitingConfirmation, AwaitingMaterial],
        AwaitingConfirmation => vec![Committed, AwaitingMaterial],
        Committed => vec![AwaitingMaterial],
    }
}

/// What the operator is about to confirm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationSummary {
    /// Material id
    pub material_id: String,
    /// Part number
    pub part_number: String,
    /// Serial number
    pub serial_number: String,
    /// Material barcode
    pub material_barcode: String,
    /// Rack code
    pub rack_code: String,
    /// Rack barcode
    pub rack_barcode: String,
}

impl fmt::Display for ConfirmationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (P/N {}, S/N {}) -> rack {}",
            self.material_id, self.part_number, self.serial_number, self.rack_code
        )
    }
}

/// One operator's placement session
#[derive(Debug, Clone)]
pub struct PlacementWorkflow {
    step: PlacementStep,
    material: Option<Material>,
    rack: Option<Rack>,
}

impl Default for PlacementWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementWorkflow {
    /// Start at `AwaitingMaterial`
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: PlacementStep::AwaitingMaterial,
            material: None,
            rack: None,
        }
    }

    /// Current step
    #[inline]
    #[must_use]
    pub fn step(&self) -> PlacementStep {
        self.step
    }

    /// Selected material
    #[inline]
    #[must_use]
    pub fn selected_material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Selected rack
    #[inline]
    #[must_use]
    pub fn selected_rack(&self) -> Option<&Rack> {
        self.rack.as_ref()
    }

    /// Summary shown before confirmation; `None` outside `AwaitingConfirmation`
    #[must_use]
    pub fn summary(&self) -> Option<ConfirmationSummary> {
        if self.step != PlacementStep::AwaitingConfirmation {
            return None;
        }
        let material = self.material.as_ref()?;
        let rack = self.rack.as_ref()?;
        Some(ConfirmationSummary {
            material_id: material.id().to_string(),
            part_number: material.part_number().to_string(),
            serial_number: material.serial_number().to_string(),
            material_barcode: material.barcode().to_string(),
            rack_code: rack.code().to_string(),
            rack_barcode: rack.barcode().to_string(),
        })
    }

    /// Resolve and select the material
    ///
    /// # Errors
    /// `Workflow` outside `AwaitingMaterial`, `NotFound` when the scan
    /// matches nothing.
    pub fn scan_material(&mut self, warehouse: &Warehouse, scan: &str) -> Result<&Material> {
        validate_transition(self.step, PlacementStep::AwaitingRack)?;
        let resolution = warehouse.resolve_material(scan)?;
        tracing::debug!(
            "Material {} selected via {:?}",
            resolution.material.id(),
            resolution.tier
        );

        self.step = PlacementStep::AwaitingRack;
        Ok(&*self.material.insert(resolution.material.clone()))
    }

    /// Resolve and select the rack
    ///
    /// # Errors
    /// `Workflow` outside `AwaitingRack`, `NotFound` when neither barcode
    /// nor code matches.
    pub fn scan_rack(&mut self, warehouse: &Warehouse, scan: &str) -> Result<&Rack> {
        validate_transition(self.step, PlacementStep::AwaitingConfirmation)?;
        let rack = warehouse.find_rack(scan)?;
        tracing::debug!("Rack {} selected", rack.code());

        self.step = PlacementStep::AwaitingConfirmation;
        Ok(&*self.rack.insert(rack.clone()))
    }

    /// Commit the placement under `matricule`, then reset
    ///
    /// # Errors
    /// - `Workflow` outside `AwaitingConfirmation`
    /// - `ValidationFailed` on an empty matricule
    /// - `NotFound` when a selected record vanished in the meantime
    /// - `Storage` when the save fails
    ///
    /// Every error leaves the workflow in `AwaitingConfirmation` with its
    /// selection intact.
    pub fn confirm(&mut self, warehouse: &mut Warehouse, matricule: &str) -> Result<Placement> {
        validate_transition(self.step, PlacementStep::Committed)?;
        if matricule.trim().is_empty() {
            return Err(ValidationError::MissingMatricule.into());
        }
        let (Some(material), Some(rack)) = (&self.material, &self.rack) else {
            return Err(MagasinError::from(StateMachineError::IllegalTransition {
                from: self.step,
                to: PlacementStep::Committed,
            }));
        };

        let placement = warehouse.record_placement(material.id(), rack.id(), matricule)?;
        self.step = PlacementStep::Committed;
        self.reset();
        Ok(placement)
    }

    /// Drop the selection and return to `AwaitingMaterial`
    pub fn reset(&mut self) {
        if self.step != PlacementStep::AwaitingMaterial {
            tracing::debug!("Workflow reset from {:?}", self.step);
        }
        self.step = PlacementStep::AwaitingMaterial;
        self.material = None;
        self.rack = None;
    }
}
