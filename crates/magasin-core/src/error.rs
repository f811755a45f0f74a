//! Error types for Magasin Core
//!
//! Provides error handling for:
//! - Scan and lookup failures
//! - Operator input validation
//! - Natural-key collisions (P/N + S/N, rack code)
//! - Persistence failures
//! - Workflow steps issued out of order

use crate::types::EntityType;
use crate::workflow::PlacementStep;
use std::path::PathBuf;

/// Main Magasin error type
#[derive(Debug, thiserror::Error)]
pub enum MagasinError {
    /// Scan or lookup matched nothing
    #[error("{entity} not found: '{key}'")]
    NotFound {
        /// Kind of record that was looked up
        entity: EntityType,
        /// Input that failed to match
        key: String,
    },

    /// Operator input rejected
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Natural key already taken
    #[error("{entity} already exists: '{key}'")]
    DuplicateEntity {
        /// Kind of record that collided
        entity: EntityType,
        /// Colliding key
        key: String,
    },

    /// Persistence write or read rejected
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    /// Workflow step issued in the wrong state
    #[error("workflow error: {0}")]
    Workflow(#[from] StateMachineError),
}

impl MagasinError {
    /// Create not-found error
    #[inline]
    pub fn not_found(entity: EntityType, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Create duplicate error
    #[inline]
    pub fn duplicate(entity: EntityType, key: impl Into<String>) -> Self {
        Self::DuplicateEntity {
            entity,
            key: key.into(),
        }
    }

    /// Whether the operator can simply retry from the current state
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !self.is_storage_failure()
    }

    /// Whether the last mutation failed to commit durably
    #[inline]
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Operator input validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field empty after sanitization
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Field shorter than the configured minimum
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// Field name
        field: &'static str,
        /// Minimum length
        min: usize,
    },

    /// Placement confirmed without an operator matricule
    #[error("magasinier matricule is required")]
    MissingMatricule,

    /// Imported document is structurally unusable
    #[error("invalid import: {0}")]
    InvalidImport(String),
}

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Serialized snapshot exceeds the storage quota
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        /// Size of the rejected document
        needed: usize,
        /// Configured quota
        quota: usize,
    },

    /// Stored document is unreadable
    #[error("corrupt storage: {0}")]
    Corrupt(String),
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Placement workflow state errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Requested step is not reachable from the current one
    #[error("illegal transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current step
        from: PlacementStep,
        /// Requested step
        to: PlacementStep,
    },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result alias for core operations
pub type Result<T, E = MagasinError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = MagasinError::not_found(EntityType::Material, "SN200");
        assert_eq!(err.to_string(), "MATERIAL not found: 'SN200'");
    }

    #[test]
    fn only_storage_is_fatal() {
        assert!(MagasinError::not_found(EntityType::Rack, "A-01-01").is_recoverable());
        assert!(MagasinError::from(ValidationError::MissingMatricule).is_recoverable());
        assert!(MagasinError::duplicate(EntityType::Material, "PN/SN").is_recoverable());

        let storage = MagasinError::from(StorageError::QuotaExceeded {
            needed: 10,
            quota: 5,
        });
        assert!(!storage.is_recoverable());
        assert!(storage.is_storage_failure());
    }

    #[test]
    fn validation_messages() {
        let err = ValidationError::TooShort {
            field: "partNumber",
            min: 3,
        };
        assert!(err.to_string().contains("at least 3"));
    }
}
