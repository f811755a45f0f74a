//! Warehouse configuration
//!
//! Loaded from TOML; every key is optional and falls back to the defaults
//! below. The CLI layers flag and environment overrides on top.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default display cap for the audit log
pub const DEFAULT_AUDIT_DISPLAY_LIMIT: usize = 50;

/// Magasin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagasinConfig {
    /// Identity recorded as `user` / `createdBy`
    pub operator: String,
    /// JSON document backing the file store
    pub data_file: PathBuf,
    /// Minimum part/serial number length
    pub min_identifier_len: usize,
    /// Type assigned when a draft has none
    pub default_material_type: String,
    /// Cap applied by `AuditLog::list_recent`
    pub audit_display_limit: usize,
    /// Optional byte quota for the serialized snapshot
    pub storage_quota_bytes: Option<usize>,
    /// Matricule used for reception and placement when none is given
    pub default_matricule: Option<String>,
}

impl MagasinConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `Parse` on malformed TOML, `Invalid` on out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file; a missing file yields the defaults
    ///
    /// # Errors
    /// `Io` when the file exists but cannot be read, plus any parse error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// With operator identity
    #[inline]
    #[must_use]
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// With data file
    #[inline]
    #[must_use]
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// With minimum identifier length
    #[inline]
    #[must_use]
    pub fn with_min_identifier_len(mut self, len: usize) -> Self {
        self.min_identifier_len = len;
        self
    }

    /// With storage quota
    #[inline]
    #[must_use]
    pub fn with_storage_quota(mut self, bytes: usize) -> Self {
        self.storage_quota_bytes = Some(bytes);
        self
    }

    /// With default matricule
    #[inline]
    #[must_use]
    pub fn with_default_matricule(mut self, matricule: impl Into<String>) -> Self {
        self.default_matricule = Some(matricule.into());
        self
    }

    /// Explicit matricule, else the configured default, else empty
    #[must_use]
    pub fn matricule_or_default<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_matricule.as_deref())
            .unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.operator.trim().is_empty() {
            return Err(ConfigError::Invalid("operator must not be empty".to_string()));
        }
        if self.audit_display_limit == 0 {
            return Err(ConfigError::Invalid(
                "audit_display_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MagasinConfig {
    fn default() -> Self {
        Self {
            operator: "Admin".to_string(),
            data_file: PathBuf::from("warehouse_data.json"),
            min_identifier_len: 3,
            default_material_type: "Electronic".to_string(),
            audit_display_limit: DEFAULT_AUDIT_DISPLAY_LIMIT,
            storage_quota_bytes: None,
            default_matricule: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MagasinConfig::new();
        assert_eq!(config.operator, "Admin");
        assert_eq!(config.min_identifier_len, 3);
        assert_eq!(config.audit_display_limit, 50);
        assert!(config.storage_quota_bytes.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = MagasinConfig::from_toml_str(
            r#"
            operator = "OP42"
            storage_quota_bytes = 5000000
            "#,
        )
        .unwrap();
        assert_eq!(config.operator, "OP42");
        assert_eq!(config.storage_quota_bytes, Some(5_000_000));
        assert_eq!(config.default_material_type, "Electronic");
    }

    #[test]
    fn rejects_zero_display_limit() {
        let err = MagasinConfig::from_toml_str("audit_display_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = MagasinConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, MagasinConfig::default());
    }

    #[test]
    fn builder() {
        let config = MagasinConfig::new()
            .with_operator("OP7")
            .with_min_identifier_len(5)
            .with_storage_quota(1024);
        assert_eq!(config.operator, "OP7");
        assert_eq!(config.min_identifier_len, 5);
        assert_eq!(config.storage_quota_bytes, Some(1024));
    }

    #[test]
    fn default_matricule_fills_missing_input() {
        let config = MagasinConfig::from_toml_str(r#"default_matricule = "OP7""#).unwrap();
        assert_eq!(config.matricule_or_default(None), "OP7");
        assert_eq!(config.matricule_or_default(Some("OP9")), "OP9");
        assert_eq!(MagasinConfig::new().matricule_or_default(None), "");
    }
}
