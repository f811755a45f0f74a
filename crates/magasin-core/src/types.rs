//! Core record types for Magasin
//!
//! Defines the four persisted entities:
//! - Material (a received P/N + S/N unit)
//! - Rack (a zone/row/level storage location)
//! - Placement (material stored at rack)
//! - record identifiers and entity/action tags shared with the audit log
//!
//! Records are built through constructors that sanitize input, enforce the
//! required fields and compute derived fields. `id` and `barcode` have no
//! setters.

use crate::config::MagasinConfig;
use crate::error::ValidationError;
use crate::input::sanitize;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier prefixes, one per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdPrefix {
    /// `MAT###`
    Material,
    /// `RACK###`
    Rack,
    /// `PLACE###`
    Placement,
    /// `AUDIT###`
    Audit,
}

impl IdPrefix {
    /// Literal prefix
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IdPrefix::Material => "MAT",
            IdPrefix::Rack => "RACK",
            IdPrefix::Placement => "PLACE",
            IdPrefix::Audit => "AUDIT",
        }
    }
}

/// Record identifier such as `MAT001`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Format a sequence number under a prefix, zero-padded to three digits
    #[inline]
    #[must_use]
    pub fn new(prefix: IdPrefix, sequence: u64) -> Self {
        Self(format!("{}{:03}", prefix.as_str(), sequence))
    }

    /// Numeric suffix when the id carries the given prefix
    #[must_use]
    pub fn sequence(&self, prefix: IdPrefix) -> Option<u64> {
        self.0
            .strip_prefix(prefix.as_str())
            .and_then(|digits| digits.parse().ok())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Entity kinds referenced by audit entries and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    /// Material record
    Material,
    /// Rack record
    Rack,
    /// Placement record
    Placement,
}

impl EntityType {
    /// Upper-case tag as stored in the audit log
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Material => "MATERIAL",
            EntityType::Rack => "RACK",
            EntityType::Placement => "PLACEMENT",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audited mutation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    /// Record created
    Create,
    /// Record updated
    Update,
    /// Record deleted
    Delete,
}

impl AuditAction {
    /// Upper-case tag as stored in the audit log
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-supplied reception data, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaterialDraft {
    /// Part number
    pub part_number: String,
    /// Serial number
    pub serial_number: String,
    /// Material type; configured default when absent
    #[serde(rename = "type")]
    pub material_type: Option<String>,
    /// Free text
    pub description: String,
    /// Supplier name
    pub supplier: String,
    /// Badge of the receiving operator
    pub reception_matricule: String,
    /// Reception date; creation date when absent
    pub date_received: Option<NaiveDate>,
}

impl MaterialDraft {
    /// Create draft from the natural key
    #[inline]
    #[must_use]
    pub fn new(part_number: impl Into<String>, serial_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            serial_number: serial_number.into(),
            ..Self::default()
        }
    }

    /// With material type
    #[inline]
    #[must_use]
    pub fn with_type(mut self, material_type: impl Into<String>) -> Self {
        self.material_type = Some(material_type.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With supplier
    #[inline]
    #[must_use]
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into();
        self
    }

    /// With reception matricule
    #[inline]
    #[must_use]
    pub fn with_reception_matricule(mut self, matricule: impl Into<String>) -> Self {
        self.reception_matricule = matricule.into();
        self
    }

    /// With reception date
    #[inline]
    #[must_use]
    pub fn with_date_received(mut self, date: NaiveDate) -> Self {
        self.date_received = Some(date);
        self
    }

    /// Sanitized `(part_number, serial_number)` pair after validation
    ///
    /// # Errors
    /// `MissingField` for an empty key, `TooShort` below `min_len`.
    pub fn natural_key(&self, min_len: usize) -> Result<(String, String), ValidationError> {
        let part_number = sanitize(&self.part_number);
        let serial_number = sanitize(&self.serial_number);

        if part_number.is_empty() {
            return Err(ValidationError::MissingField("partNumber"));
        }
        if serial_number.is_empty() {
            return Err(ValidationError::MissingField("serialNumber"));
        }
        if part_number.chars().count() < min_len {
            return Err(ValidationError::TooShort {
                field: "partNumber",
                min: min_len,
            });
        }
        if serial_number.chars().count() < min_len {
            return Err(ValidationError::TooShort {
                field: "serialNumber",
                min: min_len,
            });
        }
        Ok((part_number, serial_number))
    }
}

/// A received material unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    id: RecordId,
    part_number: String,
    serial_number: String,
    #[serde(rename = "type", default)]
    material_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    supplier: String,
    #[serde(default)]
    reception_matricule: String,
    date_received: NaiveDate,
    barcode: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    created_by: String,
}

impl Material {
    /// Build a material from a draft, sanitizing and validating every field
    ///
    /// # Errors
    /// Returns the first validation failure of the natural key.
    pub fn create(
        id: RecordId,
        draft: &MaterialDraft,
        config: &MagasinConfig,
        created_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let (part_number, serial_number) = draft.natural_key(config.min_identifier_len)?;

        let material_type = draft
            .material_type
            .as_deref()
            .map(sanitize)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| config.default_material_type.clone());

        let barcode = Self::barcode_for(&id, &part_number, &serial_number);

        Ok(Self {
            id,
            part_number,
            serial_number,
            material_type,
            description: sanitize(&draft.description),
            supplier: sanitize(&draft.supplier),
            reception_matricule: sanitize(&draft.reception_matricule),
            date_received: draft
                .date_received
                .unwrap_or_else(|| timestamp.date_naive()),
            barcode,
            timestamp,
            created_by: created_by.to_string(),
        })
    }

    /// Printed label value: `{id}-{partNumber}-{serialNumber}`
    #[inline]
    #[must_use]
    pub fn barcode_for(id: &RecordId, part_number: &str, serial_number: &str) -> String {
        format!("{id}-{part_number}-{serial_number}")
    }

    /// Record id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Part number
    #[inline]
    #[must_use]
    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    /// Serial number
    #[inline]
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Material type
    #[inline]
    #[must_use]
    pub fn material_type(&self) -> &str {
        &self.material_type
    }

    /// Description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Supplier
    #[inline]
    #[must_use]
    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    /// Receiving operator badge
    #[inline]
    #[must_use]
    pub fn reception_matricule(&self) -> &str {
        &self.reception_matricule
    }

    /// Reception date
    #[inline]
    #[must_use]
    pub fn date_received(&self) -> NaiveDate {
        self.date_received
    }

    /// Label value
    #[inline]
    #[must_use]
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    /// Creation time
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Creating user
    #[inline]
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Same natural key as the given pair (exact comparison)
    #[inline]
    #[must_use]
    pub fn has_natural_key(&self, part_number: &str, serial_number: &str) -> bool {
        self.part_number == part_number && self.serial_number == serial_number
    }
}

/// Operator-supplied rack data, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RackDraft {
    /// Zone letter or name
    pub zone: String,
    /// Row within the zone
    pub row: String,
    /// Shelf level
    pub level: String,
    /// Free text
    pub description: String,
}

impl RackDraft {
    /// Create draft from the location triple
    #[inline]
    #[must_use]
    pub fn new(zone: impl Into<String>, row: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            row: row.into(),
            level: level.into(),
            description: String::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sanitized `(zone, row, level, code)` after validation
    ///
    /// # Errors
    /// `MissingField` when any part of the location is empty.
    pub fn location(&self) -> Result<(String, String, String, String), ValidationError> {
        let zone = sanitize(&self.zone);
        let row = sanitize(&self.row);
        let level = sanitize(&self.level);

        if zone.is_empty() {
            return Err(ValidationError::MissingField("zone"));
        }
        if row.is_empty() {
            return Err(ValidationError::MissingField("row"));
        }
        if level.is_empty() {
            return Err(ValidationError::MissingField("level"));
        }
        let code = Rack::code_for(&zone, &row, &level);
        Ok((zone, row, level, code))
    }
}

/// A storage location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    id: RecordId,
    zone: String,
    row: String,
    level: String,
    code: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    capacity_note: String,
    barcode: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    created_by: String,
}

impl Rack {
    /// Build a rack from a draft
    ///
    /// # Errors
    /// `MissingField` when the location is incomplete.
    pub fn create(
        id: RecordId,
        draft: &RackDraft,
        created_by: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let (zone, row, level, code) = draft.location()?;
        Ok(Self {
            id,
            zone,
            row,
            level,
            barcode: code.clone(),
            code,
            description: sanitize(&draft.description),
            capacity_note: String::new(),
            timestamp,
            created_by: created_by.to_string(),
        })
    }

    /// Location code: `{zone}-{row}-{level}`
    #[inline]
    #[must_use]
    pub fn code_for(zone: &str, row: &str, level: &str) -> String {
        format!("{zone}-{row}-{level}")
    }

    /// Record id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Zone
    #[inline]
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Row
    #[inline]
    #[must_use]
    pub fn row(&self) -> &str {
        &self.row
    }

    /// Level
    #[inline]
    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Location code
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Capacity note
    #[inline]
    #[must_use]
    pub fn capacity_note(&self) -> &str {
        &self.capacity_note
    }

    /// Label value (equal to the code)
    #[inline]
    #[must_use]
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    /// Creation time
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Creating user
    #[inline]
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub(crate) fn set_capacity_note(&mut self, note: String) {
        self.capacity_note = note;
    }
}

/// Material stored at a rack
///
/// `material_id` and `rack_id` are soft references: they point at records
/// that existed when the placement was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    id: RecordId,
    material_id: RecordId,
    rack_id: RecordId,
    material_barcode: String,
    rack_barcode: String,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    user: String,
    #[serde(default)]
    magasinier_matricule: String,
    #[serde(default)]
    created_by: String,
}

impl Placement {
    /// Link a material to a rack, copying both barcodes
    #[must_use]
    pub fn create(
        id: RecordId,
        material: &Material,
        rack: &Rack,
        matricule: String,
        user: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            material_id: material.id().clone(),
            rack_id: rack.id().clone(),
            material_barcode: material.barcode().to_string(),
            rack_barcode: rack.barcode().to_string(),
            timestamp,
            user: user.to_string(),
            magasinier_matricule: matricule,
            created_by: user.to_string(),
        }
    }

    /// Record id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Placed material
    #[inline]
    #[must_use]
    pub fn material_id(&self) -> &RecordId {
        &self.material_id
    }

    /// Target rack
    #[inline]
    #[must_use]
    pub fn rack_id(&self) -> &RecordId {
        &self.rack_id
    }

    /// Material barcode at placement time
    #[inline]
    #[must_use]
    pub fn material_barcode(&self) -> &str {
        &self.material_barcode
    }

    /// Rack barcode at placement time
    #[inline]
    #[must_use]
    pub fn rack_barcode(&self) -> &str {
        &self.rack_barcode
    }

    /// Commit time
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Session user
    #[inline]
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Badge of the operator who confirmed
    #[inline]
    #[must_use]
    pub fn magasinier_matricule(&self) -> &str {
        &self.magasinier_matricule
    }

    /// Creating user
    #[inline]
    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn record_id_formatting() {
        assert_eq!(RecordId::new(IdPrefix::Material, 1).as_str(), "MAT001");
        assert_eq!(RecordId::new(IdPrefix::Placement, 42).as_str(), "PLACE042");
        assert_eq!(RecordId::new(IdPrefix::Audit, 1234).as_str(), "AUDIT1234");
    }

    #[test]
    fn record_id_sequence() {
        let id = RecordId::from("RACK017");
        assert_eq!(id.sequence(IdPrefix::Rack), Some(17));
        assert_eq!(id.sequence(IdPrefix::Material), None);
        assert_eq!(RecordId::from("RACKxyz").sequence(IdPrefix::Rack), None);
    }

    #[test]
    fn material_derives_barcode_and_defaults() {
        let config = MagasinConfig::default();
        let draft = MaterialDraft::new("  PN-100 ", "SN-200").with_supplier("<b>Safran</b>");
        let material =
            Material::create(RecordId::from("MAT001"), &draft, &config, "Admin", ts()).unwrap();

        assert_eq!(material.barcode(), "MAT001-PN-100-SN-200");
        assert_eq!(material.material_type(), "Electronic");
        assert_eq!(material.supplier(), "Safran");
        assert_eq!(material.date_received(), ts().date_naive());
    }

    #[test]
    fn material_rejects_short_keys() {
        let config = MagasinConfig::default();
        let err = Material::create(
            RecordId::from("MAT001"),
            &MaterialDraft::new("PN", "SN-200"),
            &config,
            "Admin",
            ts(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooShort {
                field: "partNumber",
                min: 3
            }
        );
    }

    #[test]
    fn material_rejects_empty_serial() {
        let config = MagasinConfig::default();
        let draft = MaterialDraft::new("PN-100", "<script>x</script>");
        let err = Material::create(RecordId::from("MAT001"), &draft, &config, "Admin", ts())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("serialNumber"));
    }

    #[test]
    fn rack_code_is_barcode() {
        let rack = Rack::create(
            RecordId::from("RACK001"),
            &RackDraft::new("A", "01", "01"),
            "Admin",
            ts(),
        )
        .unwrap();
        assert_eq!(rack.code(), "A-01-01");
        assert_eq!(rack.barcode(), rack.code());
    }

    #[test]
    fn rack_requires_level() {
        let err = Rack::create(
            RecordId::from("RACK001"),
            &RackDraft::new("A", "01", " "),
            "Admin",
            ts(),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("level"));
    }

    #[test]
    fn material_json_uses_stored_keys() {
        let config = MagasinConfig::default();
        let material = Material::create(
            RecordId::from("MAT001"),
            &MaterialDraft::new("PN-100", "SN-200").with_type("Mechanical"),
            &config,
            "Admin",
            ts(),
        )
        .unwrap();
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["partNumber"], "PN-100");
        assert_eq!(json["type"], "Mechanical");
        assert_eq!(json["dateReceived"], "2024-03-01");
    }
}
