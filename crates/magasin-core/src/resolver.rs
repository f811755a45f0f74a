//! Scan resolution
//!
//! Maps a raw scanned or typed string to exactly one record.
//!
//! # Material tiers
//!
//! Evaluated in order; the first tier with any candidate wins:
//! 1. barcode
//! 2. record id
//! 3. part number or serial number alone
//! 4. `{PN}-{SN}` or `{SN}-{PN}`
//! 5. four or more digits against the whitespace-stripped serial number
//!
//! Input is trimmed and compared case-insensitively throughout. Several
//! candidates in one tier are settled by [`latest_first`].
//!
//! # Racks
//!
//! Exact barcode, then exact code, first match wins.
//!
//! Both resolvers are pure functions of their inputs.

use crate::error::{MagasinError, Result};
use crate::input::fold;
use crate::types::{EntityType, Material, Rack};
use std::cmp::Ordering;

/// Tier that produced a material match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    /// Full printed barcode
    Barcode,
    /// `MAT###` id
    Id,
    /// Part number or serial number alone
    PartOrSerial,
    /// `PN-SN` or `SN-PN` concatenation
    Combined,
    /// Digits-only serial number entry
    NumericSerial,
}

impl MatchTier {
    /// All tiers in evaluation order
    pub const ORDER: [MatchTier; 5] = [
        MatchTier::Barcode,
        MatchTier::Id,
        MatchTier::PartOrSerial,
        MatchTier::Combined,
        MatchTier::NumericSerial,
    ];

    fn matches(self, material: &Material, folded: &str, trimmed: &str) -> bool {
        match self {
            MatchTier::Barcode => material.barcode().to_lowercase() == folded,
            MatchTier::Id => material.id().as_str().to_lowercase() == folded,
            MatchTier::PartOrSerial => {
                material.part_number().to_lowercase() == folded
                    || material.serial_number().to_lowercase() == folded
            }
            MatchTier::Combined => {
                let pn = material.part_number().to_lowercase();
                let sn = material.serial_number().to_lowercase();
                folded == format!("{pn}-{sn}") || folded == format!("{sn}-{pn}")
            }
            MatchTier::NumericSerial => {
                let compact: String = material
                    .serial_number()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                compact == trimmed
            }
        }
    }

    fn applies_to(self, trimmed: &str) -> bool {
        match self {
            MatchTier::NumericSerial => is_long_numeric(trimmed),
            _ => true,
        }
    }
}

/// Successful material resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// Selected material
    pub material: &'a Material,
    /// Tier that matched
    pub tier: MatchTier,
    /// Candidates found in that tier before the tie-break
    pub candidates: usize,
}

impl Resolution<'_> {
    /// Whether the tie-break had to choose between several records
    #[inline]
    #[must_use]
    pub fn was_ambiguous(&self) -> bool {
        self.candidates > 1
    }
}

/// Comparator placing the most recently created material first
///
/// Used as the tie-break whenever a tier yields more than one candidate:
/// a re-registered, corrected duplicate supersedes the older record.
#[inline]
#[must_use]
pub fn latest_first(a: &Material, b: &Material) -> Ordering {
    b.timestamp().cmp(&a.timestamp())
}

/// Resolve a scan against a material snapshot
///
/// # Errors
/// `NotFound` for empty input or when no tier matches.
pub fn resolve_material<'a>(raw: &str, materials: &'a [Material]) -> Result<Resolution<'a>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MagasinError::not_found(EntityType::Material, trimmed));
    }
    let folded = fold(trimmed);

    MatchTier::ORDER
        .into_iter()
        .filter(|tier| tier.applies_to(trimmed))
        .find_map(|tier| {
            let mut candidates = materials
                .iter()
                .filter(|m| tier.matches(m, &folded, trimmed))
                .peekable();
            candidates.peek()?;

            let mut count = 0usize;
            let selected = candidates
                .inspect(|_| count += 1)
                .min_by(|a, b| latest_first(a, b))?;

            if count > 1 {
                tracing::warn!(
                    "Scan '{}' matched {} materials on {:?}; using latest {}",
                    trimmed,
                    count,
                    tier,
                    selected.id()
                );
            }
            Some(Resolution {
                material: selected,
                tier,
                candidates: count,
            })
        })
        .ok_or_else(|| MagasinError::not_found(EntityType::Material, trimmed))
}

/// Resolve a scan against the rack list
///
/// # Errors
/// `NotFound` for empty input or when neither barcode nor code matches.
pub fn resolve_rack<'a>(raw: &str, racks: &'a [Rack]) -> Result<&'a Rack> {
    let folded = fold(raw);
    if folded.is_empty() {
        return Err(MagasinError::not_found(EntityType::Rack, ""));
    }

    let by_barcode: Vec<&Rack> = racks
        .iter()
        .filter(|r| r.barcode().to_lowercase() == folded)
        .collect();
    let matches = if by_barcode.is_empty() {
        racks
            .iter()
            .filter(|r| r.code().to_lowercase() == folded)
            .collect()
    } else {
        by_barcode
    };

    if matches.len() > 1 {
        tracing::warn!(
            "Data integrity: rack scan '{}' matched {} racks; using {}",
            raw.trim(),
            matches.len(),
            matches[0].id()
        );
    }
    matches
        .first()
        .copied()
        .ok_or_else(|| MagasinError::not_found(EntityType::Rack, raw.trim()))
}

fn is_long_numeric(s: &str) -> bool {
    s.len() >= 4 && s.bytes().all(|b| b.is_ascii_digit())
}
