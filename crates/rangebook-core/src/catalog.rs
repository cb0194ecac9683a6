//! Catalog entities: guns and ammunition lots.
//!
//! Catalog rows are created lazily the first time a logging action names
//! them and are never updated afterwards. Each has a natural composite key;
//! the store guarantees at most one row per key.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type GunId = i64;
pub type AmmoId = i64;

// ─── Vocabularies ────────────────────────────────────────────────────────────

/// Broad class of firearm.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GunCategory {
  Pistol,
  Rifle,
  Shotgun,
  Revolver,
}

/// Whether the shooter owns the gun or rented it at the range.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OwnershipType {
  Personal,
  Rental,
}

/// Parse a stored vocabulary string, reporting which vocabulary rejected it.
pub fn parse_variant<T: FromStr>(kind: &'static str, value: &str) -> Result<T> {
  value.parse().map_err(|_| Error::UnknownVariant {
    kind,
    value: value.to_owned(),
  })
}

/// Trim a key field and reject it if nothing is left.
pub(crate) fn require(field: &str, value: String) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::InvalidInput(format!("{field} must not be blank")));
  }
  Ok(trimmed.to_owned())
}

/// Blank notes are stored as NULL.
pub(crate) fn notes(value: Option<String>) -> Option<String> {
  value
    .map(|n| n.trim().to_owned())
    .filter(|n| !n.is_empty())
}

// ─── Gun ─────────────────────────────────────────────────────────────────────

/// A persisted gun.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gun {
  pub gun_id:         GunId,
  /// Display name, always `"{manufacturer} {model}"`.
  pub name:           String,
  pub category:       GunCategory,
  pub manufacturer:   String,
  pub model:          String,
  pub caliber:        String,
  pub ownership_type: OwnershipType,
  pub notes:          Option<String>,
}

impl Gun {
  /// The label used in selection lists, e.g. `Glock 19 - personal (9mm)`.
  pub fn label(&self) -> String {
    format!("{} - {} ({})", self.name, self.ownership_type, self.caliber)
  }
}

/// Input to [`crate::store::RangeStore::resolve_gun`].
///
/// Only `manufacturer`, `model` and `caliber` identify a gun. The remaining
/// fields are used when the gun is first created and ignored afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGun {
  pub category:       GunCategory,
  pub manufacturer:   String,
  pub model:          String,
  pub caliber:        String,
  pub ownership_type: OwnershipType,
  #[serde(default)]
  pub notes:          Option<String>,
}

impl NewGun {
  pub fn display_name(&self) -> String {
    format!("{} {}", self.manufacturer, self.model)
  }

  /// Trim the key fields and reject blanks.
  pub fn normalized(self) -> Result<Self> {
    Ok(Self {
      category:       self.category,
      manufacturer:   require("gun manufacturer", self.manufacturer)?,
      model:          require("gun model", self.model)?,
      caliber:        require("gun caliber", self.caliber)?,
      ownership_type: self.ownership_type,
      notes:          notes(self.notes),
    })
  }
}

// ─── Ammo ────────────────────────────────────────────────────────────────────

/// A persisted ammunition lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ammo {
  pub ammo_id:      AmmoId,
  pub manufacturer: String,
  /// Bullet type, e.g. `FMJ` or `HP`.
  #[serde(rename = "type")]
  pub ammo_type:    String,
  pub caliber:      String,
  pub notes:        Option<String>,
}

impl Ammo {
  /// The label used in selection lists, e.g. `Federal - FMJ (9mm)`.
  pub fn label(&self) -> String {
    format!("{} - {} ({})", self.manufacturer, self.ammo_type, self.caliber)
  }
}

/// Input to [`crate::store::RangeStore::resolve_ammo`]. Keyed on
/// `(manufacturer, type, caliber)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAmmo {
  pub manufacturer: String,
  #[serde(rename = "type")]
  pub ammo_type:    String,
  pub caliber:      String,
  #[serde(default)]
  pub notes:        Option<String>,
}

impl NewAmmo {
  pub fn normalized(self) -> Result<Self> {
    Ok(Self {
      manufacturer: require("ammo manufacturer", self.manufacturer)?,
      ammo_type:    require("ammo type", self.ammo_type)?,
      caliber:      require("ammo caliber", self.caliber)?,
      notes:        notes(self.notes),
    })
  }
}
