//! Sessions, session details, and the joined read model.
//!
//! A session is one range visit and is keyed by calendar date: there is never
//! more than one session per date. Each logging action appends a detail row
//! (one gun, one ammo lot) to the session for its date.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  catalog::{AmmoId, GunId, NewAmmo, NewGun},
};

pub type SessionId = i64;
pub type DetailId = i64;

/// What was shot at.
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
pub enum TargetType {
  Steel,
  Paper,
}

/// Time of day used when an entry does not carry one.
pub fn default_time() -> NaiveTime {
  NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN)
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::RangeStore::record_session`].
///
/// `time`, `target_type` and `duration_minutes` only take effect when this
/// entry creates the session for `date`; later entries on the same date keep
/// whatever the first one recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionEntry {
  pub date:             NaiveDate,
  pub time:             NaiveTime,
  pub target_type:      TargetType,
  pub duration_minutes: u32,
  pub gun_id:           GunId,
  pub ammo_id:          AmmoId,
  pub rounds_fired:     u32,
  pub ammo_cost_total:  f64,
}

impl NewSessionEntry {
  pub fn validate(&self) -> Result<()> {
    validate_fire(self.duration_minutes, self.rounds_fired, self.ammo_cost_total)
  }
}

fn validate_fire(duration_minutes: u32, rounds_fired: u32, cost: f64) -> Result<()> {
  if duration_minutes == 0 {
    return Err(Error::InvalidInput("duration must be at least one minute".into()));
  }
  if rounds_fired == 0 {
    return Err(Error::InvalidInput("rounds fired must be at least one".into()));
  }
  if !cost.is_finite() || cost < 0.0 {
    return Err(Error::InvalidInput(format!(
      "ammo cost must be a non-negative amount, got {cost}"
    )));
  }
  Ok(())
}

/// One complete logging action: which gun and ammo were used, and the
/// session they were used in. The catalog entries are resolved (created if
/// new) before the session detail is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
  pub date:             NaiveDate,
  #[serde(default = "default_time")]
  pub time:             NaiveTime,
  pub target_type:      TargetType,
  pub duration_minutes: u32,
  pub gun:              NewGun,
  pub ammo:             NewAmmo,
  pub rounds_fired:     u32,
  #[serde(default)]
  pub ammo_cost_total:  f64,
}

impl LogEntry {
  /// Validate everything up front so that nothing is written for a bad entry.
  pub fn normalized(self) -> Result<Self> {
    validate_fire(self.duration_minutes, self.rounds_fired, self.ammo_cost_total)?;
    Ok(Self {
      gun: self.gun.normalized()?,
      ammo: self.ammo.normalized()?,
      ..self
    })
  }

  /// The session half of the entry, once the catalog ids are known.
  pub fn session_entry(&self, gun_id: GunId, ammo_id: AmmoId) -> NewSessionEntry {
    NewSessionEntry {
      date: self.date,
      time: self.time,
      target_type: self.target_type,
      duration_minutes: self.duration_minutes,
      gun_id,
      ammo_id,
      rounds_fired: self.rounds_fired,
      ammo_cost_total: self.ammo_cost_total,
    }
  }
}

/// Identifiers produced by a [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEntry {
  pub session_id: SessionId,
  pub gun_id:     GunId,
  pub ammo_id:    AmmoId,
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// One row of the joined session/detail/gun/ammo view, one per detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRow {
  pub session_id:        SessionId,
  pub detail_id:         DetailId,
  pub date:              NaiveDate,
  pub time:              NaiveTime,
  pub target_type:       TargetType,
  pub duration_minutes:  u32,
  pub rounds_fired:      u32,
  pub ammo_cost_total:   f64,
  /// `ammo_cost_total / rounds_fired`; derived by the view, never stored.
  pub cost_per_round:    Option<f64>,
  pub gun_name:          String,
  pub gun_manufacturer:  String,
  pub ammo_manufacturer: String,
  pub ammo_type:         String,
  pub ammo_caliber:      String,
}
