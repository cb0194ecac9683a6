//! Conversions between domain types and the plain values stored in SQLite.
//!
//! Dates and times are stored as `YYYY-MM-DD` / `HH:MM:SS` text, so ordering
//! by the raw column is chronological. Vocabulary enums are stored as their
//! lowercase names.

use chrono::{NaiveDate, NaiveTime};
use rangebook_core::{
  catalog::{Ammo, Gun, GunCategory, OwnershipType, parse_variant},
  session::{SessionRow, TargetType},
};

use crate::{
  Result,
  adapter::{DATE_FORMAT, Row, TIME_FORMAT},
};

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn encode_time(time: NaiveTime) -> String { time.format(TIME_FORMAT).to_string() }

pub fn gun_from_row(row: &Row) -> Result<Gun> {
  Ok(Gun {
    gun_id:         row.int("gun_id")?,
    name:           row.text("name")?,
    category:       parse_variant::<GunCategory>("gun category", &row.text("category")?)?,
    manufacturer:   row.text("manufacturer")?,
    model:          row.text("model")?,
    caliber:        row.text("caliber")?,
    ownership_type: parse_variant::<OwnershipType>(
      "ownership type",
      &row.text("ownership_type")?,
    )?,
    notes:          row.opt_text("gun_notes")?,
  })
}

pub fn ammo_from_row(row: &Row) -> Result<Ammo> {
  Ok(Ammo {
    ammo_id:      row.int("ammo_id")?,
    manufacturer: row.text("manufacturer")?,
    ammo_type:    row.text("type")?,
    caliber:      row.text("caliber")?,
    notes:        row.opt_text("ammo_notes")?,
  })
}

pub fn session_row_from_row(row: &Row) -> Result<SessionRow> {
  Ok(SessionRow {
    session_id:        row.int("session_id")?,
    detail_id:         row.int("detail_id")?,
    date:              row.date("date")?,
    time:              row.time("time")?,
    target_type:       parse_variant::<TargetType>("target type", &row.text("target_type")?)?,
    duration_minutes:  row.count("duration_minutes")?,
    rounds_fired:      row.count("rounds_fired")?,
    ammo_cost_total:   row.float("ammo_cost_total")?,
    cost_per_round:    row.opt_float("cost_per_round")?,
    gun_name:          row.text("gun_name")?,
    gun_manufacturer:  row.text("gun_manufacturer")?,
    ammo_manufacturer: row.text("ammo_manufacturer")?,
    ammo_type:         row.text("ammo_type")?,
    ammo_caliber:      row.text("ammo_caliber")?,
  })
}
