//! The aggregation engine: totals, averages and distributions over the joined
//! session view.
//!
//! The input has one row per session detail, so session-level columns
//! (`date`, `duration_minutes`) repeat whenever a visit used more than one
//! gun or ammo lot. Session-level metrics are computed over distinct dates;
//! detail-level metrics over every row.
//!
//! An empty history is a normal state: sums are zero, distributions are
//! empty, and averages and name-valued metrics are `None`.

use std::collections::{BTreeMap, btree_map::Entry};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::SessionRow;

/// Total rounds per gun, the gun rankings chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GunRanking {
  pub gun_name:     String,
  pub rounds_fired: u64,
}

/// Number of range visits in the ISO week starting on `week_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCount {
  /// Always a Monday.
  pub week_start: NaiveDate,
  pub sessions:   u32,
}

/// Every metric shown on the statistics page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  /// Minutes, summed once per distinct date.
  pub total_time_at_range:         u64,
  pub total_shots_fired:           u64,
  pub most_popular_gun:            Option<String>,
  /// Minutes, mean over distinct dates rounded to the nearest integer
  /// (halves to even).
  pub average_session_duration:    Option<u64>,
  /// Mean over detail rows, rounded to one decimal place.
  pub average_rounds_per_session:  Option<f64>,
  pub total_ammo_cost:             f64,
  /// `None` when no rounds have been fired.
  pub average_cost_per_round:      Option<f64>,
  pub rounds_by_ammo_type:         BTreeMap<String, u64>,
  pub rounds_by_ammo_caliber:      BTreeMap<String, u64>,
  pub rounds_by_ammo_manufacturer: BTreeMap<String, u64>,
  pub rounds_by_gun_name:          BTreeMap<String, u64>,
  /// Keyed by the capitalized manufacturer, so `GLOCK` and `glock` merge.
  pub rounds_by_gun_manufacturer:  BTreeMap<String, u64>,
  /// Most rounds first; equal totals ordered by name.
  pub gun_rankings:                Vec<GunRanking>,
  pub weekly_sessions:             Vec<WeeklyCount>,
}

impl Dashboard {
  pub fn from_rows(rows: &[SessionRow]) -> Self {
    let durations = durations_by_date(rows);
    let visits = durations.len() as u64;
    let total_time_at_range: u64 = durations.values().map(|&m| u64::from(m)).sum();

    let total_shots_fired: u64 = rows.iter().map(|r| u64::from(r.rounds_fired)).sum();
    let total_ammo_cost: f64 = rows.iter().map(|r| r.ammo_cost_total).sum();

    let average_session_duration = (visits > 0)
      .then(|| (total_time_at_range as f64 / visits as f64).round_ties_even() as u64);

    let average_rounds_per_session = (!rows.is_empty()).then(|| {
      round_to_tenth(total_shots_fired as f64 / rows.len() as f64)
    });

    let average_cost_per_round = cost_per_round(total_ammo_cost, total_shots_fired);

    let rounds_by_gun_name = sum_rounds(rows, |r| r.gun_name.clone());

    Self {
      total_time_at_range,
      total_shots_fired,
      most_popular_gun: most_popular_gun(rows),
      average_session_duration,
      average_rounds_per_session,
      total_ammo_cost,
      average_cost_per_round,
      rounds_by_ammo_type: sum_rounds(rows, |r| r.ammo_type.clone()),
      rounds_by_ammo_caliber: sum_rounds(rows, |r| r.ammo_caliber.clone()),
      rounds_by_ammo_manufacturer: sum_rounds(rows, |r| r.ammo_manufacturer.clone()),
      rounds_by_gun_manufacturer: sum_rounds(rows, |r| capitalize(&r.gun_manufacturer)),
      gun_rankings: rank(&rounds_by_gun_name),
      rounds_by_gun_name,
      weekly_sessions: weekly_sessions(durations.keys().copied()),
    }
  }
}

/// Total cost divided by total rounds, or `None` when nothing was fired.
pub fn cost_per_round(total_cost: f64, total_rounds: u64) -> Option<f64> {
  (total_rounds > 0).then(|| total_cost / total_rounds as f64)
}

/// One duration per distinct date. Every row of a date belongs to the same
/// session, so the first one seen is as good as any.
fn durations_by_date(rows: &[SessionRow]) -> BTreeMap<NaiveDate, u32> {
  let mut out = BTreeMap::new();
  for row in rows {
    if let Entry::Vacant(slot) = out.entry(row.date) {
      slot.insert(row.duration_minutes);
    }
  }
  out
}

/// Exact halves go to the even neighbour, so 10.25 becomes 10.2.
fn round_to_tenth(value: f64) -> f64 { (value * 10.0).round_ties_even() / 10.0 }

/// The gun named on the most detail rows; ties go to the smallest name.
fn most_popular_gun(rows: &[SessionRow]) -> Option<String> {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for row in rows {
    *counts.entry(row.gun_name.as_str()).or_default() += 1;
  }
  counts
    .into_iter()
    .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
    .map(|(name, _)| name.to_owned())
}

fn sum_rounds<F>(rows: &[SessionRow], key: F) -> BTreeMap<String, u64>
where
  F: Fn(&SessionRow) -> String,
{
  let mut out = BTreeMap::new();
  for row in rows {
    *out.entry(key(row)).or_default() += u64::from(row.rounds_fired);
  }
  out
}

fn rank(by_gun: &BTreeMap<String, u64>) -> Vec<GunRanking> {
  let mut ranking: Vec<GunRanking> = by_gun
    .iter()
    .map(|(name, &rounds)| GunRanking {
      gun_name:     name.clone(),
      rounds_fired: rounds,
    })
    .collect();
  ranking.sort_by(|a, b| {
    b.rounds_fired
      .cmp(&a.rounds_fired)
      .then_with(|| a.gun_name.cmp(&b.gun_name))
  });
  ranking
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
  date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn weekly_sessions(dates: impl Iterator<Item = NaiveDate>) -> Vec<WeeklyCount> {
  let mut weeks: BTreeMap<NaiveDate, u32> = BTreeMap::new();
  for date in dates {
    *weeks.entry(week_start(date)).or_default() += 1;
  }
  weeks
    .into_iter()
    .map(|(week_start, sessions)| WeeklyCount { week_start, sessions })
    .collect()
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first
      .to_uppercase()
      .chain(chars.flat_map(char::to_lowercase))
      .collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveTime, Weekday};

  use super::*;
  use crate::session::TargetType;

  fn date(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn row(day: &str, duration: u32, gun: &str, rounds: u32, cost: f64) -> SessionRow {
    SessionRow {
      session_id:        0,
      detail_id:         0,
      date:              date(day),
      time:              NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
      target_type:       TargetType::Paper,
      duration_minutes:  duration,
      rounds_fired:      rounds,
      ammo_cost_total:   cost,
      cost_per_round:    Some(cost / f64::from(rounds)),
      gun_name:          gun.into(),
      gun_manufacturer:  gun.split(' ').next().unwrap_or_default().into(),
      ammo_manufacturer: "Federal".into(),
      ammo_type:         "FMJ".into(),
      ammo_caliber:      "9mm".into(),
    }
  }

  fn history() -> Vec<SessionRow> {
    vec![
      row("2024-01-01", 60, "Glock 19", 100, 30.00),
      row("2024-01-01", 60, "Ruger 10/22", 50, 15.00),
      row("2024-01-02", 45, "Glock 19", 75, 22.50),
    ]
  }

  #[test]
  fn totals_over_two_dates_and_three_details() {
    let d = Dashboard::from_rows(&history());
    assert_eq!(d.total_shots_fired, 225);
    assert_eq!(d.total_time_at_range, 105);
    assert!((d.total_ammo_cost - 67.50).abs() < 1e-9);
    assert!((d.average_cost_per_round.unwrap() - 0.30).abs() < 1e-9);
  }

  #[test]
  fn averages() {
    let d = Dashboard::from_rows(&history());
    // (60 + 45) / 2 = 52.5 rounds to the even neighbour.
    assert_eq!(d.average_session_duration, Some(52));
    // 225 / 3
    assert_eq!(d.average_rounds_per_session, Some(75.0));

    let d = Dashboard::from_rows(&[
      row("2024-01-01", 30, "Glock 19", 10, 0.0),
      row("2024-01-01", 30, "Glock 19", 11, 0.0),
      row("2024-01-01", 30, "Glock 19", 11, 0.0),
    ]);
    assert_eq!(d.average_rounds_per_session, Some(10.7));
  }

  #[test]
  fn exact_halves_round_to_even() {
    // 41 / 4 = 10.25
    let d = Dashboard::from_rows(&[
      row("2024-01-01", 30, "Glock 19", 10, 0.0),
      row("2024-01-01", 30, "Glock 19", 10, 0.0),
      row("2024-01-01", 30, "Glock 19", 10, 0.0),
      row("2024-01-01", 30, "Glock 19", 11, 0.0),
    ]);
    assert_eq!(d.average_rounds_per_session, Some(10.2));

    // (30 + 45) / 2 = 37.5
    let d = Dashboard::from_rows(&[
      row("2024-01-01", 30, "Glock 19", 10, 0.0),
      row("2024-01-02", 45, "Glock 19", 10, 0.0),
    ]);
    assert_eq!(d.average_session_duration, Some(38));
  }

  #[test]
  fn most_popular_gun_counts_detail_rows() {
    let d = Dashboard::from_rows(&history());
    assert_eq!(d.most_popular_gun.as_deref(), Some("Glock 19"));
  }

  #[test]
  fn most_popular_gun_tie_goes_to_smallest_name() {
    let d = Dashboard::from_rows(&[
      row("2024-01-01", 30, "Sig P365", 50, 0.0),
      row("2024-01-02", 30, "Beretta 92", 50, 0.0),
    ]);
    assert_eq!(d.most_popular_gun.as_deref(), Some("Beretta 92"));
  }

  #[test]
  fn empty_history_uses_defaults() {
    let d = Dashboard::from_rows(&[]);
    assert_eq!(d.total_time_at_range, 0);
    assert_eq!(d.total_shots_fired, 0);
    assert_eq!(d.total_ammo_cost, 0.0);
    assert!(d.most_popular_gun.is_none());
    assert!(d.average_session_duration.is_none());
    assert!(d.average_rounds_per_session.is_none());
    assert!(d.average_cost_per_round.is_none());
    assert!(d.weekly_sessions.is_empty());
    assert!(d.gun_rankings.is_empty());
  }

  #[test]
  fn cost_per_round_guards_zero_rounds() {
    assert_eq!(cost_per_round(12.0, 0), None);
    assert_eq!(cost_per_round(12.0, 48), Some(0.25));
  }

  #[test]
  fn distributions_sum_rounds() {
    let d = Dashboard::from_rows(&history());
    assert_eq!(d.rounds_by_gun_name["Glock 19"], 175);
    assert_eq!(d.rounds_by_gun_name["Ruger 10/22"], 50);
    assert_eq!(d.rounds_by_ammo_type["FMJ"], 225);
    assert_eq!(d.rounds_by_ammo_caliber["9mm"], 225);
    assert_eq!(d.rounds_by_ammo_manufacturer["Federal"], 225);
    assert_eq!(d.gun_rankings[0], GunRanking {
      gun_name:     "Glock 19".into(),
      rounds_fired: 175,
    });
  }

  #[test]
  fn manufacturer_groups_are_case_normalized() {
    let mut rows = history();
    rows[0].gun_manufacturer = "GLOCK".into();
    rows[2].gun_manufacturer = "glock".into();
    let d = Dashboard::from_rows(&rows);
    assert_eq!(d.rounds_by_gun_manufacturer.len(), 2);
    assert_eq!(d.rounds_by_gun_manufacturer["Glock"], 175);
    assert_eq!(d.rounds_by_gun_manufacturer["Ruger"], 50);
  }

  #[test]
  fn capitalize_lowers_everything_after_the_first_character() {
    assert_eq!(capitalize("smith & WESSON"), "Smith & wesson");
    assert_eq!(capitalize(""), "");
  }

  #[test]
  fn monday_and_wednesday_share_a_week() {
    // 2024-01-01 is a Monday.
    let d = Dashboard::from_rows(&[
      row("2024-01-01", 30, "Glock 19", 50, 0.0),
      row("2024-01-03", 30, "Glock 19", 50, 0.0),
      row("2024-01-03", 30, "Ruger 10/22", 50, 0.0),
      row("2024-01-08", 30, "Glock 19", 50, 0.0),
    ]);
    assert_eq!(d.weekly_sessions, vec![
      WeeklyCount { week_start: date("2024-01-01"), sessions: 2 },
      WeeklyCount { week_start: date("2024-01-08"), sessions: 1 },
    ]);
  }

  #[test]
  fn sunday_belongs_to_the_preceding_monday() {
    let start = week_start(date("2024-01-07"));
    assert_eq!(start, date("2024-01-01"));
    assert_eq!(start.weekday(), Weekday::Mon);
  }
}
