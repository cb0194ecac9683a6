//! Scoped connections and the generic query surface the store is built on.
//!
//! Rows come back as ordered column → value mappings. SQLite hands back
//! whatever storage class a value ended up in (a `NUMERIC` column holds
//! `30.00` as the integer `30` and `22.50` as a real), so every read goes
//! through the coercing accessors on [`Row`] rather than assuming a type.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Value;
use serde::Deserialize;

use crate::{Error, Result};

/// Settings read once at startup; each operation connects from these.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Path of the SQLite database file. Created if missing.
  pub path: PathBuf,
}

impl StoreConfig {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

/// Per-connection settings. SQLite does not persist these in the file.
///
/// Writers take the lock with `BEGIN IMMEDIATE`; a second writer waits up
/// to the busy timeout for it instead of failing with `SQLITE_BUSY`.
const CONNECTION_PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Open a fresh connection. The caller owns it for exactly one operation.
pub async fn connect(config: &StoreConfig) -> Result<tokio_rusqlite::Connection> {
  let conn = tokio_rusqlite::Connection::open(config.path())
    .await
    .map_err(|source| Error::Connection {
      path: config.path.clone(),
      source,
    })?;

  conn
    .call(|conn| {
      conn.execute_batch(CONNECTION_PRAGMAS)?;
      Ok(())
    })
    .await?;

  Ok(conn)
}

/// Run a statement that returns no rows.
pub fn execute(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<()> {
  conn.execute(sql, params)?;
  Ok(())
}

/// Run a query and collect every row with its column names.
pub fn fetch_all(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Row>> {
  let mut stmt = conn.prepare(sql)?;
  let names: Vec<String> = stmt
    .column_names()
    .into_iter()
    .map(str::to_owned)
    .collect();
  let width = names.len();

  let values = stmt
    .query_map(params, |row| {
      (0..width)
        .map(|i| row.get::<_, Value>(i))
        .collect::<rusqlite::Result<Vec<_>>>()
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(
    values
      .into_iter()
      .map(|values| Row {
        columns: names.iter().cloned().zip(values).collect(),
      })
      .collect(),
  )
}

/// The rowid assigned by the most recent successful `INSERT`.
pub fn last_insert_id(conn: &rusqlite::Connection) -> i64 {
  conn.last_insert_rowid()
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// One result row, in select-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
  columns: Vec<(String, Value)>,
}

impl Row {
  pub fn get(&self, column: &str) -> Option<&Value> {
    self
      .columns
      .iter()
      .find(|(name, _)| name == column)
      .map(|(_, value)| value)
  }

  fn value(&self, column: &str, expected: &'static str) -> Result<&Value> {
    self
      .get(column)
      .ok_or_else(|| mismatch(column, expected, "no such column".to_owned()))
  }

  /// An integer, accepting reals and decimal text with no fractional part.
  pub fn int(&self, column: &str) -> Result<i64> {
    const EXPECTED: &str = "an integer";
    match self.value(column, EXPECTED)? {
      Value::Integer(i) => Ok(*i),
      Value::Real(f) => integral(*f).ok_or_else(|| mismatch(column, EXPECTED, f.to_string())),
      Value::Text(s) => s
        .trim()
        .parse::<i64>()
        .ok()
        .or_else(|| s.trim().parse::<f64>().ok().and_then(integral))
        .ok_or_else(|| mismatch(column, EXPECTED, format!("{s:?}"))),
      other => Err(mismatch(column, EXPECTED, describe(other))),
    }
  }

  /// A non-negative integer that fits in `u32`.
  pub fn count(&self, column: &str) -> Result<u32> {
    let value = self.int(column)?;
    u32::try_from(value)
      .map_err(|_| mismatch(column, "a non-negative 32-bit count", value.to_string()))
  }

  /// A float, accepting integers and decimal text.
  pub fn float(&self, column: &str) -> Result<f64> {
    self
      .opt_float(column)?
      .ok_or_else(|| mismatch(column, "a number", "NULL".to_owned()))
  }

  /// Like [`Row::float`], with SQL `NULL` as `None`.
  pub fn opt_float(&self, column: &str) -> Result<Option<f64>> {
    const EXPECTED: &str = "a number";
    match self.value(column, EXPECTED)? {
      Value::Null => Ok(None),
      Value::Integer(i) => Ok(Some(*i as f64)),
      Value::Real(f) => Ok(Some(*f)),
      Value::Text(s) => s
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| mismatch(column, EXPECTED, format!("{s:?}"))),
      other @ Value::Blob(_) => Err(mismatch(column, EXPECTED, describe(other))),
    }
  }

  pub fn text(&self, column: &str) -> Result<String> {
    self
      .opt_text(column)?
      .ok_or_else(|| mismatch(column, "text", "NULL".to_owned()))
  }

  pub fn opt_text(&self, column: &str) -> Result<Option<String>> {
    match self.value(column, "text")? {
      Value::Null => Ok(None),
      Value::Text(s) => Ok(Some(s.clone())),
      other => Err(mismatch(column, "text", describe(other))),
    }
  }

  pub fn date(&self, column: &str) -> Result<NaiveDate> {
    let raw = self.text(column)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
      .map_err(|_| mismatch(column, "a YYYY-MM-DD date", format!("{raw:?}")))
  }

  pub fn time(&self, column: &str) -> Result<NaiveTime> {
    let raw = self.text(column)?;
    NaiveTime::parse_from_str(&raw, TIME_FORMAT)
      .map_err(|_| mismatch(column, "an HH:MM:SS time", format!("{raw:?}")))
  }
}

fn integral(f: f64) -> Option<i64> {
  (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn describe(value: &Value) -> String {
  match value {
    Value::Null => "NULL".to_owned(),
    Value::Integer(i) => i.to_string(),
    Value::Real(f) => f.to_string(),
    Value::Text(s) => format!("{s:?}"),
    Value::Blob(b) => format!("a {}-byte blob", b.len()),
  }
}

fn mismatch(column: &str, expected: &'static str, found: String) -> Error {
  Error::TypeCoercion {
    column: column.to_owned(),
    expected,
    found,
  }
}
