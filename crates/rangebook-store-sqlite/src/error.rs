//! Error type for `rangebook-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rangebook_core::Error),

  /// The database file could not be opened.
  #[error("could not open store at {path:?}: {source}")]
  Connection {
    path:   PathBuf,
    source: tokio_rusqlite::Error,
  },

  /// Malformed SQL or a constraint violation.
  #[error("database error: {0}")]
  Query(#[from] tokio_rusqlite::Error),

  /// A column held a value of a shape the caller cannot use.
  #[error("column {column:?}: expected {expected}, found {found}")]
  TypeCoercion {
    column:   String,
    expected: &'static str,
    found:    String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
