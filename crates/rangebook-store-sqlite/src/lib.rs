//! SQLite backend for the Rangebook shooting log.
//!
//! Every operation opens its own [`tokio_rusqlite`] connection from the
//! [`StoreConfig`] and drops it when done; nothing is pooled.

mod adapter;
mod encode;
mod schema;
mod store;

pub mod error;

pub use adapter::{Row, StoreConfig};
pub use error::{Error, Result};
pub use store::SqliteStore;
