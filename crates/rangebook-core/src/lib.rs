//! Core types and trait definitions for the Rangebook shooting log.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! aggregation engine lives here because it only ever sees already-joined
//! rows; it never talks to a store.

#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod session;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
