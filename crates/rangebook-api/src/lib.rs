//! JSON REST API for Rangebook.
//!
//! Exposes an axum [`Router`] backed by any [`RangeStore`]. TLS and transport
//! concerns are the caller's responsibility; write endpoints are gated by
//! [`auth::Editor`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rangebook_api::api_router(state))
//! ```

pub mod auth;
pub mod catalog;
pub mod error;
pub mod sessions;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get},
};
use rangebook_core::store::RangeStore;

pub use auth::AuthConfig;
pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S: RangeStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RangeStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Catalog
    .route("/guns", get(catalog::list_guns::<S>))
    .route("/ammo", get(catalog::list_ammo::<S>))
    // Sessions
    .route("/sessions", get(sessions::list::<S>).post(sessions::create::<S>))
    .route("/sessions/latest", delete(sessions::delete_latest::<S>))
    .route("/sessions/{id}", get(sessions::get_one::<S>))
    // Statistics
    .route("/stats", get(stats::handler::<S>))
    .with_state(state)
}
