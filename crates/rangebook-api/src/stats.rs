//! Handler for `GET /stats`.

use axum::{Json, extract::State};
use rangebook_core::{stats::Dashboard, store::RangeStore};

use crate::{ApiState, error::ApiError};

/// `GET /stats`: the full dashboard over the whole history.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: RangeStore + Clone,
{
  let dashboard = state.store.dashboard().await.map_err(ApiError::store)?;
  Ok(Json(dashboard))
}
