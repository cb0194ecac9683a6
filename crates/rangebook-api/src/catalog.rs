//! Handlers for the catalog endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/guns` | All guns, by manufacturer |
//! | `GET`  | `/ammo` | Optional `?caliber=` narrows to one caliber |

use axum::{
  Json,
  extract::{Query, State},
};
use rangebook_core::{
  catalog::{Ammo, Gun},
  store::RangeStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// A catalog entry with the label shown in selection lists.
#[derive(Debug, Serialize)]
pub struct Labelled<T> {
  pub label: String,
  #[serde(flatten)]
  pub entry: T,
}

/// `GET /guns`
pub async fn list_guns<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Labelled<Gun>>>, ApiError>
where
  S: RangeStore + Clone,
{
  let guns = state.store.list_guns().await.map_err(ApiError::store)?;
  Ok(Json(
    guns
      .into_iter()
      .map(|gun| Labelled { label: gun.label(), entry: gun })
      .collect(),
  ))
}

#[derive(Debug, Deserialize, Default)]
pub struct AmmoParams {
  pub caliber: Option<String>,
}

/// `GET /ammo[?caliber=...]`
pub async fn list_ammo<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<AmmoParams>,
) -> Result<Json<Vec<Labelled<Ammo>>>, ApiError>
where
  S: RangeStore + Clone,
{
  let ammo = state
    .store
    .list_ammo(params.caliber)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(
    ammo
      .into_iter()
      .map(|ammo| Labelled { label: ammo.label(), entry: ammo })
      .collect(),
  ))
}
