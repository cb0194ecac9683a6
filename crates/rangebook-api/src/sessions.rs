//! Handlers for `/sessions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/sessions` | Every detail row, oldest first |
//! | `GET`    | `/sessions/{id}` | Detail rows of one session |
//! | `POST`   | `/sessions` | Body: [`LogEntry`]; edit secret required; returns 201 |
//! | `DELETE` | `/sessions/latest` | Edit secret required; 404 when there is nothing to delete |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use rangebook_core::{
  session::{LogEntry, LoggedEntry, SessionId, SessionRow},
  store::RangeStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, auth::Editor, error::ApiError};

/// `GET /sessions`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<SessionRow>>, ApiError>
where
  S: RangeStore + Clone,
{
  let rows = state.store.session_rows().await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `GET /sessions/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<SessionId>,
) -> Result<Json<Vec<SessionRow>>, ApiError>
where
  S: RangeStore + Clone,
{
  let rows = state
    .store
    .session_rows_for(id)
    .await
    .map_err(ApiError::store)?;

  if rows.is_empty() {
    return Err(ApiError::NotFound(format!("session {id}")));
  }
  Ok(Json(rows))
}

/// `POST /sessions`
///
/// Resolves the gun and ammo (creating them on first use) and appends a
/// detail to the session for the entry's date.
pub async fn create<S>(
  _editor: Editor,
  State(state): State<ApiState<S>>,
  Json(entry): Json<LogEntry>,
) -> Result<(StatusCode, Json<LoggedEntry>), ApiError>
where
  S: RangeStore + Clone + Send + Sync + 'static,
{
  let entry = entry.normalized()?;
  let logged = state.store.log_entry(entry).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(logged)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedSession {
  pub session_id: SessionId,
}

/// `DELETE /sessions/latest`
pub async fn delete_latest<S>(
  _editor: Editor,
  State(state): State<ApiState<S>>,
) -> Result<Json<DeletedSession>, ApiError>
where
  S: RangeStore + Clone + Send + Sync + 'static,
{
  match state
    .store
    .delete_most_recent_session()
    .await
    .map_err(ApiError::store)?
  {
    Some(session_id) => Ok(Json(DeletedSession { session_id })),
    None => Err(ApiError::NotFound("no sessions to delete".into())),
  }
}
