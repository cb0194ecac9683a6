//! Edit-secret gate for write endpoints.
//!
//! Reads are public. Logging and deleting sessions require the shared edit
//! secret as a bearer token; it is checked against an argon2 PHC hash, never
//! compared as plaintext.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use rangebook_core::store::RangeStore;

use crate::{ApiState, error::ApiError};

/// The server's edit secret.
#[derive(Clone)]
pub struct AuthConfig {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in the handler means the caller knew the secret.
pub struct Editor;

/// Check a candidate secret against the configured hash.
pub fn verify_password(candidate: &str, config: &AuthConfig) -> bool {
  let Ok(parsed_hash) = PasswordHash::new(&config.password_hash) else {
    tracing::warn!("configured edit password hash is not a valid PHC string");
    return false;
  };
  Argon2::default()
    .verify_password(candidate.as_bytes(), &parsed_hash)
    .is_ok()
}

/// Verify the bearer token in `headers`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let candidate = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(ApiError::Unauthorized)?;

  if !verify_password(candidate, config) {
    tracing::warn!("rejected edit request with wrong secret");
    return Err(ApiError::Unauthorized);
  }
  Ok(())
}

impl<S> FromRequestParts<ApiState<S>> for Editor
where
  S: RangeStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?;
    Ok(Editor)
  }
}
