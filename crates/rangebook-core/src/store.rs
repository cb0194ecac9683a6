//! The `RangeStore` trait.
//!
//! Implemented by storage backends (e.g. `rangebook-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  catalog::{Ammo, AmmoId, Gun, GunId, NewAmmo, NewGun},
  session::{LogEntry, LoggedEntry, NewSessionEntry, SessionId, SessionRow},
  stats::Dashboard,
};

/// Abstraction over a Rangebook store backend.
///
/// Catalog entries are insert-or-get; sessions are merged by date. The only
/// destructive operation is [`RangeStore::delete_most_recent_session`].
pub trait RangeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Catalog ───────────────────────────────────────────────────────────

  /// Return the id of the gun with this `(manufacturer, model, caliber)`,
  /// creating it first if it does not exist. On a hit the stored row is
  /// authoritative and the other input fields are ignored.
  fn resolve_gun(
    &self,
    gun: NewGun,
  ) -> impl Future<Output = Result<GunId, Self::Error>> + Send + '_;

  /// Return the id of the ammo with this `(manufacturer, type, caliber)`,
  /// creating it first if it does not exist.
  fn resolve_ammo(
    &self,
    ammo: NewAmmo,
  ) -> impl Future<Output = Result<AmmoId, Self::Error>> + Send + '_;

  /// All guns, ordered by manufacturer then name.
  fn list_guns(
    &self,
  ) -> impl Future<Output = Result<Vec<Gun>, Self::Error>> + Send + '_;

  /// All ammo ordered by manufacturer, optionally restricted to one caliber.
  fn list_ammo(
    &self,
    caliber: Option<String>,
  ) -> impl Future<Output = Result<Vec<Ammo>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Append a detail to the session for `entry.date`, creating the session
  /// if this is the first entry for that date. Returns the session id.
  fn record_session(
    &self,
    entry: NewSessionEntry,
  ) -> impl Future<Output = Result<SessionId, Self::Error>> + Send + '_;

  /// Delete the session with the latest `(date, time)` and every detail
  /// belonging to it. Returns `None` when there is nothing to delete.
  fn delete_most_recent_session(
    &self,
  ) -> impl Future<Output = Result<Option<SessionId>, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// The joined view, ordered by date, time and detail id.
  fn session_rows(
    &self,
  ) -> impl Future<Output = Result<Vec<SessionRow>, Self::Error>> + Send + '_;

  /// The joined view restricted to one session. Empty if it does not exist.
  fn session_rows_for(
    &self,
    session_id: SessionId,
  ) -> impl Future<Output = Result<Vec<SessionRow>, Self::Error>> + Send + '_;

  // ── Provided ──────────────────────────────────────────────────────────

  /// Resolve the gun and ammo of `entry`, then record its session detail.
  ///
  /// `entry` must already be normalized; see [`LogEntry::normalized`].
  fn log_entry(
    &self,
    entry: LogEntry,
  ) -> impl Future<Output = Result<LoggedEntry, Self::Error>> + Send + '_ {
    async move {
      let gun_id = self.resolve_gun(entry.gun.clone()).await?;
      let ammo_id = self.resolve_ammo(entry.ammo.clone()).await?;
      let session_id = self
        .record_session(entry.session_entry(gun_id, ammo_id))
        .await?;
      Ok(LoggedEntry { session_id, gun_id, ammo_id })
    }
  }

  /// Compute the statistics dashboard over the whole history.
  fn dashboard(
    &self,
  ) -> impl Future<Output = Result<Dashboard, Self::Error>> + Send + '_ {
    async move {
      let rows = self.session_rows().await?;
      Ok(Dashboard::from_rows(&rows))
    }
  }
}
