//! [`SqliteStore`], the SQLite implementation of [`RangeStore`].

use std::sync::Arc;

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use rangebook_core::{
  catalog::{Ammo, AmmoId, Gun, GunId, NewAmmo, NewGun},
  session::{NewSessionEntry, SessionId, SessionRow},
  store::RangeStore,
};

use crate::{
  Result,
  adapter::{self, StoreConfig, execute, fetch_all, last_insert_id},
  encode::{ammo_from_row, encode_date, encode_time, gun_from_row, session_row_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rangebook store backed by a single SQLite file.
///
/// Holds only its configuration; a connection is opened for each operation
/// and closed when it finishes. Cloning is cheap.
#[derive(Clone)]
pub struct SqliteStore {
  config: Arc<StoreConfig>,
}

impl SqliteStore {
  /// Open (or create) the store described by `config` and initialise the
  /// schema.
  pub async fn open(config: StoreConfig) -> Result<Self> {
    let store = Self { config: Arc::new(config) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on a connection scoped to this call.
  pub(crate) async fn with_conn<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let conn = adapter::connect(&self.config).await?;
    let out = conn.call(f).await?;
    Ok(out)
  }
}

/// Insert a catalog or session row unless its unique key already exists,
/// then return the row's id and whether it was created.
///
/// Runs inside the caller's immediate transaction, so no other writer can
/// slip in between the insert attempt and the keyed read.
fn insert_or_get(
  tx: &rusqlite::Transaction<'_>,
  insert: &str,
  insert_params: impl rusqlite::Params,
  select: &str,
  key_params: impl rusqlite::Params,
) -> rusqlite::Result<(i64, bool)> {
  execute(tx, insert, insert_params)?;
  if tx.changes() == 1 {
    return Ok((last_insert_id(tx), true));
  }
  let id = tx.query_row(select, key_params, |row| row.get(0))?;
  Ok((id, false))
}

const GUN_COLUMNS: &str =
  "gun_id, name, category, manufacturer, model, caliber, ownership_type, gun_notes";

const AMMO_COLUMNS: &str = "ammo_id, manufacturer, type, caliber, ammo_notes";

// ─── RangeStore impl ─────────────────────────────────────────────────────────

impl RangeStore for SqliteStore {
  type Error = crate::Error;

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn resolve_gun(&self, gun: NewGun) -> Result<GunId> {
    let gun = gun.normalized()?;
    let name           = gun.display_name();
    let category       = gun.category.as_ref().to_owned();
    let ownership_type = gun.ownership_type.as_ref().to_owned();
    let NewGun { manufacturer, model, caliber, notes, .. } = gun;

    let (gun_id, created) = self
      .with_conn(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let resolved = insert_or_get(
          &tx,
          "INSERT INTO gun (name, category, manufacturer, model, caliber, ownership_type, gun_notes)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
           ON CONFLICT (manufacturer, model, caliber) DO NOTHING",
          rusqlite::params![name, category, manufacturer, model, caliber, ownership_type, notes],
          "SELECT gun_id FROM gun WHERE manufacturer = ?1 AND model = ?2 AND caliber = ?3",
          rusqlite::params![manufacturer, model, caliber],
        )?;
        tx.commit()?;
        Ok(resolved)
      })
      .await?;

    if created {
      tracing::info!(gun_id, "added gun to catalog");
    } else {
      tracing::debug!(gun_id, "gun already in catalog");
    }
    Ok(gun_id)
  }

  async fn resolve_ammo(&self, ammo: NewAmmo) -> Result<AmmoId> {
    let NewAmmo { manufacturer, ammo_type, caliber, notes } = ammo.normalized()?;

    let (ammo_id, created) = self
      .with_conn(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let resolved = insert_or_get(
          &tx,
          "INSERT INTO ammo (manufacturer, type, caliber, ammo_notes)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (manufacturer, type, caliber) DO NOTHING",
          rusqlite::params![manufacturer, ammo_type, caliber, notes],
          "SELECT ammo_id FROM ammo WHERE manufacturer = ?1 AND type = ?2 AND caliber = ?3",
          rusqlite::params![manufacturer, ammo_type, caliber],
        )?;
        tx.commit()?;
        Ok(resolved)
      })
      .await?;

    if created {
      tracing::info!(ammo_id, "added ammo to catalog");
    } else {
      tracing::debug!(ammo_id, "ammo already in catalog");
    }
    Ok(ammo_id)
  }

  async fn list_guns(&self) -> Result<Vec<Gun>> {
    let rows = self
      .with_conn(|conn| {
        Ok(fetch_all(
          conn,
          &format!("SELECT {GUN_COLUMNS} FROM gun ORDER BY manufacturer, name, gun_id"),
          [],
        )?)
      })
      .await?;

    rows.iter().map(gun_from_row).collect()
  }

  async fn list_ammo(&self, caliber: Option<String>) -> Result<Vec<Ammo>> {
    let rows = self
      .with_conn(move |conn| {
        Ok(fetch_all(
          conn,
          &format!(
            "SELECT {AMMO_COLUMNS} FROM ammo
             WHERE ?1 IS NULL OR caliber = ?1
             ORDER BY manufacturer, type, ammo_id"
          ),
          rusqlite::params![caliber],
        )?)
      })
      .await?;

    rows.iter().map(ammo_from_row).collect()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn record_session(&self, entry: NewSessionEntry) -> Result<SessionId> {
    entry.validate()?;

    let date        = encode_date(entry.date);
    let time        = encode_time(entry.time);
    let target_type = entry.target_type.as_ref().to_owned();
    let log_date    = entry.date;

    let (session_id, created) = self
      .with_conn(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The first entry of the day decides time, target and duration.
        let (session_id, created) = insert_or_get(
          &tx,
          "INSERT INTO session (date, time, target_type, duration_minutes)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (date) DO NOTHING",
          rusqlite::params![date, time, target_type, entry.duration_minutes],
          "SELECT session_id FROM session WHERE date = ?1",
          rusqlite::params![date],
        )?;

        execute(
          &tx,
          "INSERT INTO session_details (session_id, gun_id, ammo_id, rounds_fired, ammo_cost_total)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            session_id,
            entry.gun_id,
            entry.ammo_id,
            entry.rounds_fired,
            entry.ammo_cost_total,
          ],
        )?;

        tx.commit()?;
        Ok((session_id, created))
      })
      .await?;

    tracing::info!(session_id, date = %log_date, new_session = created, "recorded session detail");
    Ok(session_id)
  }

  async fn delete_most_recent_session(&self) -> Result<Option<SessionId>> {
    let deleted = self
      .with_conn(|conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let latest: Option<i64> = tx
          .query_row(
            "SELECT session_id FROM session ORDER BY date DESC, time DESC LIMIT 1",
            [],
            |row| row.get(0),
          )
          .optional()?;

        let Some(session_id) = latest else {
          return Ok(None);
        };

        execute(&tx, "DELETE FROM session_details WHERE session_id = ?1", [session_id])?;
        execute(&tx, "DELETE FROM session WHERE session_id = ?1", [session_id])?;
        tx.commit()?;
        Ok(Some(session_id))
      })
      .await?;

    match deleted {
      Some(session_id) => tracing::info!(session_id, "deleted most recent session"),
      None => tracing::info!("no session to delete"),
    }
    Ok(deleted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn session_rows(&self) -> Result<Vec<SessionRow>> {
    let rows = self
      .with_conn(|conn| {
        Ok(fetch_all(
          conn,
          "SELECT * FROM session_view ORDER BY date, time, detail_id",
          [],
        )?)
      })
      .await?;

    rows.iter().map(session_row_from_row).collect()
  }

  async fn session_rows_for(&self, session_id: SessionId) -> Result<Vec<SessionRow>> {
    let rows = self
      .with_conn(move |conn| {
        Ok(fetch_all(
          conn,
          "SELECT * FROM session_view WHERE session_id = ?1 ORDER BY detail_id",
          [session_id],
        )?)
      })
      .await?;

    rows.iter().map(session_row_from_row).collect()
  }
}
