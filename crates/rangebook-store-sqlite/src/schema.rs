//! SQL schema for the Rangebook SQLite store.
//!
//! Executed once when the store is opened. There are no migrations; the
//! version is recorded in `PRAGMA user_version` for the day there are.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Catalog rows are insert-or-get on their natural key and never updated.
-- Key columns ignore case; the first spelling stored is the one kept.
CREATE TABLE IF NOT EXISTS gun (
    gun_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,   -- '{manufacturer} {model}'
    category        TEXT NOT NULL,   -- 'pistol' | 'rifle' | 'shotgun' | 'revolver'
    manufacturer    TEXT NOT NULL COLLATE NOCASE,
    model           TEXT NOT NULL COLLATE NOCASE,
    caliber         TEXT NOT NULL COLLATE NOCASE,
    ownership_type  TEXT NOT NULL,   -- 'personal' | 'rental'
    gun_notes       TEXT,
    UNIQUE (manufacturer, model, caliber)
);

CREATE TABLE IF NOT EXISTS ammo (
    ammo_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    manufacturer    TEXT NOT NULL COLLATE NOCASE,
    type            TEXT NOT NULL COLLATE NOCASE,
    caliber         TEXT NOT NULL COLLATE NOCASE,
    ammo_notes      TEXT,
    UNIQUE (manufacturer, type, caliber)
);

-- One session per calendar date.
CREATE TABLE IF NOT EXISTS session (
    session_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    date             TEXT NOT NULL UNIQUE,   -- YYYY-MM-DD
    time             TEXT NOT NULL,          -- HH:MM:SS
    target_type      TEXT NOT NULL,          -- 'steel' | 'paper'
    duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0)
);

CREATE TABLE IF NOT EXISTS session_details (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id      INTEGER NOT NULL REFERENCES session(session_id),
    gun_id          INTEGER NOT NULL REFERENCES gun(gun_id),
    ammo_id         INTEGER NOT NULL REFERENCES ammo(ammo_id),
    rounds_fired    INTEGER NOT NULL CHECK (rounds_fired > 0),
    ammo_cost_total NUMERIC NOT NULL DEFAULT 0 CHECK (ammo_cost_total >= 0)
);

CREATE INDEX IF NOT EXISTS session_details_session_idx ON session_details(session_id);

-- NUMERIC affinity may store a whole-dollar cost as an integer, so the
-- division is forced into floating point.
CREATE VIEW IF NOT EXISTS session_view AS
SELECT
    s.session_id,
    sd.id                  AS detail_id,
    s.date,
    s.time,
    s.target_type,
    s.duration_minutes,
    sd.rounds_fired,
    sd.ammo_cost_total,
    CAST(sd.ammo_cost_total AS REAL) / NULLIF(sd.rounds_fired, 0) AS cost_per_round,
    g.name                 AS gun_name,
    g.manufacturer         AS gun_manufacturer,
    a.manufacturer         AS ammo_manufacturer,
    a.type                 AS ammo_type,
    a.caliber              AS ammo_caliber
FROM session s
JOIN session_details sd ON sd.session_id = s.session_id
JOIN gun g             ON g.gun_id       = sd.gun_id
JOIN ammo a            ON a.ammo_id      = sd.ammo_id;

PRAGMA user_version = 1;
";
