//! Session persistence.
//!
//! RULE: the engine only talks to persistence through `SessionStore`.
//! It never reaches into ambient global state. Only this file runs SQL.

use crate::{
    error::EngineResult,
    session::Session,
    snapshot::SessionSnapshot,
};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// Key-value persistence of one snapshot per username.
pub trait SessionStore: Send + Sync {
    fn load(&self, username: &str) -> EngineResult<Option<SessionSnapshot>>;

    fn save(&self, username: &str, snapshot: &SessionSnapshot) -> EngineResult<()>;

    /// Purge the snapshot. Login records are kept.
    fn clear(&self, username: &str) -> EngineResult<()>;

    fn record_login(&self, _session: &Session) -> EngineResult<()> {
        Ok(())
    }

    fn record_logout(&self, _session: &Session) -> EngineResult<()> {
        Ok(())
    }
}

// ── SQLite ─────────────────────────────────────────────────────────

pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    /// Open (or create) the session database at `path` and migrate it.
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        let store = Self { conn: Mutex::new(conn) };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let store = Self { conn: Mutex::new(Connection::open_in_memory()?) };
        store.migrate()?;
        Ok(store)
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .lock()
            .execute_batch(include_str!("../../migrations/001_session.sql"))?;
        Ok(())
    }

    /// Raw blob for a username, bypassing snapshot parsing (for tests and tooling).
    pub fn raw_state(&self, username: &str) -> EngineResult<Option<String>> {
        let json = self
            .conn
            .lock()
            .query_row(
                "SELECT state_json FROM session_snapshot WHERE username = ?1",
                params![username],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(json)
    }

    /// Overwrite the raw blob for a username (for tests and tooling).
    pub fn put_raw_state(&self, username: &str, state_json: &str) -> EngineResult<()> {
        self.conn.lock().execute(
            "INSERT INTO session_snapshot (username, state_json, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(username) DO UPDATE SET state_json = excluded.state_json,
                                                 saved_at   = excluded.saved_at",
            params![username, state_json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn login_count(&self, username: &str) -> EngineResult<i64> {
        let count: i64 = self.conn.lock().query_row(
            "SELECT COUNT(*) FROM session_login WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self, username: &str) -> EngineResult<Option<SessionSnapshot>> {
        match self.raw_state(username)? {
            Some(json) => Ok(Some(SessionSnapshot::from_json(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, username: &str, snapshot: &SessionSnapshot) -> EngineResult<()> {
        self.put_raw_state(username, &snapshot.to_json()?)
    }

    fn clear(&self, username: &str) -> EngineResult<()> {
        self.conn.lock().execute(
            "DELETE FROM session_snapshot WHERE username = ?1",
            params![username],
        )?;
        Ok(())
    }

    fn record_login(&self, session: &Session) -> EngineResult<()> {
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO session_login (session_id, username, login_time)
             VALUES (?1, ?2, ?3)",
            params![session.session_id, session.username, session.login_time.to_rfc3339()],
        )?;
        Ok(())
    }

    fn record_logout(&self, session: &Session) -> EngineResult<()> {
        self.conn.lock().execute(
            "UPDATE session_login SET logout_time = ?1 WHERE session_id = ?2",
            params![Utc::now().to_rfc3339(), session.session_id],
        )?;
        Ok(())
    }
}

// ── In-memory ──────────────────────────────────────────────────────

/// Keeps serialized blobs in a map. Nothing survives the process.
#[derive(Default)]
pub struct MemorySessionStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.blobs.lock().contains_key(username)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, username: &str) -> EngineResult<Option<SessionSnapshot>> {
        match self.blobs.lock().get(username) {
            Some(json) => Ok(Some(SessionSnapshot::from_json(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, username: &str, snapshot: &SessionSnapshot) -> EngineResult<()> {
        let json = snapshot.to_json()?;
        self.blobs.lock().insert(username.to_string(), json);
        Ok(())
    }

    fn clear(&self, username: &str) -> EngineResult<()> {
        self.blobs.lock().remove(username);
        Ok(())
    }
}
