use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Auth audit event ("user_registered", "signed_in", ...)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub user_id: String,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(event_type: &str, user_id: &str, data: serde_json::Value) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            user_id: user_id.to_string(),
            data,
        }
    }
}

/// Open (or create) the auth database file with WAL enabled
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ==========================================================================
    // Users (metadata is a JSON object)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            password_rounds INTEGER NOT NULL,
            metadata TEXT NOT NULL DEFAULT '{}',
            email_confirmed_at TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Sessions
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS sessions (
            access_token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Pending email confirmations (one per user, replaced on resend)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS email_confirmations (
            token TEXT PRIMARY KEY,
            user_id TEXT UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            email TEXT NOT NULL,
            redirect_to TEXT,
            sent_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            user_id TEXT NOT NULL,
            data TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_user ON events(user_id, timestamp)",
        [],
    )?;

    Ok(())
}

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO events (event_id, timestamp, event_type, user_id, data)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event.event_id,
            format_timestamp(event.timestamp),
            event.event_type,
            event.user_id,
            event.data.to_string(),
        ],
    )?;

    Ok(())
}

/// Events for one user, newest first
pub fn get_events_for_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, user_id, data
         FROM events
         WHERE user_id = ?1
         ORDER BY id DESC",
    )?;

    let events = stmt
        .query_map(params![user_id], |row| {
            let timestamp: String = row.get(1)?;
            let data: String = row.get(4)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: parse_timestamp(&timestamp)?,
                event_type: row.get(2)?,
                user_id: row.get(3)?,
                data: serde_json::from_str(&data).unwrap_or(serde_json::Value::Null),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

/// Drop sessions whose expiry has passed; returns how many were removed
pub fn purge_expired_sessions(conn: &Connection, now: DateTime<Utc>) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM sessions WHERE expires_at <= ?1",
        params![format_timestamp(now)],
    )
}

/// Fixed-width RFC 3339 so stored timestamps compare correctly as text
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// RFC 3339 column value to a UTC timestamp
pub fn parse_timestamp(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
        })
}

pub fn count_users(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}
