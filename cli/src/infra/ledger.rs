//! Infrastructure implementation of the `EventLedger` port on SQLite.
//!
//! One `events` table, append-only. Every `record` is an autocommit insert,
//! so the row is durable before the caller moves on.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use deck_common::{ExecutionMode, OperationRecord};
use rusqlite::{Connection, params};

use crate::application::ports::EventLedger;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ts TEXT NOT NULL,
        service TEXT,
        command TEXT,
        mode TEXT,
        payload TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_events_service ON events(service);
    CREATE INDEX IF NOT EXISTS idx_events_ts ON events(ts);
";

/// Audit ledger backed by a single SQLite connection.
pub struct SqliteLedger {
    conn: Connection,
}

/// Raw column values, converted after the statement is finished.
type EventRow = (i64, String, Option<String>, Option<String>, Option<String>, Option<String>);

impl SqliteLedger {
    /// Open or create the ledger at `path` in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening audit ledger {}", path.display()))?;
        let journal: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .context("enabling WAL journal")?;
        tracing::debug!(path = %path.display(), journal, "audit ledger opened");
        Self::with_connection(conn)
    }

    /// In-memory ledger (tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("creating audit ledger schema")?;
        Ok(Self { conn })
    }

    fn query(&self, service: Option<&str>, limit: i64) -> rusqlite::Result<Vec<EventRow>> {
        let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<EventRow> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        };
        match service {
            Some(service) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, ts, service, command, mode, payload FROM events
                     WHERE service = ?1 ORDER BY id DESC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![service, limit], map)?;
                rows.collect()
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, ts, service, command, mode, payload FROM events
                     ORDER BY id DESC LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], map)?;
                rows.collect()
            }
        }
    }
}

impl EventLedger for SqliteLedger {
    fn record(
        &self,
        service: Option<&str>,
        command: &str,
        mode: ExecutionMode,
        payload: &serde_json::Value,
    ) -> Result<i64> {
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let payload = serde_json::to_string(payload).context("serializing ledger payload")?;
        self.conn
            .execute(
                "INSERT INTO events (ts, service, command, mode, payload) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![ts, service, command, mode.as_str(), payload],
            )
            .with_context(|| format!("recording {command} event"))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn history(&self, service: Option<&str>, limit: usize) -> Result<Vec<OperationRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self.query(service, limit).context("reading audit ledger")?;

        rows.into_iter()
            .map(|(id, ts, service, command, mode, payload)| {
                let mode = mode
                    .as_deref()
                    .unwrap_or_default()
                    .parse::<ExecutionMode>()
                    .with_context(|| format!("event {id}"))?;
                let payload = match payload.as_deref() {
                    Some(text) if !text.is_empty() => serde_json::from_str(text)
                        .with_context(|| format!("event {id}: invalid payload"))?,
                    _ => serde_json::Value::Null,
                };
                Ok(OperationRecord {
                    id,
                    ts,
                    service,
                    command: command.unwrap_or_default(),
                    mode,
                    payload,
                })
            })
            .collect()
    }
}
