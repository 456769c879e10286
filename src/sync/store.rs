//! Persistent storage boundary for queue entries.
//!
//! Any durable key-value store satisfies [`QueueStore`]. The crate ships a
//! `SQLite`-backed implementation for real use and an in-memory substitute
//! for isolated tests.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::error::QuadrantError;
use crate::storage::Database;
use crate::sync::entry::{EntryStatus, OperationType, QueueEntry};

/// Durable key-value storage for queue entries, keyed by entry id.
pub trait QueueStore {
    /// Fetch an entry by id.
    fn get(&self, key: &str) -> Result<Option<QueueEntry>, QuadrantError>;

    /// Insert or replace an entry under `key`.
    fn set(&mut self, key: &str, entry: &QueueEntry) -> Result<(), QuadrantError>;

    /// Remove an entry. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), QuadrantError>;

    /// Visit every stored entry, in unspecified order.
    fn iterate(&self, visit: &mut dyn FnMut(&QueueEntry)) -> Result<(), QuadrantError>;

    /// Remove every stored entry.
    fn clear(&mut self) -> Result<(), QuadrantError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryQueueStore {
    entries: HashMap<String, QueueEntry>,
}

impl MemoryQueueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl QueueStore for MemoryQueueStore {
    fn get(&self, key: &str) -> Result<Option<QueueEntry>, QuadrantError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, entry: &QueueEntry) -> Result<(), QuadrantError> {
        self.entries.insert(key.to_string(), entry.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), QuadrantError> {
        self.entries.remove(key);
        Ok(())
    }

    fn iterate(&self, visit: &mut dyn FnMut(&QueueEntry)) -> Result<(), QuadrantError> {
        for entry in self.entries.values() {
            visit(entry);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), QuadrantError> {
        self.entries.clear();
        Ok(())
    }
}

/// Durable store backed by the `queue_entries` table.
pub struct SqliteQueueStore {
    db: Database,
}

impl SqliteQueueStore {
    /// Wrap an open database.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

impl QueueStore for SqliteQueueStore {
    fn get(&self, key: &str) -> Result<Option<QueueEntry>, QuadrantError> {
        use rusqlite::OptionalExtension;

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                r"SELECT id, seq, operation_type, payload, status, retry_count,
                         created_at, last_attempt_at, last_error
                  FROM queue_entries WHERE id = ?1",
            )
            .map_err(|e| QuadrantError::Storage(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([key], row_to_entry)
            .optional()
            .map_err(|e| QuadrantError::Storage(format!("Failed to read queue entry: {e}")))
    }

    fn set(&mut self, key: &str, entry: &QueueEntry) -> Result<(), QuadrantError> {
        let conn = self.db.connection();
        conn.execute(
            r"INSERT OR REPLACE INTO queue_entries
              (id, seq, operation_type, payload, status, retry_count,
               created_at, last_attempt_at, last_error)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                key,
                entry.seq,
                entry.operation.code(),
                entry.payload,
                entry.status.to_string(),
                entry.retry_count,
                entry.created_at.to_rfc3339(),
                entry.last_attempt_at.map(|t| t.to_rfc3339()),
                entry.last_error,
            ],
        )
        .map_err(|e| QuadrantError::Storage(format!("Failed to write queue entry: {e}")))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), QuadrantError> {
        let conn = self.db.connection();
        conn.execute("DELETE FROM queue_entries WHERE id = ?1", [key])
            .map_err(|e| QuadrantError::Storage(format!("Failed to delete queue entry: {e}")))?;
        Ok(())
    }

    fn iterate(&self, visit: &mut dyn FnMut(&QueueEntry)) -> Result<(), QuadrantError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                r"SELECT id, seq, operation_type, payload, status, retry_count,
                         created_at, last_attempt_at, last_error
                  FROM queue_entries",
            )
            .map_err(|e| QuadrantError::Storage(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], row_to_entry)
            .map_err(|e| QuadrantError::Storage(format!("Failed to iterate queue: {e}")))?;

        for row in rows {
            let entry = row.map_err(|e| QuadrantError::Storage(e.to_string()))?;
            visit(&entry);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), QuadrantError> {
        let conn = self.db.connection();
        conn.execute("DELETE FROM queue_entries", [])
            .map_err(|e| QuadrantError::Storage(format!("Failed to clear queue: {e}")))?;
        Ok(())
    }
}

fn row_to_entry(row: &Row<'_>) -> Result<QueueEntry, rusqlite::Error> {
    let id: String = row.get(0)?;
    let seq: u64 = row.get(1)?;
    let operation_code: String = row.get(2)?;
    let payload: String = row.get(3)?;
    let status_code: String = row.get(4)?;
    let retry_count: u32 = row.get(5)?;
    let created_at_str: String = row.get(6)?;
    let last_attempt_str: Option<String> = row.get(7)?;
    let last_error: Option<String> = row.get(8)?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_or_else(|_| Utc::now(), |t| t.with_timezone(&Utc));
    let last_attempt_at = last_attempt_str.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
    });

    Ok(QueueEntry {
        id,
        seq,
        operation: OperationType::from_code(&operation_code),
        payload,
        status: EntryStatus::from_code(&status_code),
        retry_count,
        created_at,
        last_attempt_at,
        last_error,
    })
}
