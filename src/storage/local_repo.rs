//! Local task repository.
//!
//! A `SQLite`-backed implementation of the [`TaskRepository`] boundary,
//! standing in for the remote document store. Upserts are keyed by task id
//! and deletes tolerate absent ids, so repeated delivery of the same queue
//! payload leaves the store unchanged — the idempotency the drain
//! algorithm relies on.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::core::{Quadrant, Task, TaskRepository};
use crate::error::QuadrantError;
use crate::storage::Database;

/// Task storage over the `tasks` table.
pub struct LocalTaskRepository {
    db: Database,
}

impl LocalTaskRepository {
    /// Wrap an open database.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// All tasks across all quadrants, ordered by quadrant and position.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn all_tasks(&self) -> Result<Vec<Task>, QuadrantError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                r"SELECT id, title, notes, quadrant, position, created_at, updated_at
                  FROM tasks ORDER BY quadrant, position, created_at",
            )
            .map_err(|e| QuadrantError::Storage(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], row_to_task)
            .map_err(|e| QuadrantError::Storage(format!("Failed to query tasks: {e}")))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(|e| QuadrantError::Storage(e.to_string()))?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for LocalTaskRepository {
    fn upsert_task(&mut self, task: &Task) -> Result<(), QuadrantError> {
        let conn = self.db.connection();
        conn.execute(
            r"INSERT OR REPLACE INTO tasks
              (id, title, notes, quadrant, position, created_at, updated_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.title,
                task.notes,
                task.quadrant.code(),
                task.position,
                task.created_at.map(|t| t.to_rfc3339()),
                task.updated_at.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(|e| QuadrantError::Repository(format!("Failed to upsert task: {e}")))?;
        Ok(())
    }

    fn delete_task(&mut self, id: &str) -> Result<(), QuadrantError> {
        let conn = self.db.connection();
        conn.execute("DELETE FROM tasks WHERE id = ?1", [id])
            .map_err(|e| QuadrantError::Repository(format!("Failed to delete task: {e}")))?;
        Ok(())
    }

    fn get_task(&self, id: &str) -> Result<Option<Task>, QuadrantError> {
        use rusqlite::OptionalExtension;

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                r"SELECT id, title, notes, quadrant, position, created_at, updated_at
                  FROM tasks WHERE id = ?1",
            )
            .map_err(|e| QuadrantError::Storage(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([id], row_to_task)
            .optional()
            .map_err(|e| QuadrantError::Repository(format!("Failed to read task: {e}")))
    }

    fn list_tasks(&self, quadrant: Quadrant) -> Result<Vec<Task>, QuadrantError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                r"SELECT id, title, notes, quadrant, position, created_at, updated_at
                  FROM tasks WHERE quadrant = ?1 ORDER BY position, created_at",
            )
            .map_err(|e| QuadrantError::Storage(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([quadrant.code()], row_to_task)
            .map_err(|e| QuadrantError::Repository(format!("Failed to query tasks: {e}")))?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(|e| QuadrantError::Repository(e.to_string()))?);
        }
        Ok(tasks)
    }
}

fn row_to_task(row: &Row<'_>) -> Result<Task, rusqlite::Error> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let notes: String = row.get(2)?;
    let quadrant_code: String = row.get(3)?;
    let position: u32 = row.get(4)?;
    let created_at_str: Option<String> = row.get(5)?;
    let updated_at_str: Option<String> = row.get(6)?;

    let parse = |s: Option<String>| {
        s.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .ok()
        })
    };

    Ok(Task {
        id,
        title,
        notes,
        quadrant: Quadrant::parse(&quadrant_code).unwrap_or(Quadrant::UrgentImportant),
        position,
        created_at: parse(created_at_str),
        updated_at: parse(updated_at_str),
    })
}
