//! SQLite backend storing the document in a single-row table.
//!
//! # Invariants
//! - The `documents` table holds at most one row (`id = 1`).
//! - The connection is migrated before this repository can be constructed.

use crate::db::{open_db, open_db_in_memory};
use crate::repo::document_repo::{DocumentRepository, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

const DOCUMENT_ROW_ID: i64 = 1;

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository {
    conn: Mutex<Connection>,
}

impl SqliteDocumentRepository {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection returned by `db::open_db*`.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // Each statement below is atomic on its own, so poisoning is ignored.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentRepository for SqliteDocumentRepository {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn read_document(&self) -> RepoResult<Option<String>> {
        let body = self
            .conn()
            .query_row(
                "SELECT body FROM documents WHERE id = ?1;",
                [DOCUMENT_ROW_ID],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(body)
    }

    fn write_document(&self, body: &str) -> RepoResult<()> {
        self.conn().execute(
            "INSERT INTO documents (id, body) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![DOCUMENT_ROW_ID, body],
        )?;
        Ok(())
    }
}
