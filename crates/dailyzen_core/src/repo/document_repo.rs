//! Document repository contract and shared error type.
//!
//! # Responsibility
//! - Define the storage seam used by the store service.
//! - Keep backends ignorant of the document schema: they move text only.
//!
//! # Invariants
//! - `read_document` returns `Ok(None)` only when nothing was ever written.
//! - `write_document` replaces the whole stored body.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Transport-level failure of a document backend.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "document I/O failed at `{}`: {source}", path.display())
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

/// Storage seam for the serialized tracker document.
pub trait DocumentRepository {
    /// Short backend label used in log events (`file`, `sqlite`, `memory`).
    fn backend(&self) -> &'static str;
    fn read_document(&self) -> RepoResult<Option<String>>;
    fn write_document(&self, body: &str) -> RepoResult<()>;
}

impl<R: DocumentRepository + ?Sized> DocumentRepository for Box<R> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn read_document(&self) -> RepoResult<Option<String>> {
        (**self).read_document()
    }

    fn write_document(&self, body: &str) -> RepoResult<()> {
        (**self).write_document(body)
    }
}
