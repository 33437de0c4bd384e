//! In-memory backend for tests and ephemeral runs.

use crate::repo::document_repo::{DocumentRepository, RepoResult};
use std::sync::{Mutex, PoisonError};

/// Keeps the serialized document in process memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    body: Mutex<Option<String>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `body` already stored, as if written by an earlier run.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Mutex::new(Some(body.into())),
        }
    }

    /// Returns the raw stored text.
    pub fn snapshot(&self) -> Option<String> {
        self.body
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn read_document(&self) -> RepoResult<Option<String>> {
        Ok(self.snapshot())
    }

    fn write_document(&self, body: &str) -> RepoResult<()> {
        *self.body.lock().unwrap_or_else(PoisonError::into_inner) = Some(body.to_string());
        Ok(())
    }
}
