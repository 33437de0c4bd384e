//! JSON file backend.
//!
//! # Invariants
//! - Writes go to a sibling temp file that is renamed over the target, so a
//!   crash mid-write leaves the previous document intact.
//! - A missing file reads as "never written".

use crate::repo::document_repo::{DocumentRepository, RepoError, RepoResult};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores the document as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileDocumentRepository {
    path: PathBuf,
}

impl JsonFileDocumentRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl DocumentRepository for JsonFileDocumentRepository {
    fn backend(&self) -> &'static str {
        "file"
    }

    fn read_document(&self) -> RepoResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn write_document(&self, body: &str) -> RepoResult<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir).map_err(|err| self.io_error(err))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|err| self.io_error(err))?;
        staged
            .write_all(body.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| self.io_error(err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileDocumentRepository;
    use crate::repo::document_repo::DocumentRepository;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileDocumentRepository::new(dir.path().join("absent.json"));
        assert_eq!(repo.read_document().unwrap(), None);
    }

    #[test]
    fn write_creates_parent_dirs_and_replaces_body() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileDocumentRepository::new(dir.path().join("nested/data_store.json"));

        repo.write_document("{\"items\": []}").unwrap();
        repo.write_document("{}").unwrap();

        assert_eq!(repo.read_document().unwrap().as_deref(), Some("{}"));
        let leftovers = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .count();
        assert_eq!(leftovers, 1, "temp files must not be left behind");
    }
}
