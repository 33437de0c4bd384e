//! Tracker store: load/save plus the create/replace use-cases.
//!
//! # Responsibility
//! - Translate between the stored text and `Document`.
//! - Seed the document on first access.
//! - Apply the corruption policy when the stored text cannot be parsed.
//!
//! # Invariants
//! - Every mutation is validated before any read or write happens.
//! - Every mutation is exactly one full load followed by one full save.
//! - Load+mutate+save runs under one in-process lock per store.

use crate::model::document::{Document, Item, Profile, ScheduleEntry, ValidationError};
use crate::repo::document_repo::{DocumentRepository, RepoError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type StoreResult<T> = Result<T, StoreError>;

/// What `load` does when the stored document cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptPolicy {
    /// Log a warning and continue with an empty document.
    ///
    /// The next mutation then overwrites the unreadable content.
    #[default]
    FailOpen,
    /// Return `StoreError::Corrupt` to the caller.
    Surface,
}

impl CorruptPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail_open" | "fail-open" => Some(Self::FailOpen),
            "surface" => Some(Self::Surface),
            _ => None,
        }
    }
}

/// Stored document text is not a readable tracker document.
#[derive(Debug)]
pub struct StorageCorruptError {
    pub source: serde_json::Error,
}

impl Display for StorageCorruptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "stored document is unreadable: {}", self.source)
    }
}

impl Error for StorageCorruptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Error type for store use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// Required input was missing or empty; nothing was read or written.
    Validation(ValidationError),
    /// Stored text could not be parsed (only with `CorruptPolicy::Surface`).
    Corrupt(StorageCorruptError),
    /// Document could not be serialized.
    Encode(serde_json::Error),
    /// Backend transport failure.
    Repo(RepoError),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Corrupt(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Corrupt(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Document store over an injected repository.
pub struct Store<R: DocumentRepository> {
    repo: R,
    policy: CorruptPolicy,
    write_lock: Mutex<()>,
}

impl<R: DocumentRepository> Store<R> {
    /// Creates a store with the default fail-open corruption policy.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, CorruptPolicy::default())
    }

    pub fn with_policy(repo: R, policy: CorruptPolicy) -> Self {
        Self {
            repo,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn policy(&self) -> CorruptPolicy {
        self.policy
    }

    /// Returns the current document, seeding it on first access.
    ///
    /// # Errors
    /// - `Repo` on backend failure.
    /// - `Corrupt` when the stored text is unreadable and the policy is `Surface`.
    pub fn load(&self) -> StoreResult<Document> {
        let _guard = self.lock();
        self.load_unlocked()
    }

    /// Overwrites the stored document with `document`.
    pub fn save(&self, document: &Document) -> StoreResult<()> {
        let _guard = self.lock();
        self.save_unlocked(document)
    }

    /// Appends a not-yet-carried item.
    ///
    /// # Errors
    /// - `Validation` when `name` is empty; the document is left untouched.
    pub fn add_item(&self, name: &str) -> StoreResult<Item> {
        let item = Item::new(name)?;
        let items = self.mutate(|document| {
            document.items.push(item.clone());
            document.items.len()
        })?;
        info!(
            "event=item_add module=store status=ok backend={} item_count={items}",
            self.repo.backend()
        );
        Ok(item)
    }

    /// Appends an `upcoming` schedule entry. `date`/`time` may be empty.
    ///
    /// # Errors
    /// - `Validation` when `title` is empty; the document is left untouched.
    pub fn add_schedule(&self, title: &str, date: &str, time: &str) -> StoreResult<ScheduleEntry> {
        let entry = ScheduleEntry::new(title, date, time)?;
        let entries = self.mutate(|document| {
            document.schedules.push(entry.clone());
            document.schedules.len()
        })?;
        info!(
            "event=schedule_add module=store status=ok backend={} schedule_count={entries}",
            self.repo.backend()
        );
        Ok(entry)
    }

    /// Replaces the profile record wholesale.
    ///
    /// # Errors
    /// - `Validation` when `username` is empty; the document is left untouched.
    pub fn update_profile(&self, username: &str) -> StoreResult<Profile> {
        let profile = Profile::new(username)?;
        self.mutate(|document| document.profile = Some(profile.clone()))?;
        info!(
            "event=profile_update module=store status=ok backend={}",
            self.repo.backend()
        );
        Ok(profile)
    }

    fn mutate<T>(&self, apply: impl FnOnce(&mut Document) -> T) -> StoreResult<T> {
        let _guard = self.lock();
        let mut document = self.load_unlocked()?;
        let value = apply(&mut document);
        self.save_unlocked(&document)?;
        Ok(value)
    }

    fn load_unlocked(&self) -> StoreResult<Document> {
        let Some(body) = self.repo.read_document()? else {
            let seed = Document::seed();
            self.save_unlocked(&seed)?;
            info!(
                "event=store_seed module=store status=ok backend={}",
                self.repo.backend()
            );
            return Ok(seed);
        };

        match decode_document(&body) {
            Ok(document) => {
                debug!(
                    "event=store_load module=store status=ok backend={} habits={} items={} schedules={}",
                    self.repo.backend(),
                    document.habits.len(),
                    document.items.len(),
                    document.schedules.len()
                );
                Ok(document)
            }
            Err(err) => match self.policy {
                CorruptPolicy::FailOpen => {
                    warn!(
                        "event=store_load module=store status=degraded backend={} error_code=document_corrupt line={} column={}",
                        self.repo.backend(),
                        err.source.line(),
                        err.source.column()
                    );
                    Ok(Document::default())
                }
                CorruptPolicy::Surface => {
                    warn!(
                        "event=store_load module=store status=error backend={} error_code=document_corrupt",
                        self.repo.backend()
                    );
                    Err(StoreError::Corrupt(err))
                }
            },
        }
    }

    fn save_unlocked(&self, document: &Document) -> StoreResult<()> {
        let body = encode_document(document)?;
        self.repo.write_document(&body)?;
        debug!(
            "event=store_save module=store status=ok backend={} bytes={}",
            self.repo.backend(),
            body.len()
        );
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parses stored text into a document.
///
/// Any JSON object is accepted; missing or mistyped keys read as empty.
/// Only text that is not a JSON object is corrupt.
pub fn decode_document(body: &str) -> Result<Document, StorageCorruptError> {
    serde_json::from_str(body).map_err(|source| StorageCorruptError { source })
}

/// Serializes a document as pretty-printed JSON (two-space indent).
pub fn encode_document(document: &Document) -> StoreResult<String> {
    serde_json::to_string_pretty(document).map_err(StoreError::Encode)
}

#[cfg(test)]
mod tests {
    use super::{decode_document, encode_document, CorruptPolicy};
    use crate::model::document::Document;

    #[test]
    fn corrupt_policy_parses_known_values() {
        assert_eq!(CorruptPolicy::parse(" Surface "), Some(CorruptPolicy::Surface));
        assert_eq!(CorruptPolicy::parse("fail-open"), Some(CorruptPolicy::FailOpen));
        assert_eq!(CorruptPolicy::parse("ignore"), None);
    }

    #[test]
    fn decode_tolerates_missing_keys() {
        let document = decode_document("{\"items\": [{\"name\": \"Keys\"}]}").unwrap();
        assert!(document.habits.is_empty());
        assert!(document.schedules.is_empty());
        assert_eq!(document.profile, None);
        assert_eq!(document.items[0].name, "Keys");
        assert!(!document.items[0].carried);
    }

    #[test]
    fn decode_rejects_non_object_documents() {
        assert!(decode_document("[]").is_err());
        assert!(decode_document("").is_err());
        assert!(decode_document("\"habits\"").is_err());
    }

    #[test]
    fn decode_reads_mistyped_collections_as_empty() {
        let document = decode_document("{\"habits\": 3, \"profile\": \"zen\"}").unwrap();
        assert!(document.habits.is_empty());
        assert_eq!(document.profile, None);
    }

    #[test]
    fn encode_uses_expected_top_level_keys() {
        let body = encode_document(&Document::seed()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let keys = value
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys.len(), 4);
        for key in ["habits", "items", "schedules", "profile"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(body.contains("\n  \"habits\""));
    }
}
