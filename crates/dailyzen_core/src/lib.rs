//! Core domain logic for DailyZen.
//! This crate owns the tracker document, its storage, and the chat rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, DynDocumentRepository, StorageTarget};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Document, Habit, Item, Profile, ScheduleEntry, ValidationError};
pub use repo::document_repo::{DocumentRepository, RepoError, RepoResult};
pub use repo::file_repo::JsonFileDocumentRepository;
pub use repo::memory_repo::InMemoryDocumentRepository;
pub use repo::sqlite_repo::SqliteDocumentRepository;
pub use service::responder::{Intent, Reply, ReplySource, Responder, ResponseRule};
pub use service::store_service::{
    CorruptPolicy, StorageCorruptError, Store, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
