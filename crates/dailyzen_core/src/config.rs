//! Process configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve where the document lives and how corruption is handled.
//! - Resolve logging level/directory for `init_logging`.
//! - Build a ready-to-use store from the resolved settings.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Set-but-invalid variables are errors, never silently ignored.

use crate::logging::{default_log_level, normalize_level};
use crate::repo::document_repo::{DocumentRepository, RepoResult};
use crate::repo::file_repo::JsonFileDocumentRepository;
use crate::repo::sqlite_repo::SqliteDocumentRepository;
use crate::service::store_service::{CorruptPolicy, Store};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DATA_FILE: &str = "DAILYZEN_DATA_FILE";
pub const ENV_DATABASE_PATH: &str = "DAILYZEN_DATABASE_PATH";
pub const ENV_LOG_LEVEL: &str = "DAILYZEN_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DAILYZEN_LOG_DIR";
pub const ENV_CORRUPT_POLICY: &str = "DAILYZEN_CORRUPT_POLICY";

const DEFAULT_DATA_FILE: &str = "data_store.json";

/// Repository shared by callers that pick the backend at runtime.
pub type DynDocumentRepository = Box<dyn DocumentRepository + Send + Sync>;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} `{}`; expected {}",
            self.variable, self.value, self.expected
        )
    }
}

impl Error for ConfigError {}

/// Where the document is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    JsonFile(PathBuf),
    Sqlite(PathBuf),
}

/// Resolved process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageTarget,
    pub corrupt_policy: CorruptPolicy,
    pub log_level: &'static str,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageTarget::JsonFile(PathBuf::from(DEFAULT_DATA_FILE)),
            corrupt_policy: CorruptPolicy::default(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps variable names to values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DATA_FILE) {
            config.storage = StorageTarget::JsonFile(PathBuf::from(path));
        }
        // SQLite wins when both are set.
        if let Some(path) = read(ENV_DATABASE_PATH) {
            config.storage = StorageTarget::Sqlite(PathBuf::from(path));
        }
        if let Some(value) = read(ENV_CORRUPT_POLICY) {
            config.corrupt_policy = CorruptPolicy::parse(&value).ok_or(ConfigError {
                variable: ENV_CORRUPT_POLICY,
                value,
                expected: "fail_open|surface",
            })?;
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&value).map_err(|_| ConfigError {
                variable: ENV_LOG_LEVEL,
                value,
                expected: "trace|debug|info|warn|error",
            })?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);

        Ok(config)
    }

    /// Opens the configured repository and wraps it in a store.
    pub fn open_store(&self) -> RepoResult<Store<DynDocumentRepository>> {
        let repo: DynDocumentRepository = match &self.storage {
            StorageTarget::JsonFile(path) => Box::new(JsonFileDocumentRepository::new(path)),
            StorageTarget::Sqlite(path) => Box::new(SqliteDocumentRepository::open(path)?),
        };
        Ok(Store::with_policy(repo, self.corrupt_policy))
    }
}
