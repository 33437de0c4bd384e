//! Tracker document domain model.
//!
//! # Responsibility
//! - Define the aggregate record persisted as one JSON document.
//! - Provide the seed content written on first access.
//! - Validate required text fields for create/replace use-cases.
//!
//! # Invariants
//! - A missing collection key reads as an empty collection, never an error.
//! - A missing, `null` or non-object `profile` reads as `None`.
//! - Record fields never fail to decode; see `model::lenient`.
//! - Unknown keys at the top level and inside habits, items and schedule
//!   entries survive a load/save cycle. `Profile` keeps only `username`.

use crate::model::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Status assigned to every newly created schedule entry.
pub const DEFAULT_SCHEDULE_STATUS: &str = "upcoming";

/// Username stored in the seeded profile.
pub const SEED_USERNAME: &str = "demo";

/// A recurring habit with completion state and streak counter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Habit {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient::counter")]
    pub streak: u32,
    /// Fields written by other tools, e.g. completion bookkeeping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Habit {
    pub fn new(name: impl Into<String>, completed: bool, streak: u32) -> Self {
        Self {
            name: name.into(),
            completed,
            streak,
            extra: Map::new(),
        }
    }
}

/// Something the user wants to have on them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub carried: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Creates a not-yet-carried item after checking `name` is non-empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = require_text("name", Into::<String>::into(name))?;
        Ok(Self::with_state(name, false))
    }

    fn with_state(name: impl Into<String>, carried: bool) -> Self {
        Self {
            name: name.into(),
            carried,
            extra: Map::new(),
        }
    }
}

/// One entry on the schedule.
///
/// `date` and `time` are free-form and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(default = "default_status", deserialize_with = "schedule_status")]
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ScheduleEntry {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: String::new(),
            time: String::new(),
            status: default_status(),
            extra: Map::new(),
        }
    }
}

fn default_status() -> String {
    DEFAULT_SCHEDULE_STATUS.to_string()
}

fn schedule_status<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let status = lenient::text(deserializer)?;
    Ok(if status.is_empty() {
        default_status()
    } else {
        status
    })
}

impl ScheduleEntry {
    /// Creates an `upcoming` entry after checking `title` is non-empty.
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = require_text("title", Into::<String>::into(title))?;
        Ok(Self {
            title,
            date: date.into(),
            time: time.into(),
            ..Self::default()
        })
    }
}

/// Singleton user profile. Replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient::text")]
    pub username: String,
}

impl Profile {
    pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = require_text("username", Into::<String>::into(username))?;
        Ok(Self { username })
    }
}

/// Aggregate persisted state.
///
/// Serialized with keys `habits`, `items`, `schedules`, `profile`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "lenient::records")]
    pub habits: Vec<Habit>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub items: Vec<Item>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub schedules: Vec<ScheduleEntry>,
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile: Option<Profile>,
    /// Top-level keys this model does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// Returns the sample content written the first time a store is opened.
    pub fn seed() -> Self {
        Self {
            habits: vec![
                Habit::new("Exercise", false, 3),
                Habit::new("Meditation", true, 10),
                Habit::new("Reading", false, 1),
            ],
            items: vec![
                Item::with_state("Laptop", true),
                Item::with_state("ID Card", false),
                Item::with_state("Water Bottle", true),
            ],
            schedules: vec![ScheduleEntry {
                title: "Team Meeting".to_string(),
                time: "14:00".to_string(),
                ..ScheduleEntry::default()
            }],
            profile: Some(Profile {
                username: SEED_USERNAME.to_string(),
            }),
            extra: Map::new(),
        }
    }

    /// Names of habits not completed yet, in document order.
    pub fn missed_habits(&self) -> Vec<&str> {
        self.habits
            .iter()
            .filter(|habit| !habit.completed)
            .map(|habit| habit.name.as_str())
            .collect()
    }

    /// Names of items not carried yet, in document order.
    pub fn forgotten_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| !item.carried)
            .map(|item| item.name.as_str())
            .collect()
    }
}

/// A required text field was missing or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
}

impl ValidationError {
    pub fn required(field: &'static str) -> Self {
        Self { field }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is required", self.field)
    }
}

impl Error for ValidationError {}

/// Rejects absent or empty values for a required text field.
///
/// Whitespace-only input is kept as-is; only the empty string is rejected.
pub fn require_text(
    field: &'static str,
    value: impl Into<Option<String>>,
) -> Result<String, ValidationError> {
    match value.into() {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::required(field)),
    }
}
