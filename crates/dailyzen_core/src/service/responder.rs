//! Rule-based chat responder.
//!
//! # Responsibility
//! - Classify a free-text message into one `Intent`.
//! - Produce the reply text, reading the store only for rules that need it.
//!
//! # Invariants
//! - Rules are evaluated in list order; the first match wins.
//! - Matching is case-insensitive substring matching on the raw message.
//! - Each call is independent: no conversation state is kept.

use crate::model::document::{Document, ValidationError};
use crate::repo::document_repo::DocumentRepository;
use crate::service::store_service::{Store, StoreResult};
use log::info;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::fmt::{Debug, Formatter};

pub const NOTHING_MISSED_REPLY: &str = "You didn't miss anything yet — nice job!";
pub const TIP_REPLY: &str =
    "Try the Pomodoro technique: 25 minutes focused work, 5 minutes break.";
pub const SCHEDULING_HINT_REPLY: &str =
    "I can add a schedule for you — go to Schedule and use the Add form.";
pub const FALLBACK_REPLY: &str =
    "I'm here to help — ask me \"What did I miss today?\" or request a tip.";

const STATUS_CLAUSE_SEPARATOR: &str = " . ";

static STATUS_REPORT_RE: Lazy<Regex> =
    Lazy::new(|| keyword_regex(&["miss", "missed"]).expect("valid status-report regex"));
static TIP_RE: Lazy<Regex> =
    Lazy::new(|| keyword_regex(&["tip", "suggest"]).expect("valid tip regex"));
static SCHEDULING_HINT_RE: Lazy<Regex> =
    Lazy::new(|| keyword_regex(&["schedule", "meeting"]).expect("valid scheduling regex"));

/// Classified purpose of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    StatusReport,
    Tip,
    SchedulingHint,
    Fallback,
}

impl Intent {
    pub fn label(self) -> &'static str {
        match self {
            Self::StatusReport => "status_report",
            Self::Tip => "tip",
            Self::SchedulingHint => "scheduling_hint",
            Self::Fallback => "fallback",
        }
    }
}

type DocumentReply = Box<dyn Fn(&Document) -> String + Send + Sync>;

/// How a rule builds its reply.
pub enum ReplySource {
    /// Canned text, no store access.
    Fixed(String),
    /// Computed from the current document.
    Document(DocumentReply),
}

impl ReplySource {
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::Fixed(text.into())
    }

    pub fn from_document(build: impl Fn(&Document) -> String + Send + Sync + 'static) -> Self {
        Self::Document(Box::new(build))
    }
}

impl Debug for ReplySource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(text) => f.debug_tuple("Fixed").field(text).finish(),
            Self::Document(_) => f.write_str("Document(..)"),
        }
    }
}

/// One (matcher, reply) pair.
#[derive(Debug)]
pub struct ResponseRule {
    pub intent: Intent,
    matcher: Regex,
    reply: ReplySource,
}

impl ResponseRule {
    pub fn new(intent: Intent, matcher: Regex, reply: ReplySource) -> Self {
        Self {
            intent,
            matcher,
            reply,
        }
    }

    /// Builds a rule matching any of `keywords` case-insensitively.
    pub fn keywords(
        intent: Intent,
        keywords: &[&str],
        reply: ReplySource,
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(intent, keyword_regex(keywords)?, reply))
    }

    pub fn matches(&self, message: &str) -> bool {
        self.matcher.is_match(message)
    }
}

/// Reply produced for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

/// Ordered rule list ending in a fixed fallback reply.
#[derive(Debug)]
pub struct Responder {
    rules: Vec<ResponseRule>,
    fallback: String,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(default_rules(), FALLBACK_REPLY)
    }
}

impl Responder {
    pub fn new(rules: Vec<ResponseRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Appends a rule with the lowest priority (still before the fallback).
    pub fn push_rule(&mut self, rule: ResponseRule) {
        self.rules.push(rule);
    }

    /// Returns the intent of `message` without building a reply.
    ///
    /// # Errors
    /// - `ValidationError` when `message` is empty after trimming.
    pub fn classify(&self, message: &str) -> Result<Intent, ValidationError> {
        Ok(self
            .matching_rule(message)?
            .map_or(Intent::Fallback, |rule| rule.intent))
    }

    /// Answers `message`, loading the document from `store` only when the
    /// matching rule reads it.
    pub fn respond<R: DocumentRepository>(
        &self,
        store: &Store<R>,
        message: &str,
    ) -> StoreResult<Reply> {
        let reply = match self.matching_rule(message)? {
            None => Reply {
                intent: Intent::Fallback,
                text: self.fallback.clone(),
            },
            Some(rule) => {
                let text = match &rule.reply {
                    ReplySource::Fixed(text) => text.clone(),
                    ReplySource::Document(build) => build(&store.load()?),
                };
                Reply {
                    intent: rule.intent,
                    text,
                }
            }
        };
        info!(
            "event=responder_reply module=responder status=ok intent={}",
            reply.intent.label()
        );
        Ok(reply)
    }

    fn matching_rule(&self, message: &str) -> Result<Option<&ResponseRule>, ValidationError> {
        if message.trim().is_empty() {
            return Err(ValidationError::required("message"));
        }
        Ok(self.rules.iter().find(|rule| rule.matches(message)))
    }
}

/// Built-in rules: status report, tip, scheduling hint.
pub fn default_rules() -> Vec<ResponseRule> {
    vec![
        ResponseRule::new(
            Intent::StatusReport,
            STATUS_REPORT_RE.clone(),
            ReplySource::from_document(status_report),
        ),
        ResponseRule::new(Intent::Tip, TIP_RE.clone(), ReplySource::fixed(TIP_REPLY)),
        ResponseRule::new(
            Intent::SchedulingHint,
            SCHEDULING_HINT_RE.clone(),
            ReplySource::fixed(SCHEDULING_HINT_REPLY),
        ),
    ]
}

/// Summarizes incomplete habits and uncarried items.
pub fn status_report(document: &Document) -> String {
    let missed = document.missed_habits();
    let forgotten = document.forgotten_items();

    let mut clauses = Vec::with_capacity(2);
    if !missed.is_empty() {
        clauses.push(format!("Missed habits: {}", missed.join(", ")));
    }
    if !forgotten.is_empty() {
        clauses.push(format!("Forgotten items: {}", forgotten.join(", ")));
    }

    if clauses.is_empty() {
        NOTHING_MISSED_REPLY.to_string()
    } else {
        clauses.join(STATUS_CLAUSE_SEPARATOR)
    }
}

fn keyword_regex(keywords: &[&str]) -> Result<Regex, regex::Error> {
    let pattern = keywords
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::{keyword_regex, status_report, Intent, Responder};
    use crate::model::document::{Document, Habit, Item};

    #[test]
    fn keyword_regex_escapes_metacharacters() {
        let regex = keyword_regex(&["c++", "a.b"]).unwrap();
        assert!(regex.is_match("I like C++"));
        assert!(!regex.is_match("axb"));
    }

    #[test]
    fn classification_follows_priority_order() {
        let responder = Responder::default();
        assert_eq!(
            responder.classify("missed my meeting, any tip?").unwrap(),
            Intent::StatusReport
        );
        assert_eq!(
            responder.classify("Suggest a MEETING slot").unwrap(),
            Intent::Tip
        );
        assert_eq!(
            responder.classify("schedule please").unwrap(),
            Intent::SchedulingHint
        );
        assert_eq!(responder.classify("hello").unwrap(), Intent::Fallback);
        assert!(responder.classify("   ").is_err());
    }

    #[test]
    fn status_report_omits_empty_clauses() {
        let mut document = Document {
            habits: vec![Habit::new("Exercise", false, 0)],
            ..Document::default()
        };
        assert_eq!(status_report(&document), "Missed habits: Exercise");

        document.habits.clear();
        document.items.push(Item::new("Keys").unwrap());
        assert_eq!(status_report(&document), "Forgotten items: Keys");

        document.items[0].carried = true;
        assert_eq!(status_report(&document), super::NOTHING_MISSED_REPLY);
    }

    #[test]
    fn status_report_joins_both_clauses() {
        assert_eq!(
            status_report(&Document::seed()),
            "Missed habits: Exercise, Reading . Forgotten items: ID Card"
        );
    }
}
