//! Use-case API for web/CLI callers.
//!
//! # Responsibility
//! - Accept loosely-typed request payloads (any field may be absent).
//! - Return JSON envelopes with an `ok` flag and a status class that a web
//!   layer maps onto HTTP codes.
//!
//! # Invariants
//! - Exported functions never panic and never return `Err`; every failure is
//!   folded into an envelope.
//! - Validation failures are `BadRequest`; storage failures are `ServerError`.

use dailyzen_core::{
    AppConfig, DocumentRepository, DynDocumentRepository, RepoError, Responder, Store,
    StoreError,
};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NAME_REQUIRED: &str = "Name required";
pub const TITLE_REQUIRED: &str = "Title required";
pub const USERNAME_REQUIRED: &str = "Username required";
pub const MESSAGE_REQUIRED: &str = "Please send a message.";

/// Outcome class of one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    BadRequest,
    ServerError,
}

impl ApiStatus {
    pub fn http_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::ServerError => 500,
        }
    }
}

/// JSON envelope returned by every API call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    #[serde(skip)]
    pub status: ApiStatus,
    pub ok: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ApiResponse {
    fn success(key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self {
                status: ApiStatus::Ok,
                ok: true,
                fields: Map::from_iter([(key.to_string(), value)]),
            },
            Err(err) => Self::failure(ApiStatus::ServerError, "error", err.to_string()),
        }
    }

    fn failure(status: ApiStatus, key: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            ok: false,
            fields: Map::from_iter([(key.to_string(), Value::String(message.into()))]),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Serializes the envelope as compact JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| "{\"ok\":false,\"error\":\"encode failed\"}".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddItemRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddScheduleRequest {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatMessageRequest {
    pub message: Option<String>,
}

/// Habits, items and schedules in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub habits: Vec<dailyzen_core::Habit>,
    pub items: Vec<dailyzen_core::Item>,
    pub schedules: Vec<dailyzen_core::ScheduleEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PingView {
    pub reply: &'static str,
    pub version: &'static str,
}

/// Store plus responder behind envelope-returning calls.
pub struct Api<R: DocumentRepository> {
    store: Store<R>,
    responder: Responder,
}

impl Api<DynDocumentRepository> {
    /// Opens the store described by `config` with the default chat rules.
    pub fn open(config: &AppConfig) -> Result<Self, RepoError> {
        Ok(Self::new(config.open_store()?))
    }
}

impl<R: DocumentRepository> Api<R> {
    pub fn new(store: Store<R>) -> Self {
        Self::with_responder(store, Responder::default())
    }

    pub fn with_responder(store: Store<R>, responder: Responder) -> Self {
        Self { store, responder }
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    /// Returns `{ok, dashboard: {habits, items, schedules}}`.
    pub fn dashboard(&self) -> ApiResponse {
        match self.store.load() {
            Ok(document) => ApiResponse::success(
                "dashboard",
                DashboardView {
                    habits: document.habits,
                    items: document.items,
                    schedules: document.schedules,
                },
            ),
            Err(err) => store_failure("dashboard", "error", &err),
        }
    }

    /// Returns the stored profile, or `{username: fallback_username}` when
    /// the document has none.
    pub fn profile(&self, fallback_username: &str) -> ApiResponse {
        match self.store.load() {
            Ok(document) => {
                let profile = document.profile.unwrap_or_else(|| dailyzen_core::Profile {
                    username: fallback_username.to_string(),
                });
                ApiResponse::success("profile", profile)
            }
            Err(err) => store_failure("profile", "error", &err),
        }
    }

    pub fn add_item(&self, request: &AddItemRequest) -> ApiResponse {
        let name = request.name.as_deref().unwrap_or_default();
        match self.store.add_item(name) {
            Ok(item) => ApiResponse::success("item", item),
            Err(err) if err.is_validation() => {
                ApiResponse::failure(ApiStatus::BadRequest, "error", NAME_REQUIRED)
            }
            Err(err) => store_failure("add_item", "error", &err),
        }
    }

    pub fn add_schedule(&self, request: &AddScheduleRequest) -> ApiResponse {
        let result = self.store.add_schedule(
            request.title.as_deref().unwrap_or_default(),
            request.date.as_deref().unwrap_or_default(),
            request.time.as_deref().unwrap_or_default(),
        );
        match result {
            Ok(entry) => ApiResponse::success("event", entry),
            Err(err) if err.is_validation() => {
                ApiResponse::failure(ApiStatus::BadRequest, "error", TITLE_REQUIRED)
            }
            Err(err) => store_failure("add_schedule", "error", &err),
        }
    }

    pub fn update_profile(&self, request: &UpdateProfileRequest) -> ApiResponse {
        match self
            .store
            .update_profile(request.username.as_deref().unwrap_or_default())
        {
            Ok(profile) => ApiResponse::success("profile", profile),
            Err(err) if err.is_validation() => {
                ApiResponse::failure(ApiStatus::BadRequest, "error", USERNAME_REQUIRED)
            }
            Err(err) => store_failure("update_profile", "error", &err),
        }
    }

    /// Answers a chat message; failures are reported under `reply`.
    pub fn chat_message(&self, request: &ChatMessageRequest) -> ApiResponse {
        let message = request.message.as_deref().unwrap_or_default();
        match self.responder.respond(&self.store, message) {
            Ok(reply) => ApiResponse::success("reply", reply.text),
            Err(err) if err.is_validation() => {
                ApiResponse::failure(ApiStatus::BadRequest, "reply", MESSAGE_REQUIRED)
            }
            Err(err) => store_failure("chat_message", "reply", &err),
        }
    }
}

/// Returns `{ok, ping: {reply, version}}` without touching storage.
pub fn ping() -> ApiResponse {
    ApiResponse::success(
        "ping",
        PingView {
            reply: dailyzen_core::ping(),
            version: dailyzen_core::core_version(),
        },
    )
}

/// Decodes a JSON request body; malformed or non-object bodies read as an
/// empty request, so absent fields are reported by validation.
pub fn parse_request<T: Default + for<'de> Deserialize<'de>>(body: &str) -> T {
    serde_json::from_str(body).unwrap_or_default()
}

fn store_failure(op: &'static str, key: &str, err: &StoreError) -> ApiResponse {
    let error_code = match err {
        StoreError::Validation(_) => "validation",
        StoreError::Corrupt(_) => "document_corrupt",
        StoreError::Encode(_) => "encode_failed",
        StoreError::Repo(_) => "storage_failed",
    };
    warn!("event=api_call module=api op={op} status=error error_code={error_code}");
    ApiResponse::failure(ApiStatus::ServerError, key, format!("{op} failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{
        parse_request, AddItemRequest, AddScheduleRequest, Api, ApiStatus, ChatMessageRequest,
        UpdateProfileRequest, MESSAGE_REQUIRED, NAME_REQUIRED,
    };
    use dailyzen_core::{CorruptPolicy, InMemoryDocumentRepository, Store};
    use serde_json::json;

    fn api() -> Api<InMemoryDocumentRepository> {
        Api::new(Store::new(InMemoryDocumentRepository::new()))
    }

    #[test]
    fn add_item_returns_created_item() {
        let api = api();
        let response = api.add_item(&AddItemRequest {
            name: Some("Keys".to_string()),
        });

        assert_eq!(response.status, ApiStatus::Ok);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"ok": true, "item": {"name": "Keys", "carried": false}})
        );
    }

    #[test]
    fn missing_fields_are_bad_requests() {
        let api = api();

        let item = api.add_item(&AddItemRequest::default());
        assert_eq!(item.status.http_code(), 400);
        assert_eq!(item.get("error"), Some(&json!(NAME_REQUIRED)));

        let schedule = api.add_schedule(&AddScheduleRequest {
            date: Some("2026-10-20".to_string()),
            ..AddScheduleRequest::default()
        });
        assert_eq!(schedule.status, ApiStatus::BadRequest);

        let profile = api.update_profile(&UpdateProfileRequest {
            username: Some(String::new()),
        });
        assert!(!profile.ok);

        let chat = api.chat_message(&ChatMessageRequest::default());
        assert_eq!(chat.get("reply"), Some(&json!(MESSAGE_REQUIRED)));
    }

    #[test]
    fn add_schedule_defaults_missing_date_and_time() {
        let api = api();
        let response = api.add_schedule(&parse_request(r#"{"title": "Dentist"}"#));

        assert_eq!(
            response.get("event"),
            Some(&json!({"title": "Dentist", "date": "", "time": "", "status": "upcoming"}))
        );
    }

    #[test]
    fn profile_falls_back_when_document_has_none() {
        let api = Api::new(Store::new(InMemoryDocumentRepository::with_body("{}")));
        let response = api.profile("guest");
        assert_eq!(response.get("profile"), Some(&json!({"username": "guest"})));

        api.update_profile(&UpdateProfileRequest {
            username: Some("zen".to_string()),
        });
        assert_eq!(
            api.profile("guest").get("profile"),
            Some(&json!({"username": "zen"}))
        );
    }

    #[test]
    fn dashboard_lists_all_collections() {
        let response = api().dashboard();
        let dashboard = response.get("dashboard").unwrap();
        assert_eq!(dashboard["habits"].as_array().unwrap().len(), 3);
        assert_eq!(dashboard["items"].as_array().unwrap().len(), 3);
        assert_eq!(dashboard["schedules"][0]["title"], "Team Meeting");
    }

    #[test]
    fn chat_message_reports_status() {
        let api = api();
        let response = api.chat_message(&parse_request(r#"{"message": "What did I miss?"}"#));
        assert!(response.ok);
        assert_eq!(
            response.get("reply"),
            Some(&json!(
                "Missed habits: Exercise, Reading . Forgotten items: ID Card"
            ))
        );
    }

    #[test]
    fn surfaced_corruption_is_a_server_error() {
        let store = Store::with_policy(
            InMemoryDocumentRepository::with_body("not json"),
            CorruptPolicy::Surface,
        );
        let response = Api::new(store).dashboard();

        assert_eq!(response.status, ApiStatus::ServerError);
        assert!(response.to_json().contains("\"ok\":false"));
    }

    #[test]
    fn ping_reports_core_linkage() {
        let response = super::ping();
        assert!(response.ok);
        assert_eq!(response.get("ping").unwrap()["reply"], "pong");
    }

    #[test]
    fn parse_request_tolerates_malformed_bodies() {
        let request: AddItemRequest = parse_request("not json");
        assert_eq!(request, AddItemRequest::default());
    }
}
