use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task as the service and the repositories see it.
///
/// `id` and the timestamps stay `None` until the service stamps them and the
/// repository persists the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of POST and PUT. Every field is optional at parse time so that a
/// missing title surfaces as a validation failure instead of a parse failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(default, with = "super::timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "super::timestamp::option")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: String,
    pub error_code: String,
    #[serde(with = "super::timestamp")]
    pub timestamp: NaiveDateTime,
}
