use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text event handed over by the chat transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender_chat_id: String,
    pub sender_name: Option<String>,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(sender_chat_id: &str, text: &str, received_at: DateTime<Utc>) -> Self {
        Self {
            sender_chat_id: sender_chat_id.to_string(),
            sender_name: None,
            text: text.to_string(),
            received_at,
        }
    }

    pub fn with_sender_name(mut self, name: &str) -> Self {
        self.sender_name = Some(name.to_string());
        self
    }
}

/// Body of the task-creation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    pub project_id: String,
    pub due_date: String,
}

/// The subset of the created task we read back from the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTask {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub success: bool,
    pub remote_task_id: Option<String>,
    pub error_detail: Option<String>,
}

impl TaskResult {
    pub fn succeeded(remote_task_id: String) -> Self {
        Self {
            success: true,
            remote_task_id: Some(remote_task_id),
            error_detail: None,
        }
    }

    pub fn failed(error_detail: String) -> Self {
        Self {
            success: false,
            remote_task_id: None,
            error_detail: Some(error_detail),
        }
    }
}
