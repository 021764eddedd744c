use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task API call failed{}: {detail}", status_suffix(.status))]
    RemoteCall { status: Option<u16>, detail: String },

    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),

    #[error("Discord client error: {0}")]
    Discord(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" with status {}", s)).unwrap_or_default()
}

impl BotError {
    pub fn remote(detail: impl Into<String>) -> Self {
        BotError::RemoteCall {
            status: None,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::RemoteCall {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }
}
