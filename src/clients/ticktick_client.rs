use reqwest::Client;
use tracing::{debug, error};

use crate::errors::BotError;
use crate::models::task::{CreatedTask, TaskRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.ticktick.com";

const CREATE_TASK_PATH: &str = "/open/v1/task";

pub fn create_task_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CREATE_TASK_PATH)
}

pub async fn create_ticktick_task(
    client: &Client,
    base_url: &str,
    access_token: &str,
    request: &TaskRequest,
) -> Result<CreatedTask, BotError> {
    let url = create_task_url(base_url);
    debug!(%url, title = %request.title, due_date = %request.due_date, "creating task");

    let response = client
        .post(&url)
        .bearer_auth(access_token)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        error!(status = status.as_u16(), body = %text, "TickTick API error");
        return Err(BotError::RemoteCall {
            status: Some(status.as_u16()),
            detail: text,
        });
    }

    serde_json::from_str::<CreatedTask>(&text).map_err(|e| {
        BotError::remote(format!("Failed to parse task response: {}\nRaw body: {}", e, text))
    })
}
