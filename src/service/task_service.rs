use std::time::Duration;

use reqwest::Client;
use serenity::async_trait;

use crate::clients::{http, ticktick_client};
use crate::errors::BotError;
use crate::models::task::{CreatedTask, TaskRequest};

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn create_task(&self, request: &TaskRequest) -> Result<CreatedTask, BotError>;
}

/// Where and how to reach the TickTick Open API.
#[derive(Debug, Clone)]
pub struct TaskApiSettings {
    pub base_url: String,
    pub access_token: String,
    pub request_timeout: Duration,
}

pub struct TickTickClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl TickTickClient {
    pub fn new(settings: &TaskApiSettings) -> Result<Self, BotError> {
        Ok(Self {
            client: http::bounded_client(settings.request_timeout)?,
            base_url: settings.base_url.clone(),
            access_token: settings.access_token.clone(),
        })
    }
}

#[async_trait]
impl TaskApi for TickTickClient {
    async fn create_task(&self, request: &TaskRequest) -> Result<CreatedTask, BotError> {
        ticktick_client::create_ticktick_task(&self.client, &self.base_url, &self.access_token, request)
            .await
    }
}
