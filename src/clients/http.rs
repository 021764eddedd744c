use std::time::Duration;

use reqwest::Client;

use crate::errors::BotError;

/// Every outbound call goes through a client with a hard request timeout.
pub fn bounded_client(timeout: Duration) -> Result<Client, BotError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BotError::Config(format!("Failed to build HTTP client: {}", e)))
}
