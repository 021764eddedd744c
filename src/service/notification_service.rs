use std::time::Duration;

use serenity::async_trait;
use serenity::http::{Http, HttpBuilder};
use serenity::model::id::ChannelId;

use crate::clients::http::bounded_client;
use crate::errors::BotError;

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), BotError>;
}

pub struct DiscordSender {
    http: Http,
}

impl DiscordSender {
    pub fn new(token: &str, timeout: Duration) -> Result<Self, BotError> {
        let http = HttpBuilder::new(token)
            .client(bounded_client(timeout)?)
            .build();
        Ok(Self { http })
    }
}

pub fn parse_channel_id(channel_id: &str) -> Result<ChannelId, BotError> {
    channel_id
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(ChannelId::new)
        .ok_or_else(|| BotError::NotificationDelivery(format!("Invalid channel id: {}", channel_id)))
}

#[async_trait]
impl MessageSender for DiscordSender {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), BotError> {
        let channel = parse_channel_id(channel_id)?;
        channel
            .say(&self.http, content)
            .await
            .map_err(|e| BotError::NotificationDelivery(format!("Error sending message: {:?}", e)))?;
        Ok(())
    }
}

pub fn confirmation_message(title: &str, due_date: &str) -> String {
    format!("Task added: {}\nDue: {}", title, due_date)
}
