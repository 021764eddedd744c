use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;
use tracing::{error, info};

use crate::config::BotConfig;
use crate::errors::BotError;
use crate::handlers::discord::BotHandler;
use crate::service::dispatcher::TaskDispatcher;
use crate::service::notification_service::{DiscordSender, MessageSender};
use crate::service::task_service::TickTickClient;

/// Wires the TickTick client and the optional Discord notifier into a dispatcher.
pub fn build_dispatcher(config: &BotConfig) -> Result<TaskDispatcher, BotError> {
    let api = TickTickClient::new(&config.task_api)?;
    let notifier: Option<Arc<dyn MessageSender>> =
        match (&config.dispatcher.notify_target, &config.discord_token) {
            (Some(_), Some(token)) => Some(Arc::new(DiscordSender::new(
                token,
                config.task_api.request_timeout,
            )?)),
            _ => None,
        };
    Ok(TaskDispatcher::new(config.dispatcher.clone(), Arc::new(api), notifier))
}

pub async fn run_bot(config: BotConfig) -> Result<(), BotError> {
    let token = config.require_discord_token()?.to_string();
    let dispatcher = Arc::new(build_dispatcher(&config)?);
    info!(
        project = %config.dispatcher.project_id,
        timezone = %config.dispatcher.timezone,
        notify = config.dispatcher.notify_target.is_some(),
        relay_channel = config.relay_channel.as_deref().unwrap_or("-"),
        "starting task relay"
    );

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(token, intents)
        .event_handler(BotHandler::new(dispatcher, config.relay_channel.clone()))
        .await
        .map_err(|e| BotError::Discord(format!("Error creating Serenity client: {}", e)))?;

    client.start().await.map_err(|why| {
        error!(error = ?why, "client error");
        BotError::Discord(why.to_string())
    })
}
