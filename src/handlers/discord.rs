use std::sync::Arc;

use chrono::{DateTime, Utc};
use serenity::all::{Command, CommandDataOptionValue, CommandInteraction, CommandOptionType, Interaction};
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{debug, info, warn};

use crate::handlers::discord_responder::{ChatResponder, SerenityResponder};
use crate::models::task::InboundMessage;
use crate::service::dispatcher::{DispatchOutcome, TaskDispatcher};
use crate::service::routing::{self, START_COMMAND};

pub const TASK_ADDED_REPLY: &str = "Task added ✅";
pub const TASK_FAILED_REPLY: &str =
    "Couldn't add the task. Check the bot configuration and access rights.";
pub const EMPTY_TASK_REPLY: &str = "Missing `text` argument for /task";

pub fn reply_for(outcome: &DispatchOutcome) -> Option<String> {
    match outcome {
        DispatchOutcome::Start { reply } => Some(reply.clone()),
        DispatchOutcome::Ignored => None,
        DispatchOutcome::Task { request, result } if result.success => {
            Some(format!("{}\n{}", TASK_ADDED_REPLY, request.title))
        }
        DispatchOutcome::Task { .. } => Some(TASK_FAILED_REPLY.to_string()),
    }
}

/// Where a channel message came from, as far as relaying is concerned.
#[derive(Debug, Clone, Copy)]
pub struct MessageScope<'a> {
    pub is_direct: bool,
    pub mentions_bot: bool,
    pub channel_id: &'a str,
}

pub struct BotHandler {
    dispatcher: Arc<TaskDispatcher>,
    relay_channel: Option<String>,
}

impl BotHandler {
    pub fn new(dispatcher: Arc<TaskDispatcher>, relay_channel: Option<String>) -> Self {
        BotHandler {
            dispatcher,
            relay_channel,
        }
    }

    /// DMs, mentions of the bot, and the configured relay channel; other guild chatter is left alone.
    pub fn should_relay(&self, scope: &MessageScope<'_>) -> bool {
        scope.is_direct
            || scope.mentions_bot
            || self.relay_channel.as_deref() == Some(scope.channel_id)
    }

    pub async fn handle_channel_message_with<R: ChatResponder + ?Sized>(
        &self,
        responder: &R,
        scope: MessageScope<'_>,
        inbound: InboundMessage,
    ) -> Option<DispatchOutcome> {
        if !self.should_relay(&scope) {
            debug!(channel = scope.channel_id, "message not addressed to the bot");
            return None;
        }
        Some(self.handle_inbound_with(responder, inbound).await)
    }

    pub async fn handle_inbound_with<R: ChatResponder + ?Sized>(
        &self,
        responder: &R,
        inbound: InboundMessage,
    ) -> DispatchOutcome {
        let outcome = self.dispatcher.dispatch(inbound).await;
        if let Some(reply) = reply_for(&outcome) {
            responder.reply(&reply).await;
        }
        outcome
    }

    async fn handle_command(&self, ctx: &Context, command: CommandInteraction) {
        let text = match command.data.name.as_str() {
            "start" => START_COMMAND.to_string(),
            "task" => command
                .data
                .options
                .iter()
                .find(|opt| opt.name == "text")
                .and_then(|opt| match &opt.value {
                    CommandDataOptionValue::String(s) => Some(s.clone()),
                    _ => None,
                })
                .unwrap_or_default(),
            other => {
                debug!(command = other, "ignoring unknown command");
                return;
            }
        };

        if let Err(e) = command.defer(&ctx.http).await {
            warn!(error = ?e, "failed to defer command");
            return;
        }

        let inbound = InboundMessage {
            sender_chat_id: command.channel_id.to_string(),
            sender_name: Some(command.user.name.clone()),
            text,
            received_at: Utc::now(),
        };
        let responder = SerenityResponder::for_command(ctx, &command);
        let outcome = self.handle_inbound_with(&responder, inbound).await;
        if outcome == DispatchOutcome::Ignored {
            responder.reply(EMPTY_TASK_REPLY).await;
        }
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "connected to Discord");

        let commands = [
            CreateCommand::new("start").description("Show how to add tasks"),
            CreateCommand::new("task")
                .description("Add a task due tonight")
                .add_option(
                    CreateCommandOption::new(CommandOptionType::String, "text", "Task title")
                        .required(true),
                ),
        ];
        for builder in commands {
            if let Err(e) = Command::create_global_command(&ctx.http, builder).await {
                warn!(error = ?e, "failed to register slash command");
            }
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let bot_id = ctx.cache.current_user().id;
        let mentions_bot = msg.mentions_user_id(bot_id);
        let channel_id = msg.channel_id.to_string();
        let scope = MessageScope {
            is_direct: msg.guild_id.is_none(),
            mentions_bot,
            channel_id: &channel_id,
        };

        let text = if mentions_bot {
            routing::strip_mention(&msg.content, bot_id.get())
        } else {
            msg.content.clone()
        };
        let received_at =
            DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0).unwrap_or_else(Utc::now);
        let inbound = InboundMessage {
            sender_chat_id: channel_id.clone(),
            sender_name: Some(msg.author.name.clone()),
            text,
            received_at,
        };
        let responder = SerenityResponder::for_message(&ctx, &msg);
        self.handle_channel_message_with(&responder, scope, inbound).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(&ctx, command).await;
        }
    }
}
