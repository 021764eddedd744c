use serenity::all::{CommandInteraction, Message};
use serenity::async_trait;
use serenity::builder::EditInteractionResponse;
use serenity::prelude::Context;
use tracing::warn;

#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn reply(&self, content: &str);
}

/// Replies either in the channel a message came from, or to a deferred slash command.
pub struct SerenityResponder<'a> {
    ctx: &'a Context,
    message: Option<&'a Message>,
    command: Option<&'a CommandInteraction>,
}

impl<'a> SerenityResponder<'a> {
    pub fn for_message(ctx: &'a Context, message: &'a Message) -> Self {
        Self {
            ctx,
            message: Some(message),
            command: None,
        }
    }

    pub fn for_command(ctx: &'a Context, command: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            message: None,
            command: Some(command),
        }
    }
}

#[async_trait]
impl ChatResponder for SerenityResponder<'_> {
    async fn reply(&self, content: &str) {
        if let Some(message) = self.message {
            if let Err(e) = message.channel_id.say(&self.ctx.http, content).await {
                warn!(channel = %message.channel_id, error = ?e, "failed to reply to message");
            }
            return;
        }
        if let Some(command) = self.command {
            if let Err(e) = command
                .edit_response(&self.ctx.http, EditInteractionResponse::new().content(content))
                .await
            {
                warn!(command = %command.data.name, error = ?e, "failed to answer command");
            }
        }
    }
}
