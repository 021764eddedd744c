use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use taskRelayBot::errors::BotError;
use taskRelayBot::handlers::discord::{BotHandler, MessageScope, TASK_ADDED_REPLY, TASK_FAILED_REPLY};
use taskRelayBot::handlers::discord_responder::ChatResponder;
use taskRelayBot::models::task::{CreatedTask, InboundMessage, TaskRequest};
use taskRelayBot::service::dispatcher::{DispatchOutcome, DispatcherConfig, START_REPLY, TaskDispatcher};
use taskRelayBot::service::task_service::TaskApi;
use tokio::sync::Mutex;

#[derive(Default)]
struct MockResponder {
    replies: Mutex<Vec<String>>,
}

#[serenity::async_trait]
impl ChatResponder for MockResponder {
    async fn reply(&self, content: &str) {
        let mut replies = self.replies.lock().await;
        replies.push(content.to_string());
    }
}

struct ScriptedApi {
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedApi {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: AtomicUsize::new(0),
        }
    }
}

#[serenity::async_trait]
impl TaskApi for ScriptedApi {
    async fn create_task(&self, request: &TaskRequest) -> Result<CreatedTask, BotError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BotError::RemoteCall {
                status: Some(403),
                detail: "forbidden".to_string(),
            });
        }
        Ok(CreatedTask {
            id: "abc".to_string(),
            project_id: None,
            title: Some(request.title.clone()),
        })
    }
}

fn handler_with(api: Arc<ScriptedApi>, relay_channel: Option<&str>) -> BotHandler {
    let config = DispatcherConfig {
        project_id: "inbox".to_string(),
        timezone: chrono_tz::UTC,
        notify_target: None,
        prefix_sender: false,
    };
    let dispatcher = TaskDispatcher::new(config, api, None);
    BotHandler::new(Arc::new(dispatcher), relay_channel.map(str::to_string))
}

fn handler(fail: bool) -> BotHandler {
    handler_with(Arc::new(ScriptedApi::new(fail)), None)
}

fn guild_scope(channel_id: &str) -> MessageScope<'_> {
    MessageScope {
        is_direct: false,
        mentions_bot: false,
        channel_id,
    }
}

#[tokio::test]
async fn start_replies_with_greeting() {
    let responder = MockResponder::default();
    let outcome = handler(false)
        .handle_inbound_with(&responder, InboundMessage::new("123", "/start", Utc::now()))
        .await;

    assert!(matches!(outcome, DispatchOutcome::Start { .. }));
    let replies = responder.replies.lock().await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0], START_REPLY);
}

#[tokio::test]
async fn created_task_is_confirmed() {
    let responder = MockResponder::default();
    handler(false)
        .handle_inbound_with(&responder, InboundMessage::new("123", "water plants", Utc::now()))
        .await;

    let replies = responder.replies.lock().await;
    assert_eq!(
        replies.last().map(String::as_str),
        Some(format!("{}\nwater plants", TASK_ADDED_REPLY).as_str())
    );
}

#[tokio::test]
async fn failed_task_gets_failure_reply() {
    let responder = MockResponder::default();
    let outcome = handler(true)
        .handle_inbound_with(&responder, InboundMessage::new("123", "water plants", Utc::now()))
        .await;

    assert!(!outcome.task_result().unwrap().success);
    let replies = responder.replies.lock().await;
    assert_eq!(replies.last().map(String::as_str), Some(TASK_FAILED_REPLY));
}

#[tokio::test]
async fn blank_message_gets_no_reply() {
    let responder = MockResponder::default();
    let outcome = handler(false)
        .handle_inbound_with(&responder, InboundMessage::new("123", "   ", Utc::now()))
        .await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert!(responder.replies.lock().await.is_empty());
}

#[tokio::test]
async fn guild_chatter_creates_no_task() {
    let api = Arc::new(ScriptedApi::new(false));
    let handler = handler_with(api.clone(), Some("777"));
    let responder = MockResponder::default();

    let outcome = handler
        .handle_channel_message_with(
            &responder,
            guild_scope("123"),
            InboundMessage::new("123", "anyone up for lunch?", Utc::now()),
        )
        .await;

    assert!(outcome.is_none());
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    assert!(responder.replies.lock().await.is_empty());
}

#[tokio::test]
async fn direct_mention_and_relay_channel_are_relayed() {
    let api = Arc::new(ScriptedApi::new(false));
    let handler = handler_with(api.clone(), Some("777"));
    let responder = MockResponder::default();

    let scopes = [
        MessageScope {
            is_direct: true,
            mentions_bot: false,
            channel_id: "1",
        },
        MessageScope {
            is_direct: false,
            mentions_bot: true,
            channel_id: "123",
        },
        guild_scope("777"),
    ];
    for scope in scopes {
        let outcome = handler
            .handle_channel_message_with(
                &responder,
                scope,
                InboundMessage::new(scope.channel_id, "water plants", Utc::now()),
            )
            .await;
        assert!(outcome.unwrap().task_result().unwrap().success);
    }

    assert_eq!(api.calls.load(Ordering::SeqCst), 3);
    assert_eq!(responder.replies.lock().await.len(), 3);
}

#[test]
fn guild_messages_need_mention_without_relay_channel() {
    let handler = handler(false);
    assert!(!handler.should_relay(&guild_scope("777")));
    assert!(handler.should_relay(&MessageScope {
        is_direct: false,
        mentions_bot: true,
        channel_id: "777",
    }));
}
