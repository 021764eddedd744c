use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::models::task::{InboundMessage, TaskRequest, TaskResult};
use crate::service::deadline;
use crate::service::notification_service::{self, MessageSender};
use crate::service::routing::{self, MessageIntent};
use crate::service::task_service::TaskApi;

pub const START_REPLY: &str = "Hi! Send me the text of a task and I'll add it to TickTick.";

/// Immutable settings shared by every dispatch.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub project_id: String,
    pub timezone: Tz,
    pub notify_target: Option<String>,
    pub prefix_sender: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Start { reply: String },
    Ignored,
    Task { request: TaskRequest, result: TaskResult },
}

impl DispatchOutcome {
    pub fn task_result(&self) -> Option<&TaskResult> {
        match self {
            DispatchOutcome::Task { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// A confirmation echo still in flight on its own task.
pub struct PendingConfirmation {
    handle: JoinHandle<()>,
}

impl PendingConfirmation {
    /// Waits up to `limit` for the echo. Returns false if it was still pending or panicked.
    pub async fn wait(self, limit: Duration) -> bool {
        match timeout(limit, self.handle).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!(error = %err, "confirmation task aborted");
                false
            }
            Err(_) => {
                warn!(limit_ms = limit.as_millis() as u64, "confirmation still pending, giving up");
                false
            }
        }
    }
}

pub struct TaskDispatcher {
    config: Arc<DispatcherConfig>,
    api: Arc<dyn TaskApi>,
    notifier: Option<Arc<dyn MessageSender>>,
}

impl TaskDispatcher {
    pub fn new(
        config: DispatcherConfig,
        api: Arc<dyn TaskApi>,
        notifier: Option<Arc<dyn MessageSender>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            api,
            notifier,
        }
    }

    pub fn build_request(&self, msg: &InboundMessage, title: &str) -> TaskRequest {
        let title = if self.config.prefix_sender {
            routing::prefixed_title(title, msg.sender_name.as_deref())
        } else {
            title.to_string()
        };
        let due = deadline::deadline_in(msg.received_at, &self.config.timezone);
        TaskRequest {
            title,
            project_id: self.config.project_id.clone(),
            due_date: deadline::format_due_date(&due),
        }
    }

    /// Fire-and-forget: any confirmation echo keeps running on its own.
    pub async fn dispatch(&self, msg: InboundMessage) -> DispatchOutcome {
        self.dispatch_tracked(msg).await.0
    }

    /// Like [`dispatch`](Self::dispatch), but hands back the confirmation echo so
    /// short-lived callers can wait for it before the runtime goes away.
    pub async fn dispatch_tracked(
        &self,
        msg: InboundMessage,
    ) -> (DispatchOutcome, Option<PendingConfirmation>) {
        match routing::classify(&msg.text) {
            MessageIntent::Start => (
                DispatchOutcome::Start {
                    reply: START_REPLY.to_string(),
                },
                None,
            ),
            MessageIntent::Ignore => (DispatchOutcome::Ignored, None),
            MessageIntent::CreateTask { title } => {
                let request = self.build_request(&msg, &title);
                let (result, pending) = self.create(&msg, &request).await;
                (DispatchOutcome::Task { request, result }, pending)
            }
        }
    }

    async fn create(
        &self,
        msg: &InboundMessage,
        request: &TaskRequest,
    ) -> (TaskResult, Option<PendingConfirmation>) {
        match self.api.create_task(request).await {
            Ok(created) => {
                info!(
                    task_id = %created.id,
                    chat = %msg.sender_chat_id,
                    due_date = %request.due_date,
                    "task created"
                );
                let pending = self.notify(request);
                (TaskResult::succeeded(created.id), pending)
            }
            Err(err) => {
                warn!(chat = %msg.sender_chat_id, error = %err, "task creation failed");
                (TaskResult::failed(err.to_string()), None)
            }
        }
    }

    fn notify(&self, request: &TaskRequest) -> Option<PendingConfirmation> {
        let (Some(target), Some(notifier)) = (&self.config.notify_target, &self.notifier) else {
            return None;
        };
        let target = target.clone();
        let notifier = notifier.clone();
        let content = notification_service::confirmation_message(&request.title, &request.due_date);
        let handle = tokio::spawn(async move {
            if let Err(err) = notifier.send_message(&target, &content).await {
                warn!(channel = %target, error = %err, "confirmation not delivered");
            }
        });
        Some(PendingConfirmation { handle })
    }
}
