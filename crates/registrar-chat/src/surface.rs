//! Chat surface: the coordinator between user input, the response source,
//! and the conversation log.
//!
//! The surface is a two-state machine:
//! - Idle -> Waiting (non-blank submission accepted, user turn appended)
//! - Waiting -> Idle (source settled, exactly one bot turn appended)
//!
//! Submissions made while Waiting are rejected rather than queued, so at
//! most one resolver call is ever in flight and bot turns land in
//! submission order.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use registrar_core::config::{ChatConfig, RegistrarConfig};
use registrar_core::records::RecordStore;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::conversation::ConversationState;
use crate::error::ChatError;
use crate::resolver::{QueryResolver, ResponseSource, SimulatedResolver};
use crate::types::{ChatTurn, ResponseKind};

/// Capacity of the notification broadcast channel.
const NOTIFICATION_CAPACITY: usize = 16;

/// Operational state of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceState {
    /// No reply outstanding. Input is enabled.
    Idle,
    /// A reply is outstanding. Input is disabled and a loading indicator shows.
    Waiting,
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceState::Idle => write!(f, "Idle"),
            SurfaceState::Waiting => write!(f, "Waiting"),
        }
    }
}

/// Transient, user-visible alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Alert for a reply the source itself marked as an error.
    pub fn error_reply(answer: &str) -> Self {
        Self {
            title: "Error".to_string(),
            description: answer.to_string(),
        }
    }

    /// Alert for a resolver call that failed outright.
    pub fn unexpected() -> Self {
        Self {
            title: "An unexpected error occurred.".to_string(),
            description: "Please check the console or try again later.".to_string(),
        }
    }
}

/// Snapshot handed to the render path.
#[derive(Debug, Clone)]
pub struct SurfaceView {
    pub turns: Vec<ChatTurn>,
    /// Show the "Typing..." indicator.
    pub loading: bool,
    pub input_enabled: bool,
}

/// State shared with the settlement task.
struct Shared {
    conversation: Mutex<ConversationState>,
    changes: watch::Sender<u64>,
    notifications: broadcast::Sender<Notification>,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, ConversationState>, ChatError> {
        self.conversation
            .lock()
            .map_err(|e| ChatError::StateLock(format!("conversation lock poisoned: {}", e)))
    }

    fn publish(&self, revision: u64) {
        self.changes.send_replace(revision);
    }

    fn notify(&self, notification: Notification) {
        tracing::warn!(
            title = %notification.title,
            description = %notification.description,
            "Surfacing notification"
        );
        // No subscribers is fine: the alert is transient.
        let _ = self.notifications.send(notification);
    }
}

/// Reply outstanding for an accepted submission.
pub struct PendingReply {
    user_turn: ChatTurn,
    handle: JoinHandle<Result<ChatTurn, ChatError>>,
}

impl PendingReply {
    /// The user turn appended when the submission was accepted.
    pub fn user_turn(&self) -> &ChatTurn {
        &self.user_turn
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for settlement and return the appended bot turn.
    ///
    /// Dropping the handle instead does not cancel the reply; the turn is
    /// still appended when the source settles.
    pub async fn settled(self) -> Result<ChatTurn, ChatError> {
        self.handle
            .await
            .map_err(|e| ChatError::ResolverFault(format!("settlement task failed: {}", e)))?
    }
}

/// Coordinates submissions, the response source, and the conversation.
pub struct ChatSurface {
    source: Arc<dyn ResponseSource>,
    shared: Arc<Shared>,
    input: Mutex<String>,
}

impl ChatSurface {
    /// Create a surface over an arbitrary response source.
    pub fn new(source: Arc<dyn ResponseSource>, config: &ChatConfig) -> Self {
        let conversation = if config.greeting {
            ConversationState::with_greeting(config.max_turns)
        } else {
            ConversationState::new(config.max_turns)
        };
        let (changes, _) = watch::channel(conversation.revision());
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        tracing::debug!(session_id = %conversation.session_id(), "Chat session opened");

        Self {
            source,
            shared: Arc::new(Shared {
                conversation: Mutex::new(conversation),
                changes,
                notifications,
            }),
            input: Mutex::new(String::new()),
        }
    }

    /// Create a surface backed by the simulated resolver over the seeded roster.
    pub fn from_config(config: &RegistrarConfig) -> Result<Self, ChatError> {
        config.validate()?;
        let resolver = QueryResolver::new(RecordStore::seeded());
        let source = SimulatedResolver::new(resolver, &config.resolver);
        Ok(Self::new(Arc::new(source), &config.chat))
    }

    pub fn session_id(&self) -> Result<Uuid, ChatError> {
        Ok(self.shared.lock()?.session_id())
    }

    pub fn state(&self) -> Result<SurfaceState, ChatError> {
        let awaiting = self.shared.lock()?.awaiting();
        Ok(if awaiting {
            SurfaceState::Waiting
        } else {
            SurfaceState::Idle
        })
    }

    /// Snapshot of the turn log and indicators.
    pub fn view(&self) -> Result<SurfaceView, ChatError> {
        let conversation = self.shared.lock()?;
        Ok(SurfaceView {
            turns: conversation.turns().to_vec(),
            loading: conversation.awaiting(),
            input_enabled: !conversation.awaiting(),
        })
    }

    /// Receiver that ticks on every conversation change.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }

    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.shared.notifications.subscribe()
    }

    pub fn input(&self) -> String {
        self.input.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Replace the input buffer. Ignored (returns `false`) while Waiting.
    pub fn set_input(&self, text: &str) -> bool {
        if !matches!(self.state(), Ok(SurfaceState::Idle)) {
            return false;
        }
        match self.input.lock() {
            Ok(mut buf) => {
                *buf = text.to_string();
                true
            }
            Err(_) => false,
        }
    }

    /// Submit the current input buffer.
    pub fn submit_input(&self) -> Result<PendingReply, ChatError> {
        let text = self.input();
        self.submit(&text)
    }

    /// Submit `text` as the user's next turn.
    ///
    /// On acceptance the user turn is appended before this returns, the
    /// input buffer is cleared, and the source is invoked on a spawned task.
    /// Must be called from within a tokio runtime.
    ///
    /// Blank text is rejected with [`ChatError::EmptyMessage`] and text
    /// submitted while a reply is outstanding with [`ChatError::Busy`];
    /// neither touches the conversation.
    pub fn submit(&self, text: &str) -> Result<PendingReply, ChatError> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank submission");
            return Err(ChatError::EmptyMessage);
        }

        let (session_id, user_turn, revision) = {
            let mut conversation = self.shared.lock()?;
            if conversation.awaiting() {
                tracing::debug!("Rejecting submission while a reply is pending");
                return Err(ChatError::Busy);
            }
            let turn = conversation.push_user(text);
            conversation.set_awaiting(true);
            (conversation.session_id(), turn, conversation.revision())
        };

        if let Ok(mut buf) = self.input.lock() {
            buf.clear();
        }
        self.shared.publish(revision);
        tracing::info!(%session_id, turn_id = %user_turn.id, "User turn appended");

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let query = text.to_string();
        let handle = tokio::spawn(settle(source, shared, session_id, query));

        Ok(PendingReply { user_turn, handle })
    }
}

/// Await the source and fold its outcome into the conversation.
async fn settle(
    source: Arc<dyn ResponseSource>,
    shared: Arc<Shared>,
    session_id: Uuid,
    query: String,
) -> Result<ChatTurn, ChatError> {
    // A separate task so a panicking source settles as a fault.
    let outcome = tokio::spawn(async move { source.respond(&query).await }).await;

    let (turn, notification, revision) = {
        let mut conversation = shared.lock()?;
        let (turn, notification) = match outcome {
            Ok(Ok(response)) => {
                let notification = (response.kind == ResponseKind::Error)
                    .then(|| Notification::error_reply(&response.answer));
                (conversation.push_bot(&response), notification)
            }
            Ok(Err(e)) => {
                tracing::error!(%session_id, error = %e, "Response source failed");
                (conversation.push_fault(), Some(Notification::unexpected()))
            }
            Err(e) => {
                tracing::error!(%session_id, error = %e, "Response source task aborted");
                (conversation.push_fault(), Some(Notification::unexpected()))
            }
        };
        conversation.set_awaiting(false);
        (turn, notification, conversation.revision())
    };

    shared.publish(revision);
    if let Some(n) = notification {
        shared.notify(n);
    }
    if let Some(rendered) = turn.response() {
        tracing::info!(%session_id, turn_id = %turn.id, kind = %rendered.kind, "Bot turn appended");
    }
    Ok(turn)
}

// =============================================================================
// Tests
// =============================================================================
