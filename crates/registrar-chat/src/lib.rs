//! Conversational interface for Registrar.
//!
//! Provides the keyword resolver over the student roster, response
//! presentation, the append-only conversation log, and the chat surface
//! that serializes submissions against the asynchronous resolver.

pub mod conversation;
pub mod error;
pub mod presentation;
pub mod resolver;
pub mod surface;
pub mod types;

pub use conversation::ConversationState;
pub use error::ChatError;
pub use presentation::{render, ConfidenceBadge, ConfidenceTier, EvidencePanel, RenderedResponse};
pub use resolver::{resolve, QueryResolver, ResponseSource, SimulatedResolver};
pub use surface::{ChatSurface, Notification, PendingReply, SurfaceState, SurfaceView};
pub use types::{BotResponse, ChatTurn, ResponseKind, Role, TurnContent};
