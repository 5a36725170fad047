//! Shared chat types: resolver responses and conversation turns.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presentation::{render, RenderedResponse};

/// Apology shown when the resolver call itself fails.
pub const FAULT_ANSWER: &str = "Sorry, something went wrong on my end.";

// =============================================================================
// BotResponse
// =============================================================================

/// How well the resolver's answer matched the query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// The query was answered directly from a record.
    Exact,
    /// A student was identified but the question was not specific.
    Partial,
    /// Nothing matched, or the reply is informational.
    None,
    /// Synthesized by the chat surface when the resolver call fails.
    Error,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::Exact => write!(f, "exact"),
            ResponseKind::Partial => write!(f, "partial"),
            ResponseKind::None => write!(f, "none"),
            ResponseKind::Error => write!(f, "error"),
        }
    }
}

/// Structured answer produced once per query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotResponse {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub answer: String,
    /// Self-reported certainty in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Pretty-printed JSON snapshot of the record(s) behind the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl BotResponse {
    pub fn new(kind: ResponseKind, answer: impl Into<String>) -> Self {
        Self {
            kind,
            answer: answer.into(),
            confidence: None,
            evidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    /// The error reply substituted for a failed resolver call.
    pub fn fault() -> Self {
        Self::new(ResponseKind::Error, FAULT_ANSWER)
    }
}

// =============================================================================
// ChatTurn
// =============================================================================

/// Author of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

/// Presentation-ready payload of a turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "body", rename_all = "snake_case")]
pub enum TurnContent {
    /// Text the user submitted, verbatim.
    Text(String),
    /// A rendered bot reply.
    Response(RenderedResponse),
}

/// One entry in the conversation log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: String,
    pub role: Role,
    pub content: TurnContent,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: TurnContent::Text(text.into()),
            created_at: Utc::now(),
        }
    }

    pub fn bot(id: impl Into<String>, response: &BotResponse) -> Self {
        Self {
            id: id.into(),
            role: Role::Bot,
            content: TurnContent::Response(render(response)),
            created_at: Utc::now(),
        }
    }

    /// Rendered reply, if this is a bot turn.
    pub fn response(&self) -> Option<&RenderedResponse> {
        match &self.content {
            TurnContent::Response(r) => Some(r),
            TurnContent::Text(_) => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
