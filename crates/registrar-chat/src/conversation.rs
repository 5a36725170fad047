//! Conversation state.
//!
//! An ordered, append-only log of turns plus the flag marking that a
//! reply is outstanding. Turn ids are derived from the wall clock and kept
//! strictly increasing so they stay unique within a session.

use chrono::Utc;
use uuid::Uuid;

use crate::types::{BotResponse, ChatTurn, ResponseKind};

/// Opening message of every conversation.
pub const GREETING: &str = "Hello! I am an administrative assistant bot. You can ask me about \
student records, attendance, and marks.\n\n\
For example: 'What was Alice Johnson's attendance on 2024-05-20?'";

/// Id of the greeting turn.
pub const GREETING_ID: &str = "init1";

#[derive(Debug, Clone)]
pub struct ConversationState {
    session_id: Uuid,
    turns: Vec<ChatTurn>,
    awaiting: bool,
    /// Retention bound; `0` means unbounded.
    max_turns: usize,
    last_id_millis: i64,
    /// Bumped on every mutation.
    revision: u64,
}

impl ConversationState {
    /// Create an empty conversation.
    pub fn new(max_turns: usize) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            turns: Vec::new(),
            awaiting: false,
            max_turns,
            last_id_millis: 0,
            revision: 0,
        }
    }

    /// Create a conversation opened by the assistant's greeting.
    pub fn with_greeting(max_turns: usize) -> Self {
        let mut state = Self::new(max_turns);
        state.append(ChatTurn::bot(
            GREETING_ID,
            &BotResponse::new(ResponseKind::None, GREETING),
        ));
        state
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_awaiting(&mut self, awaiting: bool) {
        if self.awaiting != awaiting {
            self.awaiting = awaiting;
            self.revision += 1;
        }
    }

    /// Append the user's submitted text.
    pub fn push_user(&mut self, text: &str) -> ChatTurn {
        let id = self.next_id_millis(0).to_string();
        let turn = ChatTurn::user(id, text);
        self.append(turn.clone());
        turn
    }

    /// Append a reply from the resolver.
    pub fn push_bot(&mut self, response: &BotResponse) -> ChatTurn {
        let id = self.next_id_millis(1).to_string();
        let turn = ChatTurn::bot(id, response);
        self.append(turn.clone());
        turn
    }

    /// Append the apology substituted for a failed resolver call.
    pub fn push_fault(&mut self) -> ChatTurn {
        let id = format!("error-{}", self.next_id_millis(0));
        let turn = ChatTurn::bot(id, &BotResponse::fault());
        self.append(turn.clone());
        turn
    }

    fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
        if self.max_turns > 0 {
            while self.turns.len() > self.max_turns {
                self.turns.remove(0);
            }
        }
        self.revision += 1;
    }

    /// Current epoch milliseconds plus `offset`, bumped past the last id.
    fn next_id_millis(&mut self, offset: i64) -> i64 {
        let candidate = Utc::now().timestamp_millis() + offset;
        let id = candidate.max(self.last_id_millis + 1);
        self.last_id_millis = id;
        id
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::with_greeting(0)
    }
}

// =============================================================================
// Tests
// =============================================================================
