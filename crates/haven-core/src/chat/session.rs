//! In-memory state for one browser session.
//!
//! Two parallel histories are kept: the model-context history sent
//! verbatim to the provider, and the display history used for rendering.
//! With no error paths between the appends they currently move in
//! lockstep, but they are distinct surfaces and the UI only ever sees the
//! display side. Both die with the session; nothing is persisted here.

use chrono::{DateTime, Utc};
use haven_types::llm::Message;
use uuid::Uuid;

/// Transient conversation state for a single session.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    created_at: DateTime<Utc>,
    /// Ordered role/text pairs used as the model's conversation context.
    history: Vec<Message>,
    /// Ordered role/text pairs used for rendering only.
    display: Vec<Message>,
}

impl SessionState {
    /// Create a fresh session with a newly generated opaque id.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            history: Vec::new(),
            display: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Model-context history, in order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Display history, in order.
    pub fn display(&self) -> &[Message] {
        &self.display
    }

    /// Append one completed exchange to both histories.
    ///
    /// Called only after a successful provider reply; a failed turn must
    /// leave both histories untouched.
    pub fn append_exchange(&mut self, prompt: &str, reply: &str) {
        self.history.push(Message::user(prompt));
        self.history.push(Message::assistant(reply));
        self.display.push(Message::user(prompt));
        self.display.push(Message::assistant(reply));
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
