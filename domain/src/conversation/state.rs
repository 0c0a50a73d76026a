//! Conversation state (transcript) for one session.

use std::collections::HashSet;

use super::budget::ContextBudget;
use crate::core::error::DomainError;
use crate::session::entities::{Message, Role};

/// Restore point taken before a model call.
///
/// Only valid for the conversation that produced it, and only while no
/// trimming has happened since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    len: usize,
    turn_start: usize,
    outstanding: Vec<String>,
    seen_ids: HashSet<String>,
}

/// The ordered transcript sent to the model endpoint on every call.
///
/// Leading system messages are pinned: trimming never drops them and
/// [`reset`](Self::reset) keeps them. Tool results are only accepted for
/// requests still outstanding in the current turn.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    pinned: usize,
    /// Index of the first message of the current turn
    turn_start: usize,
    /// Requests issued this turn that have no result yet, in request order
    outstanding: Vec<String>,
    /// Every request id issued this turn
    seen_ids: HashSet<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with pinned system instructions.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
            pinned: 1,
            turn_start: 1,
            ..Self::default()
        }
    }

    /// Append a message, enforcing request/result correlation.
    ///
    /// On rejection the transcript is left untouched.
    pub fn append(&mut self, message: Message) -> Result<(), DomainError> {
        match message.role {
            Role::System => {
                if self.messages.len() != self.pinned {
                    return Err(DomainError::InvalidMessage(
                        "system instructions must precede the conversation".to_string(),
                    ));
                }
                self.messages.push(message);
                self.pinned += 1;
                self.turn_start = self.pinned;
                return Ok(());
            }
            Role::Tool => {
                let id = message.tool_call_id.as_deref().ok_or_else(|| {
                    DomainError::InvalidMessage("tool result without tool_call_id".to_string())
                })?;
                let pos = self
                    .outstanding
                    .iter()
                    .position(|pending| pending == id)
                    .ok_or_else(|| {
                        DomainError::InvalidMessage(format!(
                            "tool result '{}' does not answer an outstanding request",
                            id
                        ))
                    })?;
                if message.has_tool_calls() {
                    return Err(DomainError::InvalidMessage(
                        "tool result cannot request tools".to_string(),
                    ));
                }
                self.outstanding.remove(pos);
            }
            Role::User | Role::Assistant => {
                if let Some(pending) = self.outstanding.first() {
                    return Err(DomainError::InvalidMessage(format!(
                        "{} message while tool call '{}' is unresolved",
                        message.role, pending
                    )));
                }
                if message.has_tool_calls() {
                    if message.role != Role::Assistant {
                        return Err(DomainError::InvalidMessage(
                            "only the assistant can request tools".to_string(),
                        ));
                    }
                    let mut batch = HashSet::new();
                    for call in &message.tool_calls {
                        if self.seen_ids.contains(&call.id) || !batch.insert(call.id.as_str()) {
                            return Err(DomainError::InvalidMessage(format!(
                                "duplicate tool call id '{}' in this turn",
                                call.id
                            )));
                        }
                    }
                    for call in &message.tool_calls {
                        self.seen_ids.insert(call.id.clone());
                        self.outstanding.push(call.id.clone());
                    }
                }
            }
        }
        self.messages.push(message);
        Ok(())
    }

    /// Mark the start of a new user turn.
    pub fn begin_turn(&mut self) -> Result<(), DomainError> {
        if let Some(pending) = self.outstanding.first() {
            return Err(DomainError::InvalidMessage(format!(
                "cannot begin a turn while tool call '{}' is unresolved",
                pending
            )));
        }
        self.seen_ids.clear();
        self.turn_start = self.messages.len();
        Ok(())
    }

    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended since the current turn began.
    pub fn current_turn(&self) -> &[Message] {
        &self.messages[self.turn_start.min(self.messages.len())..]
    }

    /// Request ids still waiting for a result, in request order.
    pub fn outstanding(&self) -> &[String] {
        &self.outstanding
    }

    pub fn pinned_count(&self) -> usize {
        self.pinned
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clear history, keeping the pinned system instructions.
    pub fn reset(&mut self) {
        self.messages.truncate(self.pinned);
        self.turn_start = self.pinned;
        self.outstanding.clear();
        self.seen_ids.clear();
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.messages.len(),
            turn_start: self.turn_start,
            outstanding: self.outstanding.clone(),
            seen_ids: self.seen_ids.clone(),
        }
    }

    /// Restore the transcript to a previous checkpoint.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        let len = checkpoint.len.max(self.pinned);
        self.messages.truncate(len);
        self.turn_start = checkpoint.turn_start.min(self.messages.len());
        self.outstanding = checkpoint.outstanding;
        self.seen_ids = checkpoint.seen_ids;
    }

    pub fn estimated_tokens(&self) -> usize {
        self.messages.iter().map(Message::estimated_tokens).sum()
    }

    /// Drop the oldest non-system messages until the estimate fits `budget`.
    ///
    /// An assistant request is dropped together with its tool results, and
    /// messages of the current turn are never dropped, so the result may
    /// still exceed the budget. Returns the number of messages removed.
    pub fn trim_to_budget(&mut self, budget: &ContextBudget) -> usize {
        let mut removed = 0;
        let mut total = self.estimated_tokens();
        while budget.is_exceeded_by(total) && self.pinned < self.turn_start {
            let mut end = self.pinned + 1;
            while end < self.turn_start && self.messages[end].role == Role::Tool {
                end += 1;
            }
            for message in self.messages.drain(self.pinned..end) {
                total -= message.estimated_tokens();
                removed += 1;
            }
            self.turn_start -= end - self.pinned;
        }
        removed
    }
}
