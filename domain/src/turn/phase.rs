//! Turn phases and round-trip accounting

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Phase of a single user turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Waiting for the model endpoint to respond
    AwaitingModel,
    /// The model requested one or more tool calls
    ToolRequested,
    /// Tool calls are being executed
    Dispatching,
    /// A final answer was committed (terminal)
    Answered,
    /// The turn failed (terminal)
    Aborted,
}

impl TurnPhase {
    pub fn as_str(&self) -> &str {
        match self {
            TurnPhase::AwaitingModel => "awaiting_model",
            TurnPhase::ToolRequested => "tool_requested",
            TurnPhase::Dispatching => "dispatching",
            TurnPhase::Answered => "answered",
            TurnPhase::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Answered | TurnPhase::Aborted)
    }

    pub fn can_transition_to(&self, next: TurnPhase) -> bool {
        use TurnPhase::*;
        match (self, next) {
            (AwaitingModel, ToolRequested) | (AwaitingModel, Answered) => true,
            (ToolRequested, Dispatching) => true,
            (Dispatching, AwaitingModel) => true,
            (from, Aborted) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of one turn through [`TurnPhase`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    phase: TurnPhase,
    round_trips: usize,
    max_round_trips: usize,
}

impl TurnState {
    pub fn new(max_round_trips: usize) -> Self {
        Self {
            phase: TurnPhase::AwaitingModel,
            round_trips: 0,
            max_round_trips,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Completed or in-progress tool round trips
    pub fn round_trips(&self) -> usize {
        self.round_trips
    }

    pub fn max_round_trips(&self) -> usize {
        self.max_round_trips
    }

    /// Whether another round trip fits under the cap.
    pub fn has_round_trips_left(&self) -> bool {
        self.round_trips < self.max_round_trips
    }

    /// Move to `next`, counting a round trip on entry to `Dispatching`.
    pub fn transition(&mut self, next: TurnPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        if next == TurnPhase::Dispatching {
            self.round_trips += 1;
        }
        self.phase = next;
        Ok(())
    }
}
