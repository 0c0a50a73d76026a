//! Turn state machine.
//!
//! ```text
//! AwaitingModel ──▶ ToolRequested ──▶ Dispatching ──┐
//!      ▲                                            │
//!      └────────────────────────────────────────────┘
//! AwaitingModel ──▶ Answered      (any non-terminal) ──▶ Aborted
//! ```

pub mod phase;

pub use phase::{TurnPhase, TurnState};
