//! Presentation layer for sales-agent
//!
//! This crate contains CLI definitions, output formatting,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ReplCommand, ask_interruptible};
pub use cli::Cli;
pub use config::ReplConfig;
pub use output::ConsoleFormatter;
pub use progress::{ProgressReporter, SimpleProgress};
