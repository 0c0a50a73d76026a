//! Interactive chat module
//!
//! Provides a readline-based chat over a single [`ChatSession`](sales_agent_application::ChatSession).

mod interrupt;
mod repl;

pub use interrupt::ask_interruptible;
pub use repl::{ChatRepl, ReplCommand};
