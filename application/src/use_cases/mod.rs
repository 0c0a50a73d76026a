//! Use cases (application services)

pub mod chat_session;
pub mod dispatch_tool;
pub mod run_turn;
pub(crate) mod shared;
