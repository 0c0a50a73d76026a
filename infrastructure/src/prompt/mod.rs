//! System prompt loading

mod loader;

pub use loader::SystemPromptLoader;
