//! OpenAI-compatible chat completions adapter
//!
//! Implements [`LlmGateway`](sales_agent_application::LlmGateway) over HTTP
//! for both the public OpenAI API and Azure OpenAI deployments.

pub mod error;
pub mod gateway;
pub mod protocol;
