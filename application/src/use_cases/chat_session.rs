//! Chat session: one conversation plus the turn loop that owns it.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::turn_progress::TurnProgressNotifier;
use crate::use_cases::run_turn::{RunTurnError, RunTurnUseCase, TurnOutput};
use sales_agent_domain::{Conversation, Question, ToolDefinition};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// A single active session.
///
/// Turns run through `&mut self`, so the next question can only be asked
/// once the previous turn has been answered or aborted.
pub struct ChatSession<G: LlmGateway + 'static> {
    conversation: Conversation,
    run_turn: RunTurnUseCase<G>,
}

impl<G: LlmGateway + 'static> ChatSession<G> {
    pub fn new(run_turn: RunTurnUseCase<G>, system_prompt: Option<String>) -> Self {
        let conversation = match system_prompt {
            Some(prompt) if !prompt.trim().is_empty() => Conversation::with_system_prompt(prompt),
            _ => Conversation::new(),
        };
        Self {
            conversation,
            run_turn,
        }
    }

    pub async fn ask(
        &mut self,
        question: &Question,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutput, RunTurnError> {
        self.run_turn
            .execute(&mut self.conversation, question, progress)
            .await
    }

    /// Ask with a fresh cancellation token for this turn only.
    pub async fn ask_cancellable(
        &mut self,
        question: &Question,
        token: CancellationToken,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutput, RunTurnError> {
        self.run_turn.set_cancellation_token(Some(token));
        let result = self.ask(question, progress).await;
        self.run_turn.set_cancellation_token(None);
        result
    }

    /// Session boundary: forget history, keep the system prompt.
    pub fn reset(&mut self) {
        self.conversation.reset();
        info!("Conversation reset");
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        self.run_turn.dispatcher().spec().list()
    }

    pub fn model_name(&self) -> &str {
        self.run_turn.gateway().model_name()
    }
}
