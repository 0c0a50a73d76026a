//! Ctrl-C handling for a running turn

use sales_agent_application::{
    ChatSession, LlmGateway, RunTurnError, TurnOutput, TurnProgressNotifier,
};
use sales_agent_domain::Question;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Ask a question; Ctrl-C while the turn runs aborts it and rolls the
/// conversation back.
pub async fn ask_interruptible<G: LlmGateway + 'static>(
    session: &mut ChatSession<G>,
    question: &Question,
    progress: &dyn TurnProgressNotifier,
) -> Result<TurnOutput, RunTurnError> {
    let token = CancellationToken::new();
    let watcher = {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupt received, cancelling turn");
                token.cancel();
            }
        })
    };

    let result = session.ask_cancellable(question, token, progress).await;
    watcher.abort();
    result
}
