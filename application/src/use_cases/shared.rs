//! Shared utilities for use cases.
//!
//! Cancellation checking and the cancellable, timeout-bounded model call
//! used by the turn loop.

use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::run_turn::RunTurnError;
use sales_agent_domain::LlmResponse;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(RunTurnError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunTurnError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunTurnError::Cancelled);
    }
    Ok(())
}

/// Call the model endpoint, bounded by `timeout` and aborted by `token`.
pub(crate) async fn complete_cancellable<G: LlmGateway + ?Sized>(
    gateway: &G,
    request: &CompletionRequest<'_>,
    timeout: Option<Duration>,
    token: &Option<CancellationToken>,
) -> Result<LlmResponse, RunTurnError> {
    check_cancelled(token)?;

    let call = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, gateway.complete(request)).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout),
            },
            None => gateway.complete(request).await,
        }
    };

    let result = match token {
        Some(token) => tokio::select! {
            _ = token.cancelled() => return Err(RunTurnError::Cancelled),
            result = call => result,
        },
        None => call.await,
    };
    result.map_err(RunTurnError::Gateway)
}
