//! Tool dispatch use case.
//!
//! [`ToolDispatcher::dispatch`] turns one [`ToolCall`] into exactly one
//! [`ToolResult`]. It never fails: unknown tools, invalid arguments, provider
//! errors and provider timeouts all become `error` results that are fed back
//! to the model.

use sales_agent_domain::core::string::{single_line, truncate};
use sales_agent_domain::{
    DefaultToolValidator, ResultLimits, ToolArguments, ToolCall, ToolError, ToolProvider,
    ToolResult, ToolSpec, ToolValidator,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Maximum length of a provider error detail sent back to the model
const MAX_ERROR_DETAIL: usize = 500;

pub struct ToolDispatcher {
    spec: Arc<ToolSpec>,
    provider: Arc<dyn ToolProvider>,
    validator: Arc<dyn ToolValidator>,
    limits: ResultLimits,
    timeout: Option<Duration>,
}

impl ToolDispatcher {
    pub fn new(spec: Arc<ToolSpec>, provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            spec,
            provider,
            validator: Arc::new(DefaultToolValidator),
            limits: ResultLimits::default(),
            timeout: None,
        }
    }

    pub fn with_limits(mut self, limits: ResultLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The registry this dispatcher resolves names against.
    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Dispatch one call. Exactly one provider invocation for a valid call.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let started = Instant::now();
        let result = match self.try_dispatch(call).await {
            Ok(content) => {
                debug!(
                    "Tool '{}' ({}) succeeded: {} bytes",
                    call.tool_name,
                    call.id,
                    content.len()
                );
                ToolResult::success(&call.id, &call.tool_name, content)
            }
            Err(error) => {
                warn!("Tool '{}' ({}) failed: {}", call.tool_name, call.id, error);
                ToolResult::failure(&call.id, &call.tool_name, error)
            }
        };
        result.with_duration(started.elapsed().as_millis() as u64)
    }

    async fn try_dispatch(&self, call: &ToolCall) -> Result<String, ToolError> {
        let definition = self.spec.get(&call.tool_name).ok_or_else(|| {
            let available: Vec<&str> = self.spec.names().collect();
            ToolError::new(
                "NOT_FOUND",
                format!(
                    "Unknown tool: {}. Available tools: {}",
                    call.tool_name,
                    available.join(", ")
                ),
            )
        })?;

        self.validator.validate(call, definition)?;
        let arguments = ToolArguments::from_call(definition.category, call)?;

        let execution = self.provider.execute(&call.tool_name, &arguments);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, execution).await.map_err(|_| {
                ToolError::timeout(format!(
                    "{} did not finish within {}s",
                    call.tool_name,
                    limit.as_secs_f64()
                ))
            })?,
            None => execution.await,
        };

        let output = outcome
            .map_err(|e| ToolError::execution_failed(sanitize(&e.to_string())))?;
        Ok(self.limits.render(&output))
    }
}

/// Single line, length capped.
fn sanitize(detail: &str) -> String {
    truncate(&single_line(detail), MAX_ERROR_DETAIL)
}
