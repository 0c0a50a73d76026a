//! Run Turn use case.
//!
//! Drives one user turn to completion:
//!
//! ```text
//! AwaitingModel ─(tool calls)─▶ ToolRequested ─▶ Dispatching ─▶ AwaitingModel ...
//!       └─(text)─▶ Answered
//! ```
//!
//! Every model call is bounded by its own timeout and the cancellation
//! token. If a round fails (endpoint error, timeout, cancellation, protocol
//! violation) the conversation is rolled back to its content before that
//! round's model call and the turn is aborted.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::turn_progress::TurnProgressNotifier;
use crate::use_cases::dispatch_tool::ToolDispatcher;
use crate::use_cases::shared::{check_cancelled, complete_cancellable};
use sales_agent_domain::core::string::truncate;
use sales_agent_domain::{
    Conversation, DomainError, Message, Question, ToolCall, ToolResult, TurnPhase, TurnState,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors that abort a turn
#[derive(Error, Debug)]
pub enum RunTurnError {
    #[error("Model endpoint error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Conversation protocol violation: {0}")]
    Protocol(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunTurnError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunTurnError::Cancelled)
    }

    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, RunTurnError::Protocol(_))
    }
}

/// Outcome of a completed turn
#[derive(Debug, Clone, Default)]
pub struct TurnOutput {
    /// Final assistant text (the degraded message when `limit_reached`)
    pub answer: String,
    /// Tool round trips used
    pub round_trips: usize,
    /// The round-trip cap ended the turn
    pub limit_reached: bool,
    /// Every tool result of the turn, in request order
    pub tool_results: Vec<ToolResult>,
    /// Text the model sent alongside its tool calls
    pub interim_text: Vec<String>,
}

pub struct RunTurnUseCase<G: LlmGateway> {
    gateway: Arc<G>,
    dispatcher: Arc<ToolDispatcher>,
    params: ExecutionParams,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> RunTurnUseCase<G> {
    pub fn new(gateway: Arc<G>, dispatcher: Arc<ToolDispatcher>, params: ExecutionParams) -> Self {
        Self {
            gateway,
            dispatcher,
            params,
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn set_cancellation_token(&mut self, token: Option<CancellationToken>) {
        self.cancellation_token = token;
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run one turn for `question` against `conversation`.
    pub async fn execute(
        &self,
        conversation: &mut Conversation,
        question: &Question,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<TurnOutput, RunTurnError> {
        check_cancelled(&self.cancellation_token)?;

        conversation.begin_turn()?;
        conversation.append(Message::user(question.content()))?;
        info!("Turn started: {}", truncate(question.content(), 80));
        self.logger.log(ConversationEvent::new(
            "user_input",
            json!({ "content": question.content() }),
        ));

        let mut state = TurnState::new(self.params.max_round_trips);
        let mut output = TurnOutput::default();
        progress.on_phase_change(state.phase());

        loop {
            let removed = conversation.trim_to_budget(&self.params.context_budget);
            if removed > 0 {
                debug!(
                    "Trimmed {} messages to fit {} tokens",
                    removed,
                    self.params.context_budget.max_tokens()
                );
                progress.on_context_trimmed(removed);
            }

            let checkpoint = conversation.checkpoint();
            match self
                .round(conversation, &mut state, &mut output, progress)
                .await
            {
                Ok(None) => continue,
                Ok(Some(answer)) => {
                    output.answer = answer;
                    output.round_trips = state.round_trips();
                    info!(
                        "Turn answered after {} round trip(s){}",
                        output.round_trips,
                        if output.limit_reached {
                            " (limit reached)"
                        } else {
                            ""
                        }
                    );
                    self.logger.log(ConversationEvent::new(
                        "answer",
                        json!({
                            "content": output.answer,
                            "round_trips": output.round_trips,
                            "limit_reached": output.limit_reached,
                        }),
                    ));
                    return Ok(output);
                }
                Err(e) => {
                    conversation.rollback(checkpoint);
                    if state.transition(TurnPhase::Aborted).is_ok() {
                        progress.on_phase_change(TurnPhase::Aborted);
                    }
                    if e.is_protocol_violation() {
                        error!("Turn aborted: {}", e);
                    } else {
                        warn!("Turn aborted: {}", e);
                    }
                    self.logger.log(ConversationEvent::new(
                        "turn_aborted",
                        json!({ "error": e.to_string(), "round_trips": state.round_trips() }),
                    ));
                    return Err(e);
                }
            }
        }
    }

    /// One model call and, if requested, one dispatch round.
    ///
    /// Returns `Some(answer)` when the turn is answered.
    async fn round(
        &self,
        conversation: &mut Conversation,
        state: &mut TurnState,
        output: &mut TurnOutput,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<Option<String>, RunTurnError> {
        let request_number = state.round_trips() + 1;
        progress.on_model_request(request_number);
        debug!(
            "Model request {} ({} messages, ~{} tokens)",
            request_number,
            conversation.len(),
            conversation.estimated_tokens()
        );

        let response = {
            let request = CompletionRequest {
                messages: conversation.snapshot(),
                tools: self.dispatcher.spec().list(),
                max_output_tokens: self.params.max_output_tokens,
            };
            complete_cancellable(
                self.gateway.as_ref(),
                &request,
                self.params.model_timeout,
                &self.cancellation_token,
            )
            .await?
        };

        let calls = response.tool_calls();
        let text = response.text_content();
        self.logger.log(ConversationEvent::new(
            "model_response",
            json!({
                "request": request_number,
                "model": response.model,
                "stop_reason": response.stop_reason,
                "tool_calls": calls.len(),
                "text_bytes": text.len(),
                "usage": response.usage,
            }),
        ));

        if calls.is_empty() {
            if text.trim().is_empty() {
                return Err(GatewayError::MalformedResponse(
                    "model returned neither text nor tool calls".to_string(),
                )
                .into());
            }
            conversation.append(Message::assistant(text.clone()))?;
            self.transition(state, TurnPhase::Answered, progress)?;
            return Ok(Some(text));
        }

        if !state.has_round_trips_left() {
            let max = state.max_round_trips();
            warn!(
                "Round-trip limit ({}) reached with {} pending tool call(s)",
                max,
                calls.len()
            );
            progress.on_round_trip_limit(max);
            let answer = limit_reached_message(max);
            conversation.append(Message::assistant(answer.clone()))?;
            output.limit_reached = true;
            self.transition(state, TurnPhase::Answered, progress)?;
            return Ok(Some(answer));
        }

        if !text.is_empty() {
            progress.on_assistant_text(&text);
            output.interim_text.push(text.clone());
        }
        conversation.append(Message::assistant_tool_calls(text, calls.clone()))?;
        self.transition(state, TurnPhase::ToolRequested, progress)?;

        check_cancelled(&self.cancellation_token)?;
        self.transition(state, TurnPhase::Dispatching, progress)?;
        debug!(
            "Round trip {}: dispatching {} tool call(s)",
            state.round_trips(),
            calls.len()
        );

        let results = self.dispatch_all(&calls, state.round_trips(), progress).await?;
        for result in results {
            progress.on_tool_result(&result);
            self.logger.log(ConversationEvent::new(
                "tool_result",
                json!({
                    "id": result.tool_call_id,
                    "tool": result.tool_name,
                    "status": result.status,
                    "content": result.content_for_model(),
                    "duration_ms": result.duration_ms,
                }),
            ));
            conversation.append(Message::tool_result(&result))?;
            output.tool_results.push(result);
        }

        self.transition(state, TurnPhase::AwaitingModel, progress)?;
        Ok(None)
    }

    /// Dispatch all calls concurrently; results come back in request order.
    async fn dispatch_all(
        &self,
        calls: &[ToolCall],
        round_trip: usize,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<Vec<ToolResult>, RunTurnError> {
        for call in calls {
            progress.on_tool_call(call);
            self.logger.log(ConversationEvent::new(
                "tool_call",
                json!({
                    "round_trip": round_trip,
                    "id": call.id,
                    "tool": call.tool_name,
                    "arguments": call.arguments_json(),
                }),
            ));
        }

        let all = futures::future::join_all(calls.iter().map(|c| self.dispatcher.dispatch(c)));
        let results = match &self.cancellation_token {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(RunTurnError::Cancelled),
                results = all => results,
            },
            None => all.await,
        };
        Ok(results)
    }

    fn transition(
        &self,
        state: &mut TurnState,
        next: TurnPhase,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<(), RunTurnError> {
        state.transition(next)?;
        progress.on_phase_change(next);
        Ok(())
    }
}

fn limit_reached_message(max_round_trips: usize) -> String {
    format!(
        "I could not finish answering within the limit of {} tool round trips. \
         Please try a more specific question.",
        max_round_trips
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::turn_progress::NoTurnProgress;
    use async_trait::async_trait;
    use sales_agent_domain::tool::entities::{ParamType, ToolCategory, ToolParameter};
    use sales_agent_domain::{
        ContextBudget, LlmResponse, ProviderError, Role, TabularData, ToolArguments,
        ToolDefinition, ToolOutput, ToolProvider, ToolSpec,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test doubles ====================

    enum Step {
        Reply(LlmResponse),
        Fail(GatewayError),
        Stall,
    }

    /// Replays scripted steps; once the script is exhausted it keeps
    /// requesting the schema tool forever.
    struct ScriptedGateway {
        steps: Mutex<VecDeque<Step>>,
        requests: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedGateway {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> Vec<Message> {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest<'_>,
        ) -> Result<LlmResponse, GatewayError> {
            assert_eq!(request.tools.len(), 2);
            let number = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.messages.to_vec());
                requests.len()
            };
            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(Step::Reply(response)) => Ok(response),
                Some(Step::Fail(error)) => Err(error),
                Some(Step::Stall) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(LlmResponse::from_text("too late"))
                }
                None => Ok(LlmResponse::from_tool_calls(vec![ToolCall::new(
                    format!("loop_{}", number),
                    "get_database_schema",
                )])),
            }
        }
    }

    /// Sales data provider keyed on the query text.
    ///
    /// `sleep_ms=N` in a query delays completion by N ms.
    struct SalesProvider {
        completed: Mutex<Vec<String>>,
    }

    impl SalesProvider {
        fn new() -> Self {
            Self {
                completed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolProvider for SalesProvider {
        fn id(&self) -> &str {
            "sales"
        }

        fn display_name(&self) -> &str {
            "Sales"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
            Ok(vec![])
        }

        async fn execute(
            &self,
            _tool_name: &str,
            arguments: &ToolArguments,
        ) -> Result<ToolOutput, ProviderError> {
            let query = match arguments {
                ToolArguments::SchemaLookup(_) => {
                    return Ok(ToolOutput::Text("# Table: sales".to_string()));
                }
                ToolArguments::DataQuery(args) => args.query.clone(),
            };

            if let Some(pos) = query.find("sleep_ms=") {
                let ms: u64 = query[pos + 9..]
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect::<String>()
                    .parse()
                    .unwrap();
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            self.completed.lock().unwrap().push(query.clone());

            if query.starts_with("SELEC ") {
                return Err(ProviderError::ExecutionFailed(
                    "near \"SELEC\": syntax error".to_string(),
                ));
            }
            if query.contains("year = 2022") {
                let table = TabularData::new(vec!["region".into(), "total".into()])
                    .with_row(vec![json!("EUROPE"), json!(120000)])
                    .with_row(vec![json!("ASIA"), json!(95000)]);
                return Ok(ToolOutput::Table(table));
            }
            Ok(ToolOutput::Text(query))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<TurnPhase>>,
        trimmed: Mutex<usize>,
        limit: Mutex<Option<usize>>,
    }

    impl TurnProgressNotifier for RecordingProgress {
        fn on_phase_change(&self, phase: TurnPhase) {
            self.phases.lock().unwrap().push(phase);
        }

        fn on_context_trimmed(&self, removed: usize) {
            *self.trimmed.lock().unwrap() += removed;
        }

        fn on_round_trip_limit(&self, max_round_trips: usize) {
            *self.limit.lock().unwrap() = Some(max_round_trips);
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Helpers ====================

    fn spec() -> Arc<ToolSpec> {
        let spec = ToolSpec::new()
            .with_tool(ToolDefinition::new(
                "get_database_schema",
                "Describe the sales database",
                ToolCategory::SchemaLookup,
            ))
            .unwrap()
            .with_tool(
                ToolDefinition::new(
                    "fetch_sales_data_using_query",
                    "Run a read-only SQL query",
                    ToolCategory::DataQuery,
                )
                .with_parameter(ToolParameter::new("query", "SQL", true).with_type(ParamType::String)),
            )
            .unwrap();
        Arc::new(spec)
    }

    fn use_case(
        gateway: Arc<ScriptedGateway>,
        provider: Arc<SalesProvider>,
        params: ExecutionParams,
    ) -> RunTurnUseCase<ScriptedGateway> {
        let dispatcher = ToolDispatcher::new(spec(), provider)
            .with_limits(params.result_limits)
            .with_timeout(params.tool_timeout);
        RunTurnUseCase::new(gateway, Arc::new(dispatcher), params)
    }

    fn query(id: &str, sql: &str) -> ToolCall {
        ToolCall::new(id, "fetch_sales_data_using_query").with_arg("query", sql)
    }

    fn question(text: &str) -> Question {
        Question::try_new(text).unwrap()
    }

    // ==================== Scenarios ====================

    #[tokio::test]
    async fn test_sales_by_region_scenario() {
        let sql = "SELECT region, SUM(amount) AS total FROM sales WHERE year = 2022 GROUP BY region LIMIT 20";
        let table = "| Region | Total |\n|---|---|\n| EUROPE | 120000 |\n| ASIA | 95000 |";
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_tool_calls(vec![query("call_1", sql)])),
            Step::Reply(LlmResponse::from_text(table)),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway.clone(), provider, ExecutionParams::default());

        let mut conversation = Conversation::with_system_prompt("You are a sales analyst.");
        let output = uc
            .execute(
                &mut conversation,
                &question("What were total sales by region in 2022?"),
                &NoTurnProgress,
            )
            .await
            .unwrap();

        assert_eq!(output.answer, table);
        assert_eq!(output.round_trips, 1);
        assert!(!output.limit_reached);
        assert!(output.tool_results[0].is_success());

        let roles: Vec<Role> = conversation.snapshot().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );

        // The second model call sees the rows
        let second = gateway.request(1);
        let tool_message = second.last().unwrap();
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_message.content.contains("EUROPE"));
        assert!(tool_message.content.contains("120000"));
    }

    #[tokio::test]
    async fn test_syntax_error_then_corrected_query() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_tool_calls(vec![query(
                "call_1",
                "SELEC region FROM sales LIMIT 5",
            )])),
            Step::Reply(LlmResponse::from_tool_calls(vec![query(
                "call_2",
                "SELECT region FROM sales WHERE year = 2022 LIMIT 5",
            )])),
            Step::Reply(LlmResponse::from_text("EUROPE leads.")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let params = ExecutionParams::default().with_max_round_trips(3);
        let uc = use_case(gateway.clone(), provider, params);

        let mut conversation = Conversation::new();
        let output = uc
            .execute(&mut conversation, &question("Sales by region?"), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(output.answer, "EUROPE leads.");
        assert_eq!(output.round_trips, 2);
        assert!(!output.tool_results[0].is_success());
        assert!(output.tool_results[1].is_success());

        let second = gateway.request(1);
        let error_content = &second.last().unwrap().content;
        assert!(error_content.starts_with("Error [EXECUTION_FAILED]"));
        assert!(error_content.contains("syntax error"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tool_timeout_is_fed_back_and_turn_continues() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_tool_calls(vec![query(
                "call_1",
                "SELECT * FROM orders /* sleep_ms=600000 */ LIMIT 20",
            )])),
            Step::Reply(LlmResponse::from_text("The query took too long.")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let params = ExecutionParams::default().with_tool_timeout(Some(Duration::from_secs(2)));
        let uc = use_case(gateway.clone(), provider.clone(), params);
        let progress = RecordingProgress::default();

        let mut conversation = Conversation::new();
        let output = uc
            .execute(&mut conversation, &question("All orders?"), &progress)
            .await
            .unwrap();

        assert_eq!(output.answer, "The query took too long.");
        assert_eq!(output.round_trips, 1);
        assert!(!output.tool_results[0].is_success());
        assert!(provider.completed.lock().unwrap().is_empty());
        assert_eq!(
            progress.phases.lock().unwrap().last(),
            Some(&TurnPhase::Answered)
        );

        let second = gateway.request(1);
        let tool_message = second.last().unwrap();
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_message.content.starts_with("Error [TIMEOUT]"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_timeout_keeps_only_user_message() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Stall]));
        let provider = Arc::new(SalesProvider::new());
        let params = ExecutionParams::default().with_model_timeout(Some(Duration::from_secs(5)));
        let uc = use_case(gateway, provider, params);

        let mut conversation = Conversation::new();
        let err = uc
            .execute(&mut conversation, &question("Sales in 2022?"), &NoTurnProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, RunTurnError::Gateway(GatewayError::Timeout)));
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.snapshot()[0].role, Role::User);
        assert_eq!(conversation.snapshot()[0].content, "Sales in 2022?");
    }

    #[tokio::test]
    async fn test_gateway_failure_after_round_trip_restores_pre_call_content() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_tool_calls(vec![ToolCall::new(
                "call_1",
                "get_database_schema",
            )])),
            Step::Fail(GatewayError::RequestFailed("HTTP 500".into())),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway, provider, ExecutionParams::default());
        let progress = RecordingProgress::default();

        let mut conversation = Conversation::new();
        let err = uc
            .execute(&mut conversation, &question("Schema?"), &progress)
            .await
            .unwrap_err();

        assert!(matches!(err, RunTurnError::Gateway(_)));
        // user + assistant request + tool result; no partial assistant answer
        assert_eq!(conversation.len(), 3);
        assert!(conversation.outstanding().is_empty());
        assert_eq!(
            progress.phases.lock().unwrap().last(),
            Some(&TurnPhase::Aborted)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_appended_in_request_order() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_tool_calls(vec![
                query("call_a", "SELECT 'a' LIMIT 1 -- sleep_ms=300"),
                query("call_b", "SELECT 'b' LIMIT 1 -- sleep_ms=10"),
                query("call_c", "SELECT 'c' LIMIT 1 -- sleep_ms=100"),
            ])),
            Step::Reply(LlmResponse::from_text("done")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway, provider.clone(), ExecutionParams::default());

        let mut conversation = Conversation::new();
        uc.execute(&mut conversation, &question("Three queries"), &NoTurnProgress)
            .await
            .unwrap();

        let completed = provider.completed.lock().unwrap().clone();
        assert!(completed[0].contains("'b'"));
        assert!(completed[1].contains("'c'"));
        assert!(completed[2].contains("'a'"));

        let ids: Vec<&str> = conversation
            .snapshot()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["call_a", "call_b", "call_c"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_returns_to_awaiting_model() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_tool_calls(vec![ToolCall::new(
                "call_1",
                "drop_tables",
            )])),
            Step::Reply(LlmResponse::from_text("Sorry, I cannot do that.")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway, provider, ExecutionParams::default());
        let progress = RecordingProgress::default();

        let mut conversation = Conversation::new();
        let output = uc
            .execute(&mut conversation, &question("Drop it"), &progress)
            .await
            .unwrap();

        assert_eq!(output.tool_results[0].error().unwrap().code, "NOT_FOUND");
        assert_eq!(
            *progress.phases.lock().unwrap(),
            vec![
                TurnPhase::AwaitingModel,
                TurnPhase::ToolRequested,
                TurnPhase::Dispatching,
                TurnPhase::AwaitingModel,
                TurnPhase::Answered,
            ]
        );
    }

    #[tokio::test]
    async fn test_round_trip_cap_gives_degraded_answer() {
        // Empty script: the gateway requests tools forever
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let provider = Arc::new(SalesProvider::new());
        let params = ExecutionParams::default().with_max_round_trips(3);
        let uc = use_case(gateway.clone(), provider, params);
        let progress = RecordingProgress::default();

        let mut conversation = Conversation::new();
        let output = uc
            .execute(&mut conversation, &question("Loop forever"), &progress)
            .await
            .unwrap();

        assert!(output.limit_reached);
        assert_eq!(output.round_trips, 3);
        assert!(output.answer.contains("3 tool round trips"));
        assert_eq!(gateway.request_count(), 4);
        assert_eq!(*progress.limit.lock().unwrap(), Some(3));

        let last = conversation.snapshot().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(!last.has_tool_calls());
        assert!(conversation.outstanding().is_empty());
    }

    #[tokio::test]
    async fn test_interim_text_is_surfaced() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(
                LlmResponse::from_tool_calls(vec![ToolCall::new("call_1", "get_database_schema")])
                    .with_text("Let me check the schema."),
            ),
            Step::Reply(LlmResponse::from_text("There is a sales table.")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway, provider, ExecutionParams::default());

        let mut conversation = Conversation::new();
        let output = uc
            .execute(&mut conversation, &question("Tables?"), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(output.interim_text, vec!["Let me check the schema.".to_string()]);
        assert_eq!(conversation.snapshot()[1].content, "Let me check the schema.");
    }

    #[tokio::test]
    async fn test_duplicate_ids_abort_turn() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Reply(
            LlmResponse::from_tool_calls(vec![
                ToolCall::new("dup", "get_database_schema"),
                ToolCall::new("dup", "get_database_schema"),
            ]),
        )]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway, provider.clone(), ExecutionParams::default());

        let mut conversation = Conversation::new();
        let err = uc
            .execute(&mut conversation, &question("Schema?"), &NoTurnProgress)
            .await
            .unwrap_err();

        assert!(err.is_protocol_violation());
        assert_eq!(conversation.len(), 1);
        assert!(provider.completed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_response_is_endpoint_error() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Reply(
            LlmResponse::from_text("  "),
        )]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway, provider, ExecutionParams::default());

        let mut conversation = Conversation::new();
        let err = uc
            .execute(&mut conversation, &question("Hello"), &NoTurnProgress)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RunTurnError::Gateway(GatewayError::MalformedResponse(_))
        ));
        assert_eq!(conversation.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let provider = Arc::new(SalesProvider::new());
        let token = CancellationToken::new();
        token.cancel();
        let uc = use_case(gateway.clone(), provider, ExecutionParams::default())
            .with_cancellation(token);

        let mut conversation = Conversation::new();
        let err = uc
            .execute(&mut conversation, &question("Hello"), &NoTurnProgress)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(conversation.is_empty());
        assert_eq!(gateway.request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_model_call_rolls_back() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Step::Stall]));
        let provider = Arc::new(SalesProvider::new());
        let token = CancellationToken::new();
        let uc = use_case(
            gateway,
            provider,
            ExecutionParams::default().with_model_timeout(None),
        )
        .with_cancellation(token.clone());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        let mut conversation = Conversation::new();
        let err = uc
            .execute(&mut conversation, &question("Hello"), &NoTurnProgress)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(conversation.len(), 1);
    }

    #[tokio::test]
    async fn test_history_persists_across_turns() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_text("First answer")),
            Step::Reply(LlmResponse::from_text("Second answer")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let uc = use_case(gateway.clone(), provider, ExecutionParams::default());

        let mut conversation = Conversation::with_system_prompt("rules");
        uc.execute(&mut conversation, &question("First"), &NoTurnProgress)
            .await
            .unwrap();
        uc.execute(&mut conversation, &question("Second"), &NoTurnProgress)
            .await
            .unwrap();

        let second = gateway.request(1);
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].content, "First answer");
        assert_eq!(conversation.len(), 5);
    }

    #[tokio::test]
    async fn test_context_budget_trims_previous_turns() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_text("x".repeat(400))),
            Step::Reply(LlmResponse::from_text("short")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let params = ExecutionParams::default().with_context_budget(ContextBudget::new(60));
        let uc = use_case(gateway.clone(), provider, params);
        let progress = RecordingProgress::default();

        let mut conversation = Conversation::with_system_prompt("rules");
        uc.execute(&mut conversation, &question("First"), &progress)
            .await
            .unwrap();
        uc.execute(&mut conversation, &question("Second"), &progress)
            .await
            .unwrap();

        assert_eq!(*progress.trimmed.lock().unwrap(), 2);
        let second = gateway.request(1);
        assert_eq!(second[0].role, Role::System);
        assert_eq!(second[1].content, "Second");
    }

    #[tokio::test]
    async fn test_conversation_log_events() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Step::Reply(LlmResponse::from_tool_calls(vec![ToolCall::new(
                "call_1",
                "get_database_schema",
            )])),
            Step::Reply(LlmResponse::from_text("ok")),
        ]));
        let provider = Arc::new(SalesProvider::new());
        let logger = Arc::new(RecordingLogger::default());
        let uc = use_case(gateway, provider, ExecutionParams::default()).with_logger(logger.clone());

        let mut conversation = Conversation::new();
        uc.execute(&mut conversation, &question("Schema?"), &NoTurnProgress)
            .await
            .unwrap();

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "user_input",
                "model_response",
                "tool_call",
                "tool_result",
                "model_response",
                "answer"
            ]
        );
    }
}
