//! OpenAI-compatible LLM Gateway implementation

use super::error::{OpenAiError, Result};
use super::protocol::{ChatRequest, ChatResponse, WireMessage, error_message};
use crate::config::{FileModelConfig, ModelProvider};
use crate::tools::JsonSchemaToolConverter;
use async_trait::async_trait;
use sales_agent_application::{CompletionRequest, GatewayError, LlmGateway, ToolSchemaPort};
use sales_agent_domain::LlmResponse;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How credentials are attached to each request
#[derive(Debug, Clone)]
enum Auth {
    Bearer(String),
    ApiKeyHeader(String),
}

/// LLM Gateway for the OpenAI and Azure OpenAI chat completions APIs
pub struct OpenAiGateway {
    client: reqwest::Client,
    url: String,
    auth: Auth,
    model: String,
    provider: ModelProvider,
    schema: Arc<dyn ToolSchemaPort>,
}

impl OpenAiGateway {
    /// Build a gateway from the `[model]` configuration.
    ///
    /// The API key is resolved once, here.
    pub fn new(config: &FileModelConfig) -> Result<Self> {
        let endpoint = config
            .resolved_endpoint()
            .ok_or_else(|| OpenAiError::MissingEndpoint(config.provider.as_str().to_string()))?;
        let api_key = config
            .resolve_api_key()
            .ok_or_else(|| OpenAiError::MissingApiKey(config.api_key_env_name().to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let gateway = Self::with_client(client, config, &endpoint, api_key);
        info!(
            "OpenAiGateway initialized ({} model '{}' at {})",
            gateway.provider.as_str(),
            gateway.model,
            endpoint
        );
        Ok(gateway)
    }

    /// Build a gateway around an existing client
    pub fn with_client(
        client: reqwest::Client,
        config: &FileModelConfig,
        endpoint: &str,
        api_key: String,
    ) -> Self {
        let endpoint = endpoint.trim_end_matches('/');
        let (url, auth) = match config.provider {
            ModelProvider::OpenAi => (
                format!("{}/chat/completions", endpoint),
                Auth::Bearer(api_key),
            ),
            ModelProvider::Azure => (
                format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    endpoint, config.model, config.api_version
                ),
                Auth::ApiKeyHeader(api_key),
            ),
        };

        Self {
            client,
            url,
            auth,
            model: config.model.clone(),
            provider: config.provider,
            schema: Arc::new(JsonSchemaToolConverter),
        }
    }

    /// Replace the tool schema converter
    pub fn with_schema(mut self, schema: Arc<dyn ToolSchemaPort>) -> Self {
        self.schema = schema;
        self
    }

    /// Full URL requests are posted to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request(&self, request: &CompletionRequest<'_>) -> ChatRequest {
        let tools = self.schema.tools_schema(request.tools);
        let tool_choice = (!tools.is_empty()).then_some("auto");
        ChatRequest {
            // Azure routes by deployment in the URL.
            model: match self.provider {
                ModelProvider::OpenAi => Some(self.model.clone()),
                ModelProvider::Azure => None,
            },
            messages: request.messages.iter().map(WireMessage::from).collect(),
            tools,
            tool_choice,
            max_tokens: request.max_output_tokens,
            stream: false,
        }
    }

    async fn send(&self, body: &ChatRequest) -> Result<ChatResponse> {
        let builder = self.client.post(&self.url).json(body);
        let builder = match &self.auth {
            Auth::Bearer(key) => builder.bearer_auth(key),
            Auth::ApiKeyHeader(key) => builder.header("api-key", key),
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| OpenAiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> std::result::Result<LlmResponse, GatewayError> {
        let body = self.build_request(request);
        debug!(
            "POST {} ({} messages, {} tools)",
            self.url,
            body.messages.len(),
            body.tools.len()
        );

        let response = self.send(&body).await?;
        let response = response.into_llm_response()?;
        if let Some(usage) = response.usage {
            debug!(
                "Token usage: {} in, {} out",
                usage.input_tokens, usage.output_tokens
            );
        }
        Ok(response)
    }
}
