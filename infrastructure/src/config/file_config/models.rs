//! Model endpoint configuration from TOML (`[model]` section)

use serde::{Deserialize, Serialize};

/// Which flavour of the OpenAI-compatible chat completions API to speak
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// `POST {endpoint}/chat/completions` with a bearer token
    #[default]
    OpenAi,
    /// `POST {endpoint}/openai/deployments/{model}/chat/completions?api-version=...`
    /// with an `api-key` header
    Azure,
}

impl ModelProvider {
    pub fn as_str(&self) -> &str {
        match self {
            ModelProvider::OpenAi => "openai",
            ModelProvider::Azure => "azure",
        }
    }

    fn default_api_key_env(&self) -> &'static str {
        match self {
            ModelProvider::OpenAi => "OPENAI_API_KEY",
            ModelProvider::Azure => "AZURE_OPENAI_API_KEY",
        }
    }
}

/// Raw model endpoint configuration
///
/// # Example
///
/// ```toml
/// [model]
/// provider = "azure"
/// endpoint = "https://contoso.openai.azure.com"
/// model = "gpt-4o"                # deployment name for Azure
/// api_version = "2024-06-01"
/// api_key_env = "AZURE_OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    pub provider: ModelProvider,
    /// Base URL; defaults to the public OpenAI API for `openai`
    pub endpoint: Option<String>,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Model name (Azure: deployment name)
    pub model: String,
    /// Azure `api-version` query parameter
    pub api_version: String,
    pub max_output_tokens: u32,
    /// Timeout in seconds for each model call
    pub timeout_seconds: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            endpoint: None,
            api_key: None,
            api_key_env: None,
            model: "gpt-4o".to_string(),
            api_version: "2024-06-01".to_string(),
            max_output_tokens: 10_240,
            timeout_seconds: 120,
        }
    }
}

impl FileModelConfig {
    /// Endpoint with the provider default applied and trailing `/` removed
    pub fn resolved_endpoint(&self) -> Option<String> {
        let endpoint = match (&self.endpoint, self.provider) {
            (Some(endpoint), _) if !endpoint.trim().is_empty() => endpoint.trim().to_string(),
            (_, ModelProvider::OpenAi) => "https://api.openai.com/v1".to_string(),
            (_, ModelProvider::Azure) => return None,
        };
        Some(endpoint.trim_end_matches('/').to_string())
    }

    pub fn api_key_env_name(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }

    /// `api_key` if set, otherwise the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(self.api_key_env_name()).ok())
            .filter(|k| !k.is_empty())
    }
}
