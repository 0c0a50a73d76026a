//! Wire types for the chat completions API
//!
//! Only the fields this adapter reads or writes are modelled; unknown
//! response fields are ignored.

use super::error::{OpenAiError, Result};
use sales_agent_domain::{
    ContentBlock, LlmResponse, Message, Role, StopReason, TokenUsage, ToolCall,
};
use serde::{Deserialize, Serialize};

/// Request body for `POST .../chat/completions`
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: WireFunction,
}

/// `arguments` is a JSON document encoded as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        let tool_calls = message.has_tool_calls().then(|| {
            message
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    call_type: function_type(),
                    function: WireFunction {
                        name: call.tool_name.clone(),
                        arguments: call.arguments_json(),
                    },
                })
                .collect()
        });

        // An assistant message carrying only tool calls sends `content: null`.
        let content = if tool_calls.is_some() && message.content.is_empty() {
            None
        } else {
            Some(message.content.clone())
        };

        Self {
            role: wire_role(message.role).to_string(),
            content,
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    }
}

fn stop_reason(finish_reason: &str) -> StopReason {
    match finish_reason {
        "stop" => StopReason::EndTurn,
        "tool_calls" | "function_call" => StopReason::ToolUse,
        "length" => StopReason::MaxTokens,
        other => StopReason::Other(other.to_string()),
    }
}

impl ChatResponse {
    /// Convert the first choice into a domain response.
    pub fn into_llm_response(self) -> Result<LlmResponse> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or(OpenAiError::NoChoices)?;

        let mut content = Vec::new();
        if let Some(text) = choice.message.content
            && !text.is_empty()
        {
            content.push(ContentBlock::Text(text));
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            content.push(ContentBlock::ToolUse(ToolCall::from_raw_arguments(
                call.id,
                call.function.name,
                &call.function.arguments,
            )));
        }

        Ok(LlmResponse {
            content,
            stop_reason: choice.finish_reason.as_deref().map(stop_reason),
            model: self.model,
            usage: self.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}

/// Best-effort human readable message from an error body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assistant_tool_call_message_serialization() {
        let call = ToolCall::new("call_1", "fetch_sales_data_using_query")
            .with_arg("query", "SELECT 1 LIMIT 20");
        let message = Message::assistant_tool_calls("", vec![call]);

        let value = serde_json::to_value(WireMessage::from(&message)).unwrap();
        assert_eq!(value["role"], "assistant");
        assert!(value["content"].is_null());
        assert_eq!(value["tool_calls"][0]["id"], "call_1");
        assert_eq!(value["tool_calls"][0]["type"], "function");
        assert_eq!(
            value["tool_calls"][0]["function"]["name"],
            "fetch_sales_data_using_query"
        );
        let arguments: serde_json::Value = serde_json::from_str(
            value["tool_calls"][0]["function"]["arguments"].as_str().unwrap(),
        )
        .unwrap();
        assert_eq!(arguments, json!({"query": "SELECT 1 LIMIT 20"}));
        assert!(value.get("tool_call_id").is_none());
    }

    #[test]
    fn test_tool_message_serialization() {
        let value = serde_json::to_value(WireMessage::from(&Message::tool("call_1", "3 rows")))
            .unwrap();
        assert_eq!(
            value,
            json!({"role": "tool", "content": "3 rows", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let request = ChatRequest {
            model: None,
            messages: vec![WireMessage::from(&Message::user("hi"))],
            tools: vec![],
            tool_choice: None,
            max_tokens: 10_240,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
        assert!(value.get("model").is_none());
        assert_eq!(value["max_tokens"], 10_240);
        assert_eq!(value["stream"], false);
    }

    #[test]
    fn test_parse_tool_call_response() {
        let body = json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Let me look at the schema.",
                    "tool_calls": [{
                        "id": "call_a",
                        "type": "function",
                        "function": {"name": "get_database_schema", "arguments": "{\"table\":\"orders\"}"}
                    }, {
                        "id": "call_b",
                        "type": "function",
                        "function": {"name": "get_database_schema", "arguments": ""}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 30, "total_tokens": 150}
        });

        let response: ChatResponse = serde_json::from_value(body).unwrap();
        let response = response.into_llm_response().unwrap();

        assert_eq!(response.text_content(), "Let me look at the schema.");
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(response.model.as_deref(), Some("gpt-4o"));
        assert_eq!(
            response.usage,
            Some(TokenUsage {
                input_tokens: 120,
                output_tokens: 30
            })
        );

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "call_a");
        assert_eq!(calls[0].get_string("table"), Some("orders"));
        assert!(calls[1].arguments.is_empty());
        assert!(calls[1].malformed_arguments.is_none());
    }

    #[test]
    fn test_parse_text_response() {
        let body = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "EUROPE leads with 120000."},
                "finish_reason": "stop"
            }]
        });
        let response: ChatResponse = serde_json::from_value(body).unwrap();
        let response = response.into_llm_response().unwrap();

        assert!(!response.has_tool_calls());
        assert_eq!(response.text_content(), "EUROPE leads with 120000.");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    }

    #[test]
    fn test_malformed_arguments_are_kept() {
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_x",
                        "type": "function",
                        "function": {"name": "fetch_sales_data_using_query", "arguments": "{\"query\":"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let response: ChatResponse = serde_json::from_value(body).unwrap();
        let calls = response.into_llm_response().unwrap().tool_calls();
        assert_eq!(calls[0].malformed_arguments.as_deref(), Some("{\"query\":"));
    }

    #[test]
    fn test_no_choices() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            response.into_llm_response(),
            Err(OpenAiError::NoChoices)
        ));
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Invalid API key");
        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(stop_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            stop_reason("content_filter"),
            StopReason::Other("content_filter".to_string())
        );
    }
}
