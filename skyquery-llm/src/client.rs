use crate::protocol::{ChatMessage, ChatRequest};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM transport error: {0}")]
    Transport(String),
    #[error("LLM returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("LLM response could not be decoded: {0}")]
    Decode(String),
    #[error("LLM response had no choices")]
    NoChoices,
}

impl From<LlmError> for skyquery_core::CoreError {
    fn from(err: LlmError) -> Self {
        skyquery_core::CoreError::Llm(err.to_string())
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatMessage, LlmError>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// `/chat/completions` client. Works against OpenAI, Ollama's `/v1` and
/// other servers speaking the same protocol.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompatClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if request.json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }
        if !request.tools.is_empty() {
            let tools: Vec<Value> = request
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters
                        }
                    })
                })
                .collect();
            body["tools"] = json!(tools);
        }
        body
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatMessage, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.http.post(&url).json(&self.body(&request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        debug!(model = %self.model, messages = request.messages.len(), "LLM request");
        let response = builder
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM returned {}", status);
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;
        let choice = completion.choices.into_iter().next().ok_or(LlmError::NoChoices)?;
        debug!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            tool_calls = choice.message.tool_calls.len(),
            "LLM response"
        );
        Ok(choice.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Role;
    use skyquery_core::ToolCommand;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, key: Option<&str>) -> OpenAiCompatClient {
        OpenAiCompatClient::new(
            format!("{}/v1/", server.uri()),
            key.map(str::to_string),
            "gpt-4-turbo",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn reply(message: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": message, "finish_reason": "stop"}]
        }))
    }

    #[tokio::test]
    async fn test_json_mode_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4-turbo",
                "max_tokens": 100,
                "response_format": {"type": "json_object"},
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(reply(json!({"role": "assistant", "content": "{\"fromEntityId\":\"BOM\"}"})))
            .expect(1)
            .mount(&server)
            .await;

        let message = client(&server, Some("sk-test"))
            .chat(ChatRequest::new(vec![ChatMessage::user("hi")]).max_tokens(100).json())
            .await
            .unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text_content(), "{\"fromEntityId\":\"BOM\"}");
    }

    #[tokio::test]
    async fn test_tools_are_declared_and_calls_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "tools": [{"type": "function", "function": {"name": "one_way_flight"}}]
            })))
            .respond_with(reply(json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_9",
                    "type": "function",
                    "function": {"name": "one_way_flight", "arguments": "{\"fromEntityId\":\"DEL\"}"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let message = client(&server, None)
            .chat(ChatRequest::new(vec![ChatMessage::user("flights")]).tools(ToolCommand::definitions()))
            .await
            .unwrap();
        assert_eq!(message.tool_calls.len(), 1);
        assert_eq!(message.tool_calls[0].id, "call_9");
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let err = client(&server, Some("bad"))
            .chat(ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Status { status: 401, ref body } if body == "invalid api key"));
    }

    #[tokio::test]
    async fn test_empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server, None)
            .chat(ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NoChoices));
    }
}
