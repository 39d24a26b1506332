use crate::client::LlmClient;
use crate::prompts::{extraction_prompt, EXTRACTOR_SYSTEM};
use crate::protocol::{ChatMessage, ChatRequest};
use async_trait::async_trait;
use skyquery_core::{AirportCode, CoreError, CoreResult, QueryInterpreter, QueryParams};
use std::sync::Arc;
use tracing::{debug, warn};

/// Extracts search parameters with a JSON-mode chat call.
pub struct LlmQueryInterpreter {
    client: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl LlmQueryInterpreter {
    pub fn new(client: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }
}

/// Local models like to wrap JSON in markdown fences.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    match text.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => text,
    }
}

#[async_trait]
impl QueryInterpreter for LlmQueryInterpreter {
    async fn interpret(&self, text: &str, airports: &[AirportCode]) -> CoreResult<QueryParams> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(EXTRACTOR_SYSTEM),
            ChatMessage::user(extraction_prompt(airports, text)),
        ])
        .max_tokens(self.max_tokens)
        .json();

        let reply = self.client.chat(request).await.map_err(|e| {
            warn!("Parameter extraction failed: {}", e);
            CoreError::unparseable(e.to_string())
        })?;

        let params = QueryParams::from_json_str(strip_code_fence(reply.text_content()))?;
        for code in std::iter::once(params.from_entity_id).chain(params.to_entity_id) {
            if !airports.contains(&code) {
                return Err(CoreError::unparseable(format!("{} is not a supported airport", code)));
            }
        }
        debug!(params = ?params, "Extracted query parameters");
        Ok(params)
    }
}
