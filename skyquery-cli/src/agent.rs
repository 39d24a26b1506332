use crate::turn::{FlightSearch, TurnHandler};
use async_trait::async_trait;
use skyquery_core::presentation::render_summary_prompt;
use skyquery_core::{CoreError, CoreResult, ToolCommand};
use skyquery_llm::prompts::booking_agent_system;
use skyquery_llm::{ChatMessage, ChatRequest, LlmClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Function-calling chatbot that keeps the whole conversation.
pub struct ToolAgent {
    client: Arc<dyn LlmClient>,
    search: FlightSearch,
    transcript: Vec<ChatMessage>,
    max_tokens: Option<u32>,
}

impl ToolAgent {
    pub fn new(client: Arc<dyn LlmClient>, search: FlightSearch, carrier: &str) -> Self {
        Self {
            client,
            search,
            transcript: vec![ChatMessage::system(booking_agent_system(carrier))],
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    async fn complete(&self) -> CoreResult<ChatMessage> {
        let mut request = ChatRequest::new(self.transcript.clone()).tools(ToolCommand::definitions());
        if let Some(max_tokens) = self.max_tokens {
            request = request.max_tokens(max_tokens);
        }
        Ok(self.client.chat(request).await?)
    }

    async fn execute(&self, command: ToolCommand) -> CoreResult<String> {
        info!(tool = command.name(), "Running tool");
        match command {
            ToolCommand::OneWayFlight(params) => {
                let result = self.search.run(&params).await?;
                render_summary_prompt(&result).map_err(|e| CoreError::Llm(e.to_string()))
            }
        }
    }

    async fn run_turn(&mut self, input: &str) -> CoreResult<String> {
        self.transcript.push(ChatMessage::user(input));
        let reply = self.complete().await?;
        self.transcript.push(reply.clone());

        if reply.tool_calls.is_empty() {
            return Ok(reply.text_content().to_string());
        }

        for call in &reply.tool_calls {
            debug!(id = %call.id, name = %call.function.name, "Model requested a tool");
            let command = ToolCommand::parse(&call.function.name, &call.function.arguments)?;
            let output = self.execute(command).await?;
            self.transcript.push(ChatMessage::tool(call.id.clone(), output));
        }

        let answer = self.complete().await?;
        let text = answer.text_content().to_string();
        if text.is_empty() {
            return Err(CoreError::Llm("no reply after tool output".to_string()));
        }
        self.transcript.push(answer);
        Ok(text)
    }
}

#[async_trait]
impl TurnHandler for ToolAgent {
    async fn handle(&mut self, input: &str) -> CoreResult<String> {
        let checkpoint = self.transcript.len();
        let outcome = self.run_turn(input).await;
        if let Err(e) = &outcome {
            // A half-finished tool exchange would be rejected on the next request.
            warn!("Turn failed, dropping it from the transcript: {}", e);
            self.transcript.truncate(checkpoint);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use skyquery_core::{AirportCode, FlightProvider, Normalizer, ProviderResponse, QueryParams};
    use skyquery_llm::{FunctionCall, LlmError, Role, ToolCall};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Plays back scripted replies and records every request.
    struct ScriptedClient {
        replies: Mutex<VecDeque<ChatMessage>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<ChatMessage>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn chat(&self, request: ChatRequest) -> Result<ChatMessage, LlmError> {
            self.requests.lock().unwrap().push(request);
            self.replies.lock().unwrap().pop_front().ok_or(LlmError::NoChoices)
        }
    }

    struct MonthProvider {
        seen: Mutex<Vec<QueryParams>>,
    }

    #[async_trait]
    impl FlightProvider for MonthProvider {
        async fn search_one_way(&self, params: &QueryParams) -> CoreResult<ProviderResponse> {
            self.seen.lock().unwrap().push(params.clone());
            let body = json!({
                "data": { "flightQuotes": { "results": [{
                    "content": {
                        "price": "₹3,200",
                        "direct": true,
                        "outboundLeg": {
                            "originAirport": { "name": "Mumbai" },
                            "destinationAirport": { "name": "Delhi" },
                            "localDepartureDate": "2024-08-03",
                            "localDepartureDateLabel": "Aug 3"
                        }
                    }
                }]}}
            });
            Ok(ProviderResponse { status: 200, raw: body.to_string(), body })
        }
    }

    fn tool_call(arguments: Value) -> ChatMessage {
        ChatMessage {
            role: Role::Assistant,
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_1".to_string(),
                kind: "function".to_string(),
                function: FunctionCall { name: "one_way_flight".to_string(), arguments },
            }],
            tool_call_id: None,
        }
    }

    fn agent(client: Arc<ScriptedClient>, provider: Arc<MonthProvider>) -> ToolAgent {
        ToolAgent::new(client, FlightSearch::new(provider, Normalizer::new()), "IndiGo")
    }

    fn month_provider() -> Arc<MonthProvider> {
        Arc::new(MonthProvider { seen: Mutex::new(Vec::new()) })
    }

    #[tokio::test]
    async fn test_plain_reply_needs_no_tool() {
        let client = ScriptedClient::new(vec![ChatMessage::assistant("Where are you flying from?")]);
        let mut agent = agent(client.clone(), month_provider());

        let reply = agent.handle("hi").await.unwrap();
        assert_eq!(reply, "Where are you flying from?");
        assert_eq!(agent.transcript().len(), 3);

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[0].tools.len(), 1);
        assert!(requests[0].messages[0].text_content().starts_with("You are IndiGo's"));
    }

    #[tokio::test]
    async fn test_tool_call_feeds_normalized_quotes_back() {
        let client = ScriptedClient::new(vec![
            tool_call(json!(r#"{"fromEntityId": "BOM", "toEntityId": "DEL", "wholeMonthDepart": "2024-08"}"#)),
            ChatMessage::assistant("The cheapest fare is ₹3,200 on Aug 3. Which date works?"),
        ]);
        let provider = month_provider();
        let mut agent = agent(client.clone(), provider.clone());

        let reply = agent.handle("Mumbai to Delhi sometime in August").await.unwrap();
        assert_eq!(reply, "The cheapest fare is ₹3,200 on Aug 3. Which date works?");
        assert_eq!(provider.seen.lock().unwrap()[0].from_entity_id, AirportCode::Bom);

        // system, user, assistant tool call, tool output, assistant answer
        let transcript = agent.transcript();
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript[3].role, Role::Tool);
        assert_eq!(transcript[3].tool_call_id.as_deref(), Some("call_1"));
        assert!(transcript[3].text_content().starts_with("Present the flight quotes"));
        assert!(transcript[3].text_content().contains("\"isWholeMonthDepart\":true"));

        assert_eq!(client.requests.lock().unwrap()[1].messages.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_turn_is_rolled_back() {
        let client = ScriptedClient::new(vec![
            tool_call(json!({"fromEntityId": "XYZ"})),
            ChatMessage::assistant("Hello again!"),
        ]);
        let provider = month_provider();
        let mut agent = agent(client, provider.clone());

        let err = agent.handle("from nowhere").await.unwrap_err();
        assert!(matches!(err, CoreError::UnparseableQuery(_)));
        assert_eq!(agent.transcript().len(), 1);
        assert!(provider.seen.lock().unwrap().is_empty());

        let reply = agent.handle("hi").await.unwrap();
        assert_eq!(reply, "Hello again!");
        assert_eq!(agent.transcript().len(), 3);
    }
}
