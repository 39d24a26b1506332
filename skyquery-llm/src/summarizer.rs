use crate::client::LlmClient;
use crate::prompts::PLANNER_SYSTEM;
use crate::protocol::{ChatMessage, ChatRequest};
use async_trait::async_trait;
use skyquery_core::presentation::render_summary_prompt;
use skyquery_core::{CoreError, CoreResult, NormalizedResult, Summarizer};
use std::sync::Arc;

pub struct LlmSummarizer {
    client: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl LlmSummarizer {
    pub fn new(client: Arc<dyn LlmClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, result: &NormalizedResult) -> CoreResult<String> {
        let prompt = render_summary_prompt(result).map_err(|e| CoreError::Llm(e.to_string()))?;
        let request = ChatRequest::new(vec![
            ChatMessage::system(PLANNER_SYSTEM),
            ChatMessage::user(prompt),
        ])
        .max_tokens(self.max_tokens);

        let reply = self.client.chat(request).await?;
        let text = reply.text_content();
        if text.is_empty() {
            return Err(CoreError::Llm("empty summary".to_string()));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmError;
    use skyquery_core::presentation::QUOTES_INSTRUCTION;
    use skyquery_core::NormalizedQuote;
    use std::sync::Mutex;

    struct EchoClient {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn chat(&self, request: ChatRequest) -> Result<ChatMessage, LlmError> {
            let last = request.messages.last().map(|m| m.text_content().to_string()).unwrap_or_default();
            self.prompts.lock().unwrap().push(last);
            Ok(ChatMessage::assistant(self.reply.clone()))
        }
    }

    fn quotes() -> NormalizedResult {
        NormalizedResult::whole_month(vec![NormalizedQuote {
            price: "₹3,200".to_string(),
            direct: true,
            origin_airport: "Mumbai".to_string(),
            destination_airport: "Delhi".to_string(),
            departure_date: "2024-07-03".to_string(),
            departure_date_label: "Jul 3".to_string(),
        }])
    }

    #[tokio::test]
    async fn test_summary_uses_mode_instruction() {
        let client = Arc::new(EchoClient {
            reply: "  Cheapest is ₹3,200 on Jul 3. Which date suits you?  ".to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let summary = LlmSummarizer::new(client.clone(), 1024).summarize(&quotes()).await.unwrap();

        assert_eq!(summary, "Cheapest is ₹3,200 on Jul 3. Which date suits you?");
        assert!(client.prompts.lock().unwrap()[0].starts_with(QUOTES_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_blank_summary_is_an_error() {
        let client = Arc::new(EchoClient { reply: "   ".to_string(), prompts: Mutex::new(Vec::new()) });
        let err = LlmSummarizer::new(client, 1024).summarize(&quotes()).await.unwrap_err();
        assert!(matches!(err, CoreError::Llm(_)));
    }
}
