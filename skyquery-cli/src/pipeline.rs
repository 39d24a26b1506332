use crate::turn::{FlightSearch, TurnHandler};
use async_trait::async_trait;
use skyquery_core::{AirportCode, CoreResult, QueryInterpreter, Summarizer};
use std::sync::Arc;
use tracing::info;

/// Stateless extract, search, summarize turn.
pub struct Pipeline {
    interpreter: Arc<dyn QueryInterpreter>,
    search: FlightSearch,
    summarizer: Arc<dyn Summarizer>,
    airports: Vec<AirportCode>,
}

impl Pipeline {
    pub fn new(
        interpreter: Arc<dyn QueryInterpreter>,
        search: FlightSearch,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            interpreter,
            search,
            summarizer,
            airports: AirportCode::ALL.to_vec(),
        }
    }

    pub fn with_airports(mut self, airports: Vec<AirportCode>) -> Self {
        self.airports = airports;
        self
    }
}

#[async_trait]
impl TurnHandler for Pipeline {
    async fn handle(&mut self, input: &str) -> CoreResult<String> {
        let params = self.interpreter.interpret(input, &self.airports).await?;
        info!(
            from = %params.from_entity_id,
            to = ?params.to_entity_id,
            mode = ?params.search_mode(),
            "Searching one-way flights"
        );

        let result = self.search.run(&params).await?;
        self.summarizer.summarize(&result).await
    }
}
