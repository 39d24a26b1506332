use async_trait::async_trait;
use skyquery_core::{CoreError, CoreResult, FlightProvider, NormalizedResult, Normalizer, QueryParams};
use skyquery_infra::ResponseDump;
use std::sync::Arc;
use tracing::{info, warn};

pub const UNPARSEABLE_APOLOGY: &str =
    "Sorry, I couldn't understand your request. Please provide more details.";
pub const FAILURE_APOLOGY: &str =
    "Sorry, something went wrong while searching for flights. Please try again.";

/// One user turn in, one reply out.
#[async_trait]
pub trait TurnHandler: Send {
    async fn handle(&mut self, input: &str) -> CoreResult<String>;
}

/// What the user sees when a turn fails.
pub fn apology(err: &CoreError) -> &'static str {
    match err {
        CoreError::UnparseableQuery(_) => UNPARSEABLE_APOLOGY,
        CoreError::Provider { .. } | CoreError::MalformedResponse(_) | CoreError::Llm(_) => {
            FAILURE_APOLOGY
        }
    }
}

/// Provider call, optional raw dump, then normalization.
pub struct FlightSearch {
    provider: Arc<dyn FlightProvider>,
    normalizer: Normalizer,
    dump: Option<ResponseDump>,
}

impl FlightSearch {
    pub fn new(provider: Arc<dyn FlightProvider>, normalizer: Normalizer) -> Self {
        Self { provider, normalizer, dump: None }
    }

    pub fn with_dump(mut self, dump: Option<ResponseDump>) -> Self {
        self.dump = dump;
        self
    }

    pub async fn run(&self, params: &QueryParams) -> CoreResult<NormalizedResult> {
        let response = self.provider.search_one_way(params).await?;

        if let Some(dump) = &self.dump {
            if let Err(e) = dump.write("search-one-way", &response.raw).await {
                warn!("Could not write raw response to {}: {}", dump.dir().display(), e);
            }
        }

        let result = self.normalizer.normalize(params, &response.body)?;
        info!(
            rows = result.len(),
            whole_month = result.is_whole_month_depart(),
            "Search complete"
        );
        Ok(result)
    }
}
