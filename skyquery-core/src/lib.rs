pub mod airport;
pub mod params;
pub mod normalize;
pub mod presentation;
pub mod supplier;
pub mod tool;

pub use airport::AirportCode;
pub use params::{LocaleSettings, QueryParams, SearchMode, YearMonth};
pub use normalize::{MalformedResponse, NormalizedFlight, NormalizedQuote, NormalizedResult, NormalizedRow, Normalizer};
pub use supplier::{FlightProvider, ProviderResponse, QueryInterpreter, Summarizer};
pub use tool::{ToolCommand, ToolDefinition};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unparseable query: {0}")]
    UnparseableQuery(String),
    #[error("Provider error (status {status:?}): {body}")]
    Provider { status: Option<u16>, body: String },
    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),
    #[error("LLM request failed: {0}")]
    Llm(String),
}

impl CoreError {
    pub fn unparseable(msg: impl Into<String>) -> Self {
        Self::UnparseableQuery(msg.into())
    }

    pub fn provider(status: Option<u16>, body: impl Into<String>) -> Self {
        Self::Provider { status, body: body.into() }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
