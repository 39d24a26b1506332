use crate::airport::AirportCode;
use crate::normalize::NormalizedResult;
use crate::params::QueryParams;
use crate::CoreResult;
use async_trait::async_trait;
use serde_json::Value;

/// A successful (2xx) provider reply.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: u16,
    /// Body exactly as received, for diagnostics.
    pub raw: String,
    pub body: Value,
}

/// Maps free text to search parameters.
#[async_trait]
pub trait QueryInterpreter: Send + Sync {
    /// Fails with `CoreError::UnparseableQuery` rather than guessing an origin.
    async fn interpret(&self, text: &str, airports: &[AirportCode]) -> CoreResult<QueryParams>;
}

/// The external one-way flight search.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Non-2xx replies and transport failures come back as `CoreError::Provider`.
    async fn search_one_way(&self, params: &QueryParams) -> CoreResult<ProviderResponse>;
}

/// Turns a normalized result into a short reply for the user.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, result: &NormalizedResult) -> CoreResult<String>;
}
