use crate::app_config::ProviderConfig;
use async_trait::async_trait;
use skyquery_core::{CoreError, CoreResult, FlightProvider, LocaleSettings, MalformedResponse, ProviderResponse, QueryParams};
use std::time::Duration;
use tracing::{debug, info, warn};

const SEARCH_ONE_WAY: &str = "/flights/search-one-way";
const AUTO_COMPLETE: &str = "/flights/auto-complete";
const FLIGHT_DETAIL: &str = "/flights/detail";

/// Characters of a raw body kept in debug logs.
const PREVIEW_CHARS: usize = 800;

/// Sky Scanner search over RapidAPI.
pub struct SkyScannerClient {
    http: reqwest::Client,
    base_url: String,
    host: String,
    api_key: String,
    locale: LocaleSettings,
}

impl SkyScannerClient {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host: config.host.clone(),
            api_key,
            locale: config.locale_settings(),
        })
    }

    /// Location suggestions for a free-text place name.
    pub async fn auto_complete(&self, query: &str) -> CoreResult<ProviderResponse> {
        self.get(AUTO_COMPLETE, &[("query", query.to_string())]).await
    }

    /// Full detail of one itinerary from a previous search.
    pub async fn flight_detail(
        &self,
        token: &str,
        itinerary_id: &str,
        currency: Option<&str>,
    ) -> CoreResult<ProviderResponse> {
        let currency = currency.unwrap_or(self.locale.currency.as_str());
        self.get(
            FLIGHT_DETAIL,
            &[
                ("token", token.to_string()),
                ("itineraryId", itinerary_id.to_string()),
                ("currency", currency.to_string()),
            ],
        )
        .await
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> CoreResult<ProviderResponse> {
        let url = format!("{}{}", self.base_url, path);
        info!("Provider request: GET {}", path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await
            .map_err(|e| {
                warn!("Provider transport failure: {}", e);
                CoreError::provider(None, e.to_string())
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| CoreError::provider(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            warn!("Provider returned {}", status);
            return Err(CoreError::provider(Some(status.as_u16()), raw));
        }

        debug!(
            status = status.as_u16(),
            preview = %raw.chars().take(PREVIEW_CHARS).collect::<String>(),
            "Provider response"
        );

        let body = serde_json::from_str(&raw).map_err(|_| MalformedResponse::new("$", "a JSON document"))?;
        Ok(ProviderResponse {
            status: status.as_u16(),
            raw,
            body,
        })
    }
}

#[async_trait]
impl FlightProvider for SkyScannerClient {
    async fn search_one_way(&self, params: &QueryParams) -> CoreResult<ProviderResponse> {
        let params = params.clone().with_locale_defaults(&self.locale);
        self.get(SEARCH_ONE_WAY, &params.query_pairs()).await
    }
}
