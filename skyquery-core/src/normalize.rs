//! Reshapes raw provider search responses into flat rows for presentation.
//!
//! The normalizer is pure: it never performs I/O and never fills in defaults for
//! missing keys. Any required key that is absent (or has the wrong JSON type) is
//! reported as a [`MalformedResponse`] naming the first offending path.

use crate::params::{QueryParams, SearchMode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A 2xx provider body that lacks a field the selected mode needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed provider response at `{path}`: expected {expected}")]
pub struct MalformedResponse {
    pub path: String,
    pub expected: &'static str,
}

impl MalformedResponse {
    pub fn new(path: impl Into<String>, expected: &'static str) -> Self {
        Self { path: path.into(), expected }
    }
}

/// One leg of a dated search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFlight {
    pub price: String,
    pub origin: String,
    pub destination: String,
    pub duration_minutes: u32,
    pub departure: String,
    pub arrival: String,
    pub carrier: String,
    pub flight_number: String,
}

/// One price quote of a whole-month search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuote {
    pub price: String,
    pub direct: bool,
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure_date: String,
    pub departure_date_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedRow {
    Flight(NormalizedFlight),
    Quote(NormalizedQuote),
}

/// Rows in provider order plus the mode that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    flights: Vec<NormalizedRow>,
    is_whole_month_depart: bool,
}

impl NormalizedResult {
    pub fn dated(flights: Vec<NormalizedFlight>) -> Self {
        Self {
            flights: flights.into_iter().map(NormalizedRow::Flight).collect(),
            is_whole_month_depart: false,
        }
    }

    pub fn whole_month(quotes: Vec<NormalizedQuote>) -> Self {
        Self {
            flights: quotes.into_iter().map(NormalizedRow::Quote).collect(),
            is_whole_month_depart: true,
        }
    }

    pub fn flights(&self) -> &[NormalizedRow] {
        &self.flights
    }

    pub fn is_whole_month_depart(&self) -> bool {
        self.is_whole_month_depart
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

/// A position inside the raw body, remembered for error reporting.
#[derive(Clone)]
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Self { value, path: String::new() }
    }

    fn key(&self, key: &str) -> Result<Node<'a>, MalformedResponse> {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        };
        match self.value.get(key) {
            Some(Value::Null) | None => Err(MalformedResponse::new(path, "a value")),
            Some(value) => Ok(Node { value, path }),
        }
    }

    fn at(&self, keys: &[&str]) -> Result<Node<'a>, MalformedResponse> {
        keys.iter().try_fold(self.clone(), |node, key| node.key(key))
    }

    fn items(&self) -> Result<Vec<Node<'a>>, MalformedResponse> {
        let array = self
            .value
            .as_array()
            .ok_or_else(|| MalformedResponse::new(self.path.clone(), "an array"))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(i, value)| Node { value, path: format!("{}[{}]", self.path, i) })
            .collect())
    }

    fn first(&self) -> Result<Node<'a>, MalformedResponse> {
        self.items()?
            .into_iter()
            .next()
            .ok_or_else(|| MalformedResponse::new(format!("{}[0]", self.path), "a value"))
    }

    fn string(&self) -> Result<String, MalformedResponse> {
        self.value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MalformedResponse::new(self.path.clone(), "a string"))
    }

    /// Strings pass through, numbers are rendered as written.
    fn price(&self) -> Result<String, MalformedResponse> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(MalformedResponse::new(self.path.clone(), "a string or number")),
        }
    }

    fn minutes(&self) -> Result<u32, MalformedResponse> {
        self.value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| MalformedResponse::new(self.path.clone(), "a non-negative integer"))
    }

    fn boolean(&self) -> Result<bool, MalformedResponse> {
        self.value
            .as_bool()
            .ok_or_else(|| MalformedResponse::new(self.path.clone(), "a boolean"))
    }
}

/// Turns provider bodies into [`NormalizedResult`]s, optionally keeping one carrier.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    carrier_filter: Option<String>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only legs whose first marketing carrier is named exactly `carrier`.
    pub fn with_carrier_filter(carrier: impl Into<String>) -> Self {
        Self { carrier_filter: Some(carrier.into()) }
    }

    pub fn carrier_filter(&self) -> Option<&str> {
        self.carrier_filter.as_deref()
    }

    pub fn normalize(
        &self,
        params: &QueryParams,
        raw: &Value,
    ) -> Result<NormalizedResult, MalformedResponse> {
        let root = Node::root(raw);
        let result = match params.search_mode() {
            SearchMode::Date => NormalizedResult::dated(self.flights(&root)?),
            SearchMode::WholeMonth => NormalizedResult::whole_month(Self::quotes(&root)?),
        };
        debug!(
            rows = result.len(),
            whole_month = result.is_whole_month_depart(),
            "Normalized provider response"
        );
        Ok(result)
    }

    fn flights(&self, root: &Node<'_>) -> Result<Vec<NormalizedFlight>, MalformedResponse> {
        let mut flights = Vec::new();
        for itinerary in root.at(&["data", "itineraries"])?.items()? {
            let price = itinerary.at(&["price", "formatted"])?.string()?;
            for leg in itinerary.key("legs")?.items()? {
                let flight = NormalizedFlight {
                    price: price.clone(),
                    origin: leg.at(&["origin", "name"])?.string()?,
                    destination: leg.at(&["destination", "name"])?.string()?,
                    duration_minutes: leg.key("durationInMinutes")?.minutes()?,
                    departure: leg.key("departure")?.string()?,
                    arrival: leg.key("arrival")?.string()?,
                    carrier: leg.at(&["carriers", "marketing"])?.first()?.key("name")?.string()?,
                    flight_number: leg.key("segments")?.first()?.key("flightNumber")?.string()?,
                };
                match &self.carrier_filter {
                    Some(carrier) if &flight.carrier != carrier => {}
                    _ => flights.push(flight),
                }
            }
        }
        Ok(flights)
    }

    fn quotes(root: &Node<'_>) -> Result<Vec<NormalizedQuote>, MalformedResponse> {
        root.at(&["data", "flightQuotes", "results"])?
            .items()?
            .into_iter()
            .map(|quote| {
                let content = quote.key("content")?;
                let outbound = content.key("outboundLeg")?;
                Ok(NormalizedQuote {
                    price: content.key("price")?.price()?,
                    direct: content.key("direct")?.boolean()?,
                    origin_airport: outbound.at(&["originAirport", "name"])?.string()?,
                    destination_airport: outbound.at(&["destinationAirport", "name"])?.string()?,
                    departure_date: outbound.key("localDepartureDate")?.string()?,
                    departure_date_label: outbound.key("localDepartureDateLabel")?.string()?,
                })
            })
            .collect()
    }
}
