use crate::airport::AirportCode;
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Which normalization path a query takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// One row per leg for a specific departure date.
    Date,
    /// One row per price quote across a departure month.
    WholeMonth,
}

/// A `YYYY-MM` departure month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got {:?}", s))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(format!("expected YYYY-MM, got {:?}", s));
        }
        let year: i32 = year.parse().map_err(|_| format!("invalid year in {:?}", s))?;
        let month: u32 = month.parse().map_err(|_| format!("invalid month in {:?}", s))?;
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| format!("invalid month in {:?}", s))?;
        Ok(Self { year, month })
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Market, locale and currency sent with every search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocaleSettings {
    pub market: String,
    pub locale: String,
    pub currency: String,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            market: "IN".to_string(),
            locale: "en-GB".to_string(),
            currency: "INR".to_string(),
        }
    }
}

/// Validated one-way search parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub from_entity_id: AirportCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_entity_id: Option<AirportCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depart_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whole_month_depart: Option<YearMonth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Loose shape of what an interpreter or a tool call hands back.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQueryParams {
    from_entity_id: Option<Value>,
    to_entity_id: Option<Value>,
    depart_date: Option<Value>,
    whole_month_depart: Option<Value>,
    market: Option<Value>,
    locale: Option<Value>,
    currency: Option<Value>,
}

/// Null and blank strings count as absent.
fn text_field(name: &str, value: Option<Value>) -> CoreResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("null") {
                Ok(None)
            } else {
                Ok(Some(s.to_string()))
            }
        }
        Some(other) => Err(CoreError::unparseable(format!(
            "{} must be a string, got {}",
            name, other
        ))),
    }
}

fn airport_field(name: &str, value: Option<Value>) -> CoreResult<Option<AirportCode>> {
    text_field(name, value)?
        .map(|s| s.parse::<AirportCode>())
        .transpose()
        .map_err(|e| CoreError::unparseable(format!("{}: {}", name, e)))
}

impl QueryParams {
    pub fn new(from: AirportCode) -> Self {
        Self {
            from_entity_id: from,
            to_entity_id: None,
            depart_date: None,
            whole_month_depart: None,
            market: None,
            locale: None,
            currency: None,
        }
    }

    /// Validate a JSON object produced by an interpreter or a tool call.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        if !value.is_object() {
            return Err(CoreError::unparseable(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        let raw: RawQueryParams = serde_json::from_value(value)
            .map_err(|e| CoreError::unparseable(e.to_string()))?;

        let from_entity_id = airport_field("fromEntityId", raw.from_entity_id)?
            .ok_or_else(|| CoreError::unparseable("fromEntityId is required"))?;
        let to_entity_id = airport_field("toEntityId", raw.to_entity_id)?;

        let depart_date = text_field("departDate", raw.depart_date)?
            .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
            .transpose()
            .map_err(|e| CoreError::unparseable(format!("departDate: {}", e)))?;
        let whole_month_depart = text_field("wholeMonthDepart", raw.whole_month_depart)?
            .map(|s| s.parse::<YearMonth>())
            .transpose()
            .map_err(|e| CoreError::unparseable(format!("wholeMonthDepart: {}", e)))?;

        Ok(Self {
            from_entity_id,
            to_entity_id,
            depart_date,
            whole_month_depart,
            market: text_field("market", raw.market)?,
            locale: text_field("locale", raw.locale)?,
            currency: text_field("currency", raw.currency)?,
        })
    }

    /// Parse the text of a JSON object.
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| CoreError::unparseable(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Fill market, locale and currency the interpreter left out.
    pub fn with_locale_defaults(mut self, defaults: &LocaleSettings) -> Self {
        self.market.get_or_insert_with(|| defaults.market.clone());
        self.locale.get_or_insert_with(|| defaults.locale.clone());
        self.currency.get_or_insert_with(|| defaults.currency.clone());
        self
    }

    /// Date mode only when a day is given and no month is.
    pub fn search_mode(&self) -> SearchMode {
        if self.whole_month_depart.is_none() && self.depart_date.is_some() {
            SearchMode::Date
        } else {
            SearchMode::WholeMonth
        }
    }

    /// Non-null fields in provider query-string order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("fromEntityId", self.from_entity_id.to_string())];
        if let Some(to) = self.to_entity_id {
            pairs.push(("toEntityId", to.to_string()));
        }
        if let Some(date) = self.depart_date {
            pairs.push(("departDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(month) = self.whole_month_depart {
            pairs.push(("wholeMonthDepart", month.to_string()));
        }
        if let Some(market) = &self.market {
            pairs.push(("market", market.clone()));
        }
        if let Some(locale) = &self.locale {
            pairs.push(("locale", locale.clone()));
        }
        if let Some(currency) = &self.currency {
            pairs.push(("currency", currency.clone()));
        }
        pairs
    }
}
