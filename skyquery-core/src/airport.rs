use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Airports the provider search is wired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirportCode {
    Bom,
    Del,
    Pnq,
    Blr,
    Maa,
    Ccu,
    Hyd,
    Atq,
    Slv,
    Pat,
}

impl AirportCode {
    pub const ALL: [AirportCode; 10] = [
        AirportCode::Bom,
        AirportCode::Del,
        AirportCode::Pnq,
        AirportCode::Blr,
        AirportCode::Maa,
        AirportCode::Ccu,
        AirportCode::Hyd,
        AirportCode::Atq,
        AirportCode::Slv,
        AirportCode::Pat,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AirportCode::Bom => "BOM",
            AirportCode::Del => "DEL",
            AirportCode::Pnq => "PNQ",
            AirportCode::Blr => "BLR",
            AirportCode::Maa => "MAA",
            AirportCode::Ccu => "CCU",
            AirportCode::Hyd => "HYD",
            AirportCode::Atq => "ATQ",
            AirportCode::Slv => "SLV",
            AirportCode::Pat => "PAT",
        }
    }

    pub fn city(&self) -> &'static str {
        match self {
            AirportCode::Bom => "mumbai",
            AirportCode::Del => "delhi",
            AirportCode::Pnq => "pune",
            AirportCode::Blr => "bengaluru",
            AirportCode::Maa => "chennai",
            AirportCode::Ccu => "kolkata",
            AirportCode::Hyd => "hyderabad",
            AirportCode::Atq => "amritsar",
            AirportCode::Slv => "shimla",
            AirportCode::Pat => "patna",
        }
    }

    /// Prompt fragment of the form `'BOM'(mumbai) | 'DEL'(delhi) | ...`.
    pub fn prompt_choices(airports: &[AirportCode]) -> String {
        airports
            .iter()
            .map(|a| format!("'{}'({})", a.code(), a.city()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown airport code: {0:?}")]
pub struct UnknownAirport(pub String);

impl FromStr for AirportCode {
    type Err = UnknownAirport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownAirport(s.to_string()))
    }
}

impl Serialize for AirportCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for AirportCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("bom".parse::<AirportCode>().unwrap(), AirportCode::Bom);
        assert_eq!(" DEL ".parse::<AirportCode>().unwrap(), AirportCode::Del);
        assert!("JFK".parse::<AirportCode>().is_err());
    }

    #[test]
    fn test_serde_uses_upper_case_code() {
        let json = serde_json::to_string(&AirportCode::Blr).unwrap();
        assert_eq!(json, "\"BLR\"");
        let back: AirportCode = serde_json::from_str("\"hyd\"").unwrap();
        assert_eq!(back, AirportCode::Hyd);
    }

    #[test]
    fn test_prompt_choices_lists_every_airport() {
        let choices = AirportCode::prompt_choices(&AirportCode::ALL);
        assert!(choices.starts_with("'BOM'(mumbai) | 'DEL'(delhi)"));
        assert_eq!(choices.matches(" | ").count(), AirportCode::ALL.len() - 1);
    }
}
