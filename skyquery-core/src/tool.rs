use crate::airport::AirportCode;
use crate::params::QueryParams;
use crate::{CoreError, CoreResult};
use serde::Serialize;
use serde_json::{json, Value};

pub const ONE_WAY_FLIGHT: &str = "one_way_flight";

/// A function the chat model may call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: String,
    pub parameters: Value,
}

/// Every tool the assistant can run.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCommand {
    OneWayFlight(QueryParams),
}

impl ToolCommand {
    /// Resolve a model-issued call. Names match case-insensitively and the
    /// arguments may be an object or a JSON-encoded string.
    pub fn parse(name: &str, arguments: &Value) -> CoreResult<Self> {
        let arguments = match arguments {
            Value::String(s) if s.trim().is_empty() => json!({}),
            Value::String(s) => serde_json::from_str(s).map_err(|e| {
                CoreError::unparseable(format!("arguments for {} are not JSON: {}", name, e))
            })?,
            other => other.clone(),
        };

        match name.trim().to_ascii_lowercase().as_str() {
            ONE_WAY_FLIGHT => Ok(Self::OneWayFlight(QueryParams::from_value(arguments)?)),
            other => Err(CoreError::unparseable(format!("unknown tool: {}", other))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCommand::OneWayFlight(_) => ONE_WAY_FLIGHT,
        }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        let codes: Vec<&str> = AirportCode::ALL.iter().map(|a| a.code()).collect();
        vec![ToolDefinition {
            name: ONE_WAY_FLIGHT,
            description: format!(
                "Queries the API for one-way flights. Airports: {}. \
                 Use either departDate or wholeMonthDepart, not both.",
                AirportCode::prompt_choices(&AirportCode::ALL)
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "fromEntityId": {
                        "type": "string",
                        "enum": codes,
                        "description": "Origin airport code"
                    },
                    "toEntityId": {
                        "type": "string",
                        "enum": codes,
                        "description": "Destination airport code"
                    },
                    "departDate": {
                        "type": "string",
                        "description": "Departure date, YYYY-MM-DD"
                    },
                    "wholeMonthDepart": {
                        "type": "string",
                        "description": "Departure month, YYYY-MM"
                    }
                },
                "required": ["fromEntityId"]
            }),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_arguments() {
        let cmd = ToolCommand::parse(
            "One_Way_Flight",
            &json!({"fromEntityId": "BOM", "toEntityId": "DEL", "departDate": "2024-07-17"}),
        )
        .unwrap();
        let ToolCommand::OneWayFlight(params) = cmd;
        assert_eq!(params.from_entity_id, AirportCode::Bom);
        assert_eq!(params.to_entity_id, Some(AirportCode::Del));
    }

    #[test]
    fn test_parse_string_arguments() {
        let cmd = ToolCommand::parse(
            ONE_WAY_FLIGHT,
            &json!("{\"fromEntityId\":\"MAA\",\"wholeMonthDepart\":\"2024-08\"}"),
        )
        .unwrap();
        assert_eq!(cmd.name(), ONE_WAY_FLIGHT);
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        let err = ToolCommand::parse("add", &json!({"a": 1})).unwrap_err();
        assert!(matches!(err, CoreError::UnparseableQuery(_)));
    }

    #[test]
    fn test_empty_arguments_need_an_origin() {
        assert!(ToolCommand::parse(ONE_WAY_FLIGHT, &json!("")).is_err());
    }

    #[test]
    fn test_definition_lists_airport_enum() {
        let defs = ToolCommand::definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].parameters["properties"]["fromEntityId"]["enum"][0], "BOM");
        assert_eq!(defs[0].parameters["required"], json!(["fromEntityId"]));
    }
}
