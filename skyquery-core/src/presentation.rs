use crate::normalize::NormalizedResult;

pub const FLIGHTS_INSTRUCTION: &str = "Present the flight details in a friendly way:";
pub const QUOTES_INSTRUCTION: &str =
    "Present the flight quotes in a friendly way and ask user to pick a date:";

/// The single instruction handed to the summarizer for this result.
pub fn summary_instruction(result: &NormalizedResult) -> &'static str {
    if result.is_whole_month_depart() {
        QUOTES_INSTRUCTION
    } else {
        FLIGHTS_INSTRUCTION
    }
}

/// Instruction, newline, then the result as JSON.
pub fn render_summary_prompt(result: &NormalizedResult) -> Result<String, serde_json::Error> {
    let body = serde_json::to_string(result)?;
    Ok(format!("{}\n{}", summary_instruction(result), body))
}
