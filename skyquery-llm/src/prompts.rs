use skyquery_core::AirportCode;

pub const PLANNER_SYSTEM: &str = "You are a helpful travel planning assistant.";
pub const EXTRACTOR_SYSTEM: &str =
    "You are a helpful travel planning assistant. Respond in strictly JSON format.";

/// User prompt asking for the search parameters as one JSON object.
pub fn extraction_prompt(airports: &[AirportCode], text: &str) -> String {
    let choices = AirportCode::prompt_choices(airports);
    format!(
        "Extract travel query parameters from the following input in this json format\n\
         {{\"fromEntityId\": {choices}, \"toEntityId\": {choices}, \
         \"departDate\": \"YYYY-MM-DD\", \
         \"wholeMonthDepart\": \"YYYY-MM\" (only if departDate is absent), \
         \"locale\": \"\", \"currency\": \"INR\"}}:\n{text}"
    )
}

/// System prompt for the function-calling chatbot.
pub fn booking_agent_system(carrier: &str) -> String {
    format!(
        "You are {carrier}'s friendly flight booking chatbot. Follow these rules strictly:\n\
         \n\
         1. For greetings or general questions, respond naturally WITHOUT using any tools\n\
         2. Only use the one_way_flight tool when ALL these conditions are met:\n   \
            - User has specifically asked about booking/searching flights\n   \
            - You have collected: origin city, destination city, and either a specific date or month\n   \
            - You have confirmed these details with the user\n\
         \n\
         Be casual and friendly in conversation. Start by greeting and asking how you can help with flight bookings.\n\
         DO NOT call tools for general conversation."
    )
}
