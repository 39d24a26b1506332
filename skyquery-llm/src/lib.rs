pub mod protocol;
pub mod client;
pub mod prompts;
pub mod interpreter;
pub mod summarizer;

pub use protocol::{ChatMessage, ChatRequest, FunctionCall, Role, ToolCall};
pub use client::{LlmClient, LlmError, OpenAiCompatClient};
pub use interpreter::LlmQueryInterpreter;
pub use summarizer::LlmSummarizer;
