pub mod turn;
pub mod pipeline;
pub mod agent;
pub mod repl;

pub use turn::{apology, FlightSearch, TurnHandler};
pub use pipeline::Pipeline;
pub use agent::ToolAgent;
