pub mod app_config;
pub mod skyscanner;
pub mod dump;

pub use skyscanner::SkyScannerClient;
pub use dump::ResponseDump;
