use serde::Deserialize;
use skyquery_core::LocaleSettings;
use std::env;
use std::fmt;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub llm: LlmConfig,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub host: String,
    pub market: String,
    pub locale: String,
    pub currency: String,
    pub timeout_seconds: u64,
    /// Write every raw search body here when set.
    pub dump_dir: Option<String>,
}

impl ProviderConfig {
    pub fn locale_settings(&self) -> LocaleSettings {
        LocaleSettings {
            market: self.market.clone(),
            locale: self.locale.clone(),
            currency: self.currency.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub extraction_max_tokens: u32,
    pub summary_max_tokens: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    /// Extract parameters, search, summarize.
    Pipeline,
    /// Function-calling conversation with a persistent transcript.
    Tool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssistantConfig {
    pub mode: AssistantMode,
    /// Only legs marketed by this carrier are kept in date mode.
    pub carrier_filter: Option<String>,
    /// Airline the tool-mode chatbot speaks for.
    pub carrier_name: String,
}

/// API keys taken from the process environment.
#[derive(Clone, Default)]
pub struct Secrets {
    pub sky_scanner_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let read = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            sky_scanner_api_key: read("SKY_SCANNER_API_KEY"),
            openai_api_key: read("OPENAI_API_KEY"),
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("sky_scanner_api_key", &mask(&self.sky_scanner_api_key))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .set_default("provider.base_url", "https://sky-scanner3.p.rapidapi.com")?
            .set_default("provider.host", "sky-scanner3.p.rapidapi.com")?
            .set_default("provider.market", "IN")?
            .set_default("provider.locale", "en-GB")?
            .set_default("provider.currency", "INR")?
            .set_default("provider.timeout_seconds", 30)?
            .set_default("llm.base_url", "https://api.openai.com/v1")?
            .set_default("llm.model", "gpt-4-turbo")?
            .set_default("llm.timeout_seconds", 120)?
            .set_default("llm.extraction_max_tokens", 100)?
            .set_default("llm.summary_max_tokens", 1024)?
            .set_default("assistant.mode", "pipeline")?
            .set_default("assistant.carrier_name", "IndiGo")?
            // Shipped defaults, then the run mode, then untracked local overrides
            .add_source(config::File::with_name(&file("default")).required(false))
            .add_source(config::File::with_name(&file(run_mode.as_str())).required(false))
            .add_source(config::File::with_name(&file("local")).required(false))
            // Eg.. `SKYQUERY__ASSISTANT__MODE=tool`
            .add_source(
                config::Environment::with_prefix("SKYQUERY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
