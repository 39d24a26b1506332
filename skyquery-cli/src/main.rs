use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use skyquery_core::{Normalizer, ProviderResponse};
use skyquery_infra::app_config::{AssistantMode, Config, Secrets};
use skyquery_infra::{ResponseDump, SkyScannerClient};
use skyquery_cli::{repl, FlightSearch, Pipeline, ToolAgent, TurnHandler};
use skyquery_llm::{LlmClient, LlmQueryInterpreter, LlmSummarizer, OpenAiCompatClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skyquery", about = "Ask for one-way flights in plain language")]
struct Cli {
    /// Directory holding default/{RUN_MODE}/local config files
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,

    /// Overrides assistant.mode
    #[arg(long, global = true, value_enum)]
    mode: Option<ModeArg>,

    /// Keep only flights marketed by this carrier
    #[arg(long, global = true)]
    carrier: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Pipeline,
    Tool,
}

impl From<ModeArg> for AssistantMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pipeline => AssistantMode::Pipeline,
            ModeArg::Tool => AssistantMode::Tool,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Interactive conversation (default)
    Chat,
    /// Look up provider locations for a place name
    Locations { query: String },
    /// Fetch the full detail of one itinerary
    Detail {
        #[arg(long)]
        token: String,
        #[arg(long)]
        itinerary_id: String,
        #[arg(long)]
        currency: Option<String>,
    },
}

fn print_json(response: &ProviderResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}

fn build_handler(
    config: &Config,
    secrets: &Secrets,
    provider: SkyScannerClient,
    mode: AssistantMode,
    carrier_filter: Option<String>,
) -> anyhow::Result<Box<dyn TurnHandler>> {
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiCompatClient::new(
        config.llm.base_url.clone(),
        secrets.openai_api_key.clone(),
        config.llm.model.clone(),
        Duration::from_secs(config.llm.timeout_seconds),
    )?);

    let normalizer = match carrier_filter {
        Some(carrier) => Normalizer::with_carrier_filter(carrier),
        None => Normalizer::new(),
    };
    let dump = config.provider.dump_dir.as_ref().map(ResponseDump::new);
    let search = FlightSearch::new(Arc::new(provider), normalizer).with_dump(dump);

    let handler: Box<dyn TurnHandler> = match mode {
        AssistantMode::Pipeline => Box::new(Pipeline::new(
            Arc::new(LlmQueryInterpreter::new(llm.clone(), config.llm.extraction_max_tokens)),
            search,
            Arc::new(LlmSummarizer::new(llm, config.llm.summary_max_tokens)),
        )),
        AssistantMode::Tool => Box::new(
            ToolAgent::new(llm, search, &config.assistant.carrier_name)
                .with_max_tokens(config.llm.summary_max_tokens),
        ),
    };
    Ok(handler)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyquery_cli=info,skyquery_infra=info,skyquery_llm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config_dir).context("Failed to load config")?;
    let secrets = Secrets::from_env();
    tracing::debug!(?secrets, "Loaded configuration");

    let api_key = secrets
        .sky_scanner_api_key
        .clone()
        .context("SKY_SCANNER_API_KEY is not set")?;
    let provider = SkyScannerClient::new(&config.provider, api_key)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Locations { query } => print_json(&provider.auto_complete(&query).await?),
        Command::Detail { token, itinerary_id, currency } => print_json(
            &provider
                .flight_detail(&token, &itinerary_id, currency.as_deref())
                .await?,
        ),
        Command::Chat => {
            let mode = cli.mode.map(AssistantMode::from).unwrap_or(config.assistant.mode);
            let carrier_filter = cli.carrier.or_else(|| config.assistant.carrier_filter.clone());
            tracing::info!(?mode, carrier_filter = ?carrier_filter, "Starting assistant");

            let mut handler = build_handler(&config, &secrets, provider, mode, carrier_filter)?;
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            repl::run(handler.as_mut(), stdin, &mut stdout).await?;
            Ok(())
        }
    }
}
