use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use tern::agent::Agent;
use tern::providers::anthropic::AnthropicProvider;
use tern::providers::configs::AnthropicProviderConfig;
use tern::session::Session;
use tern::tools::ToolCatalog;

mod prompt;

use prompt::rustyline::RustylinePrompt;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Anthropic API key (can also be set via ANTHROPIC_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// API host (can also be set via ANTHROPIC_HOST environment variable)
    #[arg(long)]
    host: Option<String>,

    /// Model to use (can also be set via ANTHROPIC_MODEL environment variable)
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum tokens per model reply
    #[arg(long)]
    max_tokens: Option<i32>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Optional system prompt sent with every request
    #[arg(long)]
    system: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tern=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn provider_config(cli: &Cli) -> Result<AnthropicProviderConfig> {
    let mut config = AnthropicProviderConfig::from_env_with_key(cli.api_key.clone())
        .context("API key must be provided via --api-key or ANTHROPIC_API_KEY environment variable")?;

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.max_tokens = Some(max_tokens);
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = Some(temperature);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let provider = AnthropicProvider::new(provider_config(&cli)?)?;
    let catalog = ToolCatalog::builtin()?;
    tracing::info!(model = provider.model(), tools = ?catalog.names(), "starting session");

    let mut agent = Agent::new(Box::new(provider), catalog);
    if let Some(system) = cli.system {
        agent = agent.with_system_prompt(system);
    }

    let prompt = RustylinePrompt::new()?;
    prompt.greet();

    let mut session = Session::new(agent, Box::new(prompt));
    session.run().await
}
