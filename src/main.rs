use parley::cli::{self, parse_args, run_cli_command, CliCommand};
use parley::client::GenerationClient;
use parley::config::ClientConfig;
use parley::store::ConversationStore;

use color_eyre::Result;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());
    if let Some(result) = run_cli_command(&command) {
        return result;
    }

    color_eyre::install()?;

    // stdout carries the transcript, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("parley=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::from_env();
    if let CliCommand::Run { url: Some(url) } = command {
        config = config.with_base_url(url);
    }
    tracing::debug!("Using {}", config.api_url());

    let client = GenerationClient::new(config)?;
    let store = ConversationStore::new(client);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(cli::repl::run(store))
}
