//! neurolens — command-line front end for the model-inspection backend.
//! Composition root: loads configuration, builds one client, runs one command.

mod commands;
mod config;

use std::path::PathBuf;

use clap::Parser;
use neurolens_client::{InspectorClient, RouteLayout};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "neurolens", version, about = "Inspect and steer models served by a remote inspection backend")]
struct Cli {
    /// Config file (defaults to $NEUROLENS_CONFIG, then ./neurolens.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and $NEUROLENS_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Backend routing table: query or nested
    #[arg(long, global = true)]
    routes: Option<RouteLayout>,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    config.override_base_url(cli.base_url);
    if let Some(routes) = cli.routes {
        config.client.routes = routes;
    }

    // Logs go to stderr; stdout is reserved for the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        base_url = %config.client.base_url,
        routes = config.client.routes.as_str(),
        command = cli.command.name(),
        "neurolens starting"
    );

    let client = InspectorClient::new(config.client);
    let output = commands::run(&client, cli.command).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
