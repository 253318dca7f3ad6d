//! # audex CLI Entry Point
//!
//! Assembles subcommands and dispatches to handlers.

use anyhow::Context;
use clap::Parser;

use audex_api::AppState;
use audex_domain::AudexConfig;

/// Audex — compliance-audit platform.
///
/// Serves the HTTP API over the assembled domain core and inspects the
/// resolved deployment configuration.
#[derive(Parser, Debug)]
#[command(name = "audex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Print the resolved configuration as JSON.
    Config,
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AudexConfig::from_env().context("loading configuration")?;

    match cli.command {
        Commands::Serve(args) => serve(config, &args.addr).await,
        Commands::Config => {
            println!(
                "{}",
                serde_json::json!({
                    "available_frameworks": config.available_frameworks,
                    "max_engagement_participants": config.max_engagement_participants,
                })
            );
            Ok(())
        }
    }
}

async fn serve(config: AudexConfig, addr: &str) -> anyhow::Result<()> {
    let state = AppState::from_config(config).context("assembling the domain core")?;
    let app = audex_api::app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(addr, "audex api listening");
    axum::serve(listener, app).await.context("serving")
}
