use std::error::Error;
use std::sync::Arc;

use ai_llm_service::telemetry::{self, LogSink};
use clap::{Parser, ValueEnum};
use ticket_agent::TicketSearchAgent;
use tracing::{Level, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// HTTP API.
    Web,
    /// MCP tool server on stdio.
    Mcp,
}

#[derive(Debug, Parser)]
#[command(name = "ticket-search", version, about = "Support ticket search agent")]
struct Cli {
    /// Front end to run.
    #[arg(long, value_enum, default_value_t = Mode::Web)]
    mode: Mode,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Missing .env is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // stdout carries the protocol in MCP mode.
    let sink = match cli.mode {
        Mode::Web => LogSink::Stdout,
        Mode::Mcp => LogSink::Stderr,
    };
    telemetry::init(telemetry::env_filter_with_level("info", Level::INFO), sink)?;

    let agent = Arc::new(TicketSearchAgent::from_env()?);
    info!(target: "ticket_search", mode = ?cli.mode, "starting");

    match cli.mode {
        Mode::Web => api::start(agent).await?,
        Mode::Mcp => api::serve_mcp(agent).await?,
    }

    Ok(())
}
