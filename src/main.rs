use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;
mod config;

use airtable_mcp::auth::{BrokerConfig, NangoBroker, TokenProvider};
use airtable_mcp::client::ApiClient;
use airtable_mcp::mcp::{McpServer, run_stdio};
use airtable_mcp::tools::{ToolSurface, check_connection};
use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging(level: &str) -> Result<PathBuf> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join(format!("{}.log", env!("CARGO_PKG_NAME")));

    // stdout carries the protocol, so logs only ever go to the file
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(log_file)
}

/// Wire broker, token provider, client and tool surface from the environment
fn build_surface(config: &Config) -> Result<Arc<ToolSurface>> {
    let broker_config = BrokerConfig::from_env().context("Nango connection is not configured")?;
    info!("Using broker connection {:?}", broker_config);

    let broker = NangoBroker::with_timeout(broker_config, config.broker.timeout())
        .context("Failed to create broker client")?;
    let tokens = Arc::new(TokenProvider::new(Arc::new(broker)));
    let client = ApiClient::new(config.api.client_config(), tokens).context("Failed to create API client")?;

    Ok(Arc::new(ToolSurface::new(Arc::new(client))))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    match cli.command.clone().unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let surface = build_surface(config)?;
            let server = Arc::new(McpServer::new(surface));
            run_stdio(server).await.context("MCP server failed")?;
        }
        Commands::Tools { json } => print_tools(json)?,
        Commands::Check => {
            let surface = build_surface(config)?;
            let envelope = check_connection(surface.client()).await;
            let rendered = serde_json::to_string_pretty(&envelope.to_json())?;
            if envelope.success {
                println!("{}", "Connection OK".green());
                println!("{}", rendered);
            } else {
                eprintln!("{}", "Connection check failed".red());
                eprintln!("{}", rendered);
                eyre::bail!("connection check failed");
            }
        }
    }
    Ok(())
}

fn print_tools(json: bool) -> Result<()> {
    // Definitions are static; no connection is needed to list them
    let definitions: Vec<_> = airtable_mcp::catalog::operations()
        .iter()
        .map(airtable_mcp::tools::ToolDefinition::from_operation)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    for def in &definitions {
        let required = def.required();
        println!("{} {}", def.name.cyan().bold(), def.description);
        if !required.is_empty() {
            println!("    {} {}", "required:".yellow(), required.join(", "));
        }
    }
    println!(
        "\n{} tools (plus {})",
        definitions.len(),
        airtable_mcp::tools::CHECK_CONNECTION.green()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let level = if cli.is_verbose() { "debug" } else { config.log_level() };
    setup_logging(level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
