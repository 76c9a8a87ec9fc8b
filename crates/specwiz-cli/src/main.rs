//! Specwiz CLI Application
//!
//! Terminal front end and MCP server for the spec wizard.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, SpecwizMcpServer};
use renderer::TerminalRenderer;
use specwiz_core::{Config, EngineBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        api_url,
        timeout,
        no_color,
        command,
    } = Args::parse();

    let config = Config::load().context("Failed to load configuration")?;
    let engine = EngineBuilder::new()
        .with_config(config)
        .with_api_url(api_url)
        .with_timeout_secs(timeout)
        .build()
        .context("Failed to initialize wizard engine")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Specwiz started");

    match command {
        Wizard(args) => Cli::new(engine, renderer).show_wizard(args).await,
        Step { command } => {
            Cli::new(engine, renderer)
                .handle_step_command(command)
                .await
        }
        Item { command } => {
            Cli::new(engine, renderer)
                .handle_item_command(command)
                .await
        }
        Job { command } => Cli::new(engine, renderer).handle_job_command(command).await,
        Serve => {
            info!("Starting Specwiz MCP server");
            run_stdio_server(SpecwizMcpServer::new(engine))
                .await
                .context("MCP server failed")
        }
    }
}
