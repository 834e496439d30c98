mod aggregate;
mod capacity;
mod cli;
mod config;
mod dashboard;
mod error;
mod feeds;
mod output;
mod server;
mod time_format;
mod view;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting zuul-queue-status");
    cli.execute().await?;

    Ok(())
}
