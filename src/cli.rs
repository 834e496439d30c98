use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::capacity::CapacityCache;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::feeds::FeedClient;
use crate::output::{print_summary, FetchProgress};
use crate::server::{self, AppState};

#[derive(Parser)]
#[command(name = "zuul-queue-status")]
#[command(author, version, about = "Zuul gating queue dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./zuul-status.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long, env = "ZUUL_STATUS_HOST")]
        host: Option<IpAddr>,

        #[arg(short, long, env = "ZUUL_STATUS_PORT")]
        port: Option<u16>,
    },
    /// Print the current status of one queue
    Show {
        #[arg(short, long)]
        queue: Option<String>,

        /// Write JSON to this file instead of printing a table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,

        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

impl Cli {
    fn dashboard(config: &Config) -> Result<Dashboard> {
        let feeds = FeedClient::new(
            &config.feeds.status_url,
            &config.feeds.capacity_url,
            Duration::from_secs(config.feeds.timeout_secs),
        )?;
        let capacity = CapacityCache::new(
            config.capacity.pools.clone(),
            chrono::Duration::minutes(config.capacity.refresh_minutes),
        );
        Ok(Dashboard::new(feeds, capacity))
    }

    async fn execute_serve(
        &self,
        config: Config,
        host: Option<IpAddr>,
        port: Option<u16>,
    ) -> Result<()> {
        let host = match host {
            Some(host) => host,
            None => config
                .server
                .host
                .parse()
                .with_context(|| format!("Invalid server host: {}", config.server.host))?,
        };
        let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

        info!(
            "Watching {} with capacity from {} pools",
            config.feeds.status_url,
            config.capacity.pools.len()
        );

        let state = AppState::new(Self::dashboard(&config)?, config.server.default_queue);
        server::serve(state, addr).await
    }

    async fn execute_show(
        &self,
        config: Config,
        queue: Option<&str>,
        output: Option<&PathBuf>,
        json: bool,
        pretty: bool,
    ) -> Result<()> {
        let queue_name = queue.unwrap_or(&config.server.default_queue);
        let dashboard = Self::dashboard(&config)?;

        let progress = FetchProgress::start(queue_name);
        let view = match dashboard.queue_view(queue_name).await {
            Ok(view) => {
                progress.finish();
                view
            }
            Err(e) => {
                progress.abandon();
                return Err(e).with_context(|| format!("Failed to load queue {queue_name}"));
            }
        };

        if !json && output.is_none() {
            print_summary(&view);
            return Ok(());
        }

        let json_output = if pretty {
            serde_json::to_string_pretty(&view)?
        } else {
            serde_json::to_string(&view)?
        };

        if let Some(output_path) = output {
            std::fs::write(output_path, json_output)?;
            info!("Queue status written to: {}", output_path.display());
        } else {
            println!("{}", json_output);
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Serve { host, port } => self.execute_serve(config, *host, *port).await,
            Commands::Show {
                queue,
                output,
                json,
                pretty,
            } => {
                self.execute_show(config, queue.as_deref(), output.as_ref(), *json, *pretty)
                    .await
            }
        }
    }
}
