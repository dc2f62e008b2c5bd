//! CLI definition and dispatch.

mod cache;
mod precache;
mod serve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use small_ai::Config;

#[derive(Debug, Parser)]
#[command(name = "small-ai", version, about = "Gemini proxy and offline asset cache")]
pub(crate) struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to config.toml (default: <config dir>/small-ai/config.toml).
    #[arg(long, global = true, env = "SMALL_AI_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run the proxy HTTP server.
    Serve {
        /// Bind address override.
        #[arg(long)]
        bind: Option<String>,
        /// Port override.
        #[arg(long)]
        port: Option<u16>,
        /// Directory to serve as the web app shell.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Install and activate the asset cache against the live network.
    Precache {
        /// Origin the app shell is served from.
        #[arg(long)]
        origin: Option<String>,
        /// Cache directory override.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
    /// List cache regions and their entries.
    Cache {
        /// Cache directory override.
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Command::Serve {
            bind,
            port,
            static_dir,
        } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if static_dir.is_some() {
                config.server.static_dir = static_dir;
            }
            serve::cmd_serve(config).await
        }
        Command::Precache { origin, cache_dir } => {
            if let Some(origin) = origin {
                config.worker.origin = origin;
            }
            if cache_dir.is_some() {
                config.worker.cache_dir = cache_dir;
            }
            precache::cmd_precache(config).await
        }
        Command::Cache { cache_dir } => {
            if cache_dir.is_some() {
                config.worker.cache_dir = cache_dir;
            }
            cache::cmd_cache(config).await
        }
    }
}
