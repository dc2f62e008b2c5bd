//! small-ai command-line entry point.

mod cli;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = cli::Cli::parse();
    small_ai::logging::init_logging(args.log_json);
    cli::run(args).await
}
