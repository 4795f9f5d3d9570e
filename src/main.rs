mod catalog;
mod config;
mod data;
mod error;
mod occupancy;
mod planner;
mod server;
mod solver;
mod tiebreak;
mod validation;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = config::Args::parse();
    let catalog = args.load_catalog()?;

    server::run_server(&args, catalog).await
}
