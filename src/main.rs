mod app;
mod cli;
mod config;
mod db;
mod detection;
mod domain;
mod infrastructure;
mod ocr;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use infrastructure::{directories, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    logging::init_tracing(&config, &paths)?;

    let app = app::SpamLensApp::initialize(config, &paths).await?;
    app.run(cli.command).await
}
