pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod fetchers;
pub mod filter;
pub mod http;
pub mod pagination;
pub mod rate_limiter;
pub mod services;
pub mod store;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::AppConfig;
use crate::services::ingestion::IngestionService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_update(max_pages: usize, min_delay: f64, max_delay: f64) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let mut service = IngestionService::new(&config, max_pages, min_delay, max_delay)?;
        service.run().await
    })
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_dashboard() -> Result<()> {
    let config = AppConfig::new();
    dashboard::run(&config)
}
