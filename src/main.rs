mod app;
mod cli;
mod config;
mod db;
mod paths;
mod timeline;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = config::load_config_or_default(cli.config.as_deref())?;

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "chanplan=debug".to_string()
        } else {
            config
                .log_filter
                .clone()
                .unwrap_or_else(|| "chanplan=info".to_string())
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    app::run(cli, &config)
}
