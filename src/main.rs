use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use salesboard::cli::Cli;
use salesboard::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(&config, cli.is_interactive());
    config.log_source();
    cli.run(config)
}

fn init_tracing(config: &AppConfig, interactive: bool) {
    let env_filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .try_init();
        return;
    }

    // Keep the TUI clean: write tracing output to a file instead of the terminal.
    let path = config.log_file();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    // Logging stays off if the file cannot be opened
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init();
    }
}
