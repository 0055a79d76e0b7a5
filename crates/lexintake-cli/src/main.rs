//! Lexintake CLI - Command-line interface for batch contract intake.

use clap::Parser;
use lexintake_cli::commands;
use lexintake_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so tables and JSON stay pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> lexintake_cli::Result<()> {
    let cli = Cli::parse();

    // Load or create config
    let config = Config::load().unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save().ok();
        cfg
    });

    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(cli.json, color_enabled);

    match cli.command {
        Command::Upload(args) => {
            commands::execute_upload(args, &config, &formatter).await?;
        }
        Command::List(args) => {
            commands::execute_list(args, &config, &formatter).await?;
        }
        Command::Columns(args) => {
            commands::execute_columns(args, &config, &formatter).await?;
        }
        Command::Chat => {
            commands::execute_chat(&config, &formatter).await?;
        }
        Command::Check => {
            commands::execute_check(&config, &formatter).await?;
        }
    }

    Ok(())
}
