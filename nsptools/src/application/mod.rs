pub mod handlers;

use crate::config::Config;
use crate::presentation::cli::{Cli, Commands};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Split {
            file,
            part_size_mib,
            overwrite,
        } => handlers::handle_split(file, part_size_mib, overwrite, &config, cli.plain),
        Commands::Combine { dir } => handlers::handle_combine(dir, &config, cli.plain),
        Commands::Parts { dir } => handlers::handle_parts(dir, &config),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
