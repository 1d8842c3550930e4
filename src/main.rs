mod cli;
mod error;
mod filter;
mod fmt;
mod generator;
mod insights;
mod models;
mod reports;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::{prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    // RUST_LOG wins over --verbose; logs go to stderr so stdout stays parseable
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data = cli.data.as_deref();
    let result = match cli.command {
        Commands::Dashboard { filters, format } => cli::dashboard::run(data, &filters, format),
        Commands::Insights { filters } => cli::dashboard::insights(data, &filters),
        Commands::Generate { output, seed } => cli::generate::run(data, output.as_deref(), seed),
        Commands::Status => cli::status::run(data),
        Commands::Config { data_file, period } => cli::config::run(data_file.as_deref(), period),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
