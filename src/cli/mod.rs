pub mod config;
pub mod dashboard;
pub mod generate;
pub mod status;
pub mod text;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::filter::TimePeriod;
use crate::models::Category;

#[derive(Parser)]
#[command(name = "pawprint", about = "Sales analytics dashboard for a single pet shop.")]
pub struct Cli {
    /// Sales CSV to analyse (default: the configured data file)
    #[arg(long, global = true)]
    pub data: Option<String>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Time window: 30D, 90D, 6M, 1Y or ALL (default: configured period)
    #[arg(long)]
    pub period: Option<TimePeriod>,
    /// Restrict to a category; repeat for several (default: all)
    #[arg(long = "category")]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the full sales dashboard.
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show only the insights and recommendations.
    Insights {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write a synthetic sales file for demos.
    Generate {
        /// Output path (default: the configured data file)
        #[arg(long)]
        output: Option<String>,
        /// Random seed
        #[arg(long, default_value_t = crate::generator::DEFAULT_SEED)]
        seed: u64,
    },
    /// Show the data file and a summary of what it holds.
    Status,
    /// Show or change saved defaults.
    Config {
        /// Sales CSV used when --data is not given
        #[arg(long = "data-file")]
        data_file: Option<String>,
        /// Default time window
        #[arg(long)]
        period: Option<TimePeriod>,
    },
}
