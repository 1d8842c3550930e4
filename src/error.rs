use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PawprintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sales data not found at {}. Run `pawprint generate` to create a sample file.", .0.display())]
    MissingData(PathBuf),

    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown time period: {0} (expected 30D, 90D, 6M, 1Y or ALL)")]
    UnknownPeriod(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, PawprintError>;
