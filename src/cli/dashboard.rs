use tracing::{info, warn};

use crate::cli::text;
use crate::cli::{FilterArgs, OutputFormat};
use crate::error::Result;
use crate::reports::{compute_dashboard, Dashboard};
use crate::settings::{data_file, load_settings};
use crate::store::TransactionStore;

fn build(data: Option<&str>, filters: &FilterArgs) -> Result<Dashboard> {
    let period = filters.period.unwrap_or(load_settings().default_period);
    let store = TransactionStore::load(&data_file(data))?;
    if store.is_empty() {
        warn!("sales file has a header but no rows");
    }
    info!(period = period.key(), categories = filters.categories.len(), "computing dashboard");
    Ok(compute_dashboard(&store, period, &filters.categories))
}

pub fn run(data: Option<&str>, filters: &FilterArgs, format: OutputFormat) -> Result<()> {
    let dashboard = build(data, filters)?;
    match format {
        OutputFormat::Text => println!("{}", text::format_dashboard(&dashboard)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
    }
    Ok(())
}

pub fn insights(data: Option<&str>, filters: &FilterArgs) -> Result<()> {
    let dashboard = build(data, filters)?;
    println!("{}", text::format_insights(&dashboard.insights));
    Ok(())
}
