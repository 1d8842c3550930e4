use crate::error::Result;
use crate::fmt::number;
use crate::reports::get_metrics;
use crate::settings::{data_file, load_settings, settings_path};
use crate::store::TransactionStore;

pub fn run(data: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let path = data_file(data);

    println!("Settings:        {}", settings_path().display());
    println!("Default period:  {}", settings.default_period.label());
    println!("Data file:       {}", path.display());

    if !path.exists() {
        println!();
        println!("Data file not found. Run `pawprint generate` to create sample data.");
        return Ok(());
    }

    let store = TransactionStore::load(&path)?;
    let lines: Vec<_> = store.lines().iter().collect();
    let metrics = get_metrics(&lines);

    println!();
    println!("Line items:      {}", number(store.len()));
    println!("Transactions:    {}", number(metrics.transactions));
    println!("Customers:       {}", number(metrics.customers));
    match store.date_range() {
        Some((lo, hi)) => println!("Date range:      {lo} to {hi}"),
        None => println!("Date range:      (empty)"),
    }
    Ok(())
}
