use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{money, number};
use crate::generator::{self, GeneratorOptions};
use crate::reports::{get_category_shares, get_metrics};
use crate::settings::{data_file, shellexpand_path};

pub fn run(data: Option<&str>, output: Option<&str>, seed: u64) -> Result<()> {
    let path = match output {
        Some(p) => PathBuf::from(shellexpand_path(p)),
        None => data_file(data),
    };
    let opts = GeneratorOptions {
        seed,
        ..GeneratorOptions::default()
    };
    let lines = generator::generate(&opts);
    generator::write_csv(&path, &lines)?;

    let days = (opts.end - opts.start).num_days() + 1;
    println!("Generated {} sales records spanning {days} days", number(lines.len()));
    println!("Data saved to {}", path.display());

    let refs: Vec<_> = lines.iter().collect();
    let metrics = get_metrics(&refs);
    println!();
    println!("Total Revenue:       {}", money(metrics.total_revenue));
    println!("Total Transactions:  {}", number(metrics.transactions));
    println!("Total Customers:     {}", number(metrics.customers));
    println!("Date Range:          {} to {}", opts.start, opts.end);

    let mut table = Table::new();
    table.set_header(vec!["Category", "Revenue"]);
    for share in get_category_shares(&refs) {
        table.add_row(vec![Cell::new(share.category), Cell::new(money(share.revenue))]);
    }
    println!();
    println!("Sales by Category\n{table}");
    Ok(())
}
