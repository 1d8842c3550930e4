use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::info;

use crate::error::Result;
use crate::models::{round_cents, Category, SalesLine};

pub const DEFAULT_SEED: u64 = 42;
const NUM_CUSTOMERS: usize = 200;

/// Relative category popularity, in `Category::ALL` order.
const CATEGORY_WEIGHTS: [f64; 8] = [0.25, 0.20, 0.15, 0.15, 0.10, 0.05, 0.05, 0.05];

/// Traffic multiplier per weekday, Monday first. Weekends are busier.
const WEEKLY_PATTERN: [f64; 7] = [0.8, 0.7, 0.9, 1.0, 1.2, 1.5, 1.3];

/// Largest seasonal multiplier in the catalog; an item is kept with
/// probability `factor / PEAK_SEASON`.
const PEAK_SEASON: f64 = 1.6;

const MEAN_DAILY_TRANSACTIONS: f64 = 25.0;
const MEAN_EXTRA_ITEMS: f64 = 2.0;
const DISCOUNT_RATE: f64 = 0.1;

pub struct GeneratorOptions {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub seed: u64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap_or_default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Knuth's method; fine for the small means used here.
fn poisson(rng: &mut StdRng, lambda: f64) -> u32 {
    let limit = (-lambda).exp();
    let mut k = 0u32;
    let mut p = rng.gen::<f64>();
    while p > limit {
        k += 1;
        p *= rng.gen::<f64>();
    }
    k
}

/// Number of trials up to and including the first success.
fn geometric(rng: &mut StdRng, p: f64) -> u32 {
    let mut n = 1;
    while !rng.gen_bool(p) {
        n += 1;
    }
    n
}

/// Build a synthetic sales log in the same shape as a real export.
pub fn generate(opts: &GeneratorOptions) -> Vec<SalesLine> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let customers: Vec<String> = (1..=NUM_CUSTOMERS).map(|i| format!("CUST-{i:04}")).collect();
    let category_dist = WeightedIndex::new(CATEGORY_WEIGHTS).expect("category weights are positive");

    let mut lines = Vec::new();
    let mut next_txn = 1u32;

    for date in opts.start.iter_days().take_while(|d| *d <= opts.end) {
        let month_idx = date.month0() as usize;
        let base = poisson(&mut rng, MEAN_DAILY_TRANSACTIONS) as f64;
        let daily = (base * WEEKLY_PATTERN[date.weekday().num_days_from_monday() as usize]) as u32;

        for _ in 0..daily {
            let customer = &customers[rng.gen_range(0..customers.len())];
            let transaction_id = format!("TXN-{next_txn:06}");
            let basket_size = poisson(&mut rng, MEAN_EXTRA_ITEMS) + 1;
            let mut added = 0;

            for _ in 0..basket_size {
                let category = Category::ALL[category_dist.sample(&mut rng)];
                if !rng.gen_bool(category.seasonal_factors()[month_idx] / PEAK_SEASON) {
                    continue;
                }

                let product = category.products()[rng.gen_range(0..category.products().len())];
                let (lo, hi) = category.price_range();
                let unit_price = round_cents(rng.gen_range(lo..hi));
                let quantity = geometric(&mut rng, 0.7);
                let gross = round_cents(quantity as f64 * unit_price);
                let discount = if rng.gen_bool(DISCOUNT_RATE) {
                    round_cents(gross * rng.gen_range(0.05..0.25))
                } else {
                    0.0
                };

                lines.push(SalesLine {
                    transaction_id: transaction_id.clone(),
                    date,
                    customer_id: customer.clone(),
                    category,
                    product: product.to_string(),
                    quantity,
                    unit_price,
                    total_price: round_cents(gross - discount),
                    discount,
                });
                added += 1;
            }

            // a basket whose items were all skipped never happened
            if added > 0 {
                next_txn += 1;
            }
        }
    }

    info!(seed = opts.seed, rows = lines.len(), transactions = next_txn - 1, "generated sample data");
    lines
}

/// Write sales lines as CSV with the standard header, including `discount`.
pub fn write_csv(path: &Path, lines: &[SalesLine]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    for line in lines {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}
