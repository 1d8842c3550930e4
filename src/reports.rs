use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::filter::{self, TimePeriod};
use crate::fmt::{day_abbrev, month_abbrev};
use crate::insights::{self, InsightReport};
use crate::models::{Category, SalesLine};
use crate::store::TransactionStore;

// ---------------------------------------------------------------------------
// Shared aggregates
// ---------------------------------------------------------------------------

/// `part` as a percentage of `whole`; 0.0 when `whole` is zero.
pub fn pct_of(part: f64, whole: f64) -> f64 {
    if whole != 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn total_revenue(lines: &[&SalesLine]) -> f64 {
    lines.iter().fold(0.0, |acc, l| acc + l.total_price)
}

/// Revenue per basket, keyed by transaction id.
pub fn basket_totals<'a>(lines: &[&'a SalesLine]) -> BTreeMap<&'a str, f64> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for l in lines {
        *totals.entry(l.transaction_id.as_str()).or_default() += l.total_price;
    }
    totals
}

/// Mean basket revenue; 0.0 when there are no transactions.
pub fn average_basket(lines: &[&SalesLine]) -> f64 {
    let totals = basket_totals(lines);
    if totals.is_empty() {
        return 0.0;
    }
    totals.values().sum::<f64>() / totals.len() as f64
}

/// Number of distinct transactions per customer.
pub fn customer_transaction_counts<'a>(lines: &[&'a SalesLine]) -> BTreeMap<&'a str, usize> {
    let mut baskets: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for l in lines {
        baskets
            .entry(l.customer_id.as_str())
            .or_default()
            .insert(l.transaction_id.as_str());
    }
    baskets.into_iter().map(|(c, txns)| (c, txns.len())).collect()
}

pub fn revenue_by_category(lines: &[&SalesLine]) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();
    for l in lines {
        *totals.entry(l.category).or_default() += l.total_price;
    }
    totals
}

/// Revenue per product, with the category each product is sold under.
pub fn revenue_by_product<'a>(lines: &[&'a SalesLine]) -> BTreeMap<&'a str, (Category, f64)> {
    let mut totals: BTreeMap<&str, (Category, f64)> = BTreeMap::new();
    for l in lines {
        totals.entry(l.product.as_str()).or_insert((l.category, 0.0)).1 += l.total_price;
    }
    totals
}

/// Revenue per weekday, Monday = 0.
pub fn revenue_by_weekday(lines: &[&SalesLine]) -> BTreeMap<u32, f64> {
    let mut totals = BTreeMap::new();
    for l in lines {
        *totals.entry(l.date.weekday().num_days_from_monday()).or_default() += l.total_price;
    }
    totals
}

/// Revenue per calendar month number (1-12), all years folded together.
pub fn revenue_by_month(lines: &[&SalesLine]) -> BTreeMap<u32, f64> {
    let mut totals = BTreeMap::new();
    for l in lines {
        *totals.entry(l.date.month()).or_default() += l.total_price;
    }
    totals
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub total_revenue: f64,
    pub transactions: usize,
    pub avg_basket: f64,
    pub customers: usize,
    pub line_items: usize,
}

pub fn get_metrics(lines: &[&SalesLine]) -> Metrics {
    Metrics {
        total_revenue: total_revenue(lines),
        transactions: basket_totals(lines).len(),
        avg_basket: average_basket(lines),
        customers: customer_transaction_counts(lines).len(),
        line_items: lines.len(),
    }
}

// ---------------------------------------------------------------------------
// Revenue over time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn for_period(period: TimePeriod) -> Self {
        match period {
            TimePeriod::Last30Days | TimePeriod::Last90Days => Self::Day,
            TimePeriod::Last6Months => Self::Week,
            TimePeriod::LastYear | TimePeriod::AllTime => Self::Month,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Day => "Daily Revenue",
            Self::Week => "Weekly Revenue",
            Self::Month => "Monthly Revenue",
        }
    }

    /// First day of the bucket containing `date`. Weeks start on Monday.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }

    fn next_bucket(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => start.succ_opt(),
            Self::Week => start.checked_add_signed(Duration::days(7)),
            Self::Month => start.checked_add_months(Months::new(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub bucket: NaiveDate,
    pub revenue: f64,
    pub transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub granularity: Granularity,
    pub points: Vec<TimePoint>,
}

/// Revenue and distinct-transaction counts per bucket, oldest first.
///
/// Daily series list only days with sales. Weekly and monthly series are
/// contiguous between the first and last bucket, with empty buckets at zero.
pub fn get_time_series(lines: &[&SalesLine], granularity: Granularity) -> TimeSeries {
    let mut buckets: BTreeMap<NaiveDate, (f64, BTreeSet<&str>)> = BTreeMap::new();
    for l in lines {
        let entry = buckets.entry(granularity.bucket_start(l.date)).or_default();
        entry.0 += l.total_price;
        entry.1.insert(l.transaction_id.as_str());
    }

    if granularity != Granularity::Day {
        if let (Some(first), Some(last)) = (buckets.keys().next().copied(), buckets.keys().next_back().copied()) {
            let mut cursor = granularity.next_bucket(first);
            while let Some(d) = cursor.filter(|d| *d < last) {
                buckets.entry(d).or_default();
                cursor = granularity.next_bucket(d);
            }
        }
    }

    let points = buckets
        .into_iter()
        .map(|(bucket, (revenue, txns))| TimePoint {
            bucket,
            revenue,
            transactions: txns.len(),
        })
        .collect();

    TimeSeries { granularity, points }
}

// ---------------------------------------------------------------------------
// Category shares
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub revenue: f64,
    pub pct: f64,
}

/// Revenue per category, largest first; ties broken by name.
pub fn get_category_shares(lines: &[&SalesLine]) -> Vec<CategoryShare> {
    let total = total_revenue(lines);
    let mut shares: Vec<CategoryShare> = revenue_by_category(lines)
        .into_iter()
        .map(|(category, revenue)| CategoryShare {
            category,
            revenue,
            pct: pct_of(revenue, total),
        })
        .collect();
    shares.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.category.name().cmp(b.category.name()))
    });
    shares
}

// ---------------------------------------------------------------------------
// Top products
// ---------------------------------------------------------------------------

pub const TOP_PRODUCTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotal {
    pub product: String,
    pub category: Category,
    pub revenue: f64,
}

/// Products ranked by revenue; ties broken by name.
pub fn rank_products(lines: &[&SalesLine]) -> Vec<ProductTotal> {
    let mut ranked: Vec<ProductTotal> = revenue_by_product(lines)
        .into_iter()
        .map(|(product, (category, revenue))| ProductTotal {
            product: product.to_string(),
            category,
            revenue,
        })
        .collect();
    ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue).then_with(|| a.product.cmp(&b.product)));
    ranked
}

pub fn get_top_products(lines: &[&SalesLine]) -> Vec<ProductTotal> {
    let mut ranked = rank_products(lines);
    ranked.truncate(TOP_PRODUCTS);
    ranked
}

// ---------------------------------------------------------------------------
// Seasonal trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLabel {
    pub month: u32,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalPoint {
    pub month: u32,
    pub category: Category,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonalTrend {
    /// Months with at least one sale, January first.
    pub months: Vec<MonthLabel>,
    pub points: Vec<SeasonalPoint>,
}

impl SeasonalTrend {
    pub fn revenue(&self, month: u32, category: Category) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.month == month && p.category == category)
            .map(|p| p.revenue)
    }

    /// Categories that appear in any month, catalog order.
    pub fn categories(&self) -> Vec<Category> {
        self.points
            .iter()
            .map(|p| p.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

pub fn get_seasonal_trend(lines: &[&SalesLine]) -> SeasonalTrend {
    let mut totals: BTreeMap<(u32, Category), f64> = BTreeMap::new();
    for l in lines {
        *totals.entry((l.date.month(), l.category)).or_default() += l.total_price;
    }

    let months = totals
        .keys()
        .map(|(m, _)| *m)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|month| MonthLabel {
            month,
            label: month_abbrev(month),
        })
        .collect();
    let points = totals
        .into_iter()
        .map(|((month, category), revenue)| SeasonalPoint {
            month,
            category,
            revenue,
        })
        .collect();

    SeasonalTrend { months, points }
}

// ---------------------------------------------------------------------------
// Weekly pattern
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayTotal {
    /// Monday = 0
    pub day: u32,
    pub label: &'static str,
    pub revenue: f64,
    pub transactions: usize,
}

pub fn get_weekly_pattern(lines: &[&SalesLine]) -> Vec<WeekdayTotal> {
    let mut days: BTreeMap<u32, (f64, BTreeSet<&str>)> = BTreeMap::new();
    for l in lines {
        let entry = days.entry(l.date.weekday().num_days_from_monday()).or_default();
        entry.0 += l.total_price;
        entry.1.insert(l.transaction_id.as_str());
    }
    days.into_iter()
        .map(|(day, (revenue, txns))| WeekdayTotal {
            day,
            label: day_abbrev(day),
            revenue,
            transactions: txns.len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Customer purchase frequency
// ---------------------------------------------------------------------------

/// Lower bound and label of each frequency bin. A customer lands in the bin
/// with the largest lower bound not above their transaction count.
pub const FREQUENCY_BINS: [(usize, &str); 8] = [
    (1, "1"),
    (2, "2"),
    (3, "3"),
    (4, "4-5"),
    (6, "6-10"),
    (11, "11-20"),
    (21, "21-50"),
    (51, "51+"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyBin {
    pub label: &'static str,
    pub customers: usize,
}

/// Index into `FREQUENCY_BINS` for a transaction count; `None` for zero.
pub fn frequency_bin(count: usize) -> Option<usize> {
    FREQUENCY_BINS.iter().rposition(|(lo, _)| *lo <= count)
}

pub fn get_frequency_histogram(lines: &[&SalesLine]) -> Vec<FrequencyBin> {
    let mut counts = [0usize; FREQUENCY_BINS.len()];
    for n in customer_transaction_counts(lines).into_values() {
        if let Some(idx) = frequency_bin(n) {
            counts[idx] += 1;
        }
    }
    FREQUENCY_BINS
        .iter()
        .zip(counts)
        .map(|(&(_, label), customers)| FrequencyBin { label, customers })
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub period: TimePeriod,
    pub categories: Vec<Category>,
    pub metrics: Metrics,
    pub time_series: TimeSeries,
    pub category_shares: Vec<CategoryShare>,
    pub top_products: Vec<ProductTotal>,
    pub seasonal_trend: SeasonalTrend,
    pub weekly_pattern: Vec<WeekdayTotal>,
    pub frequency_histogram: Vec<FrequencyBin>,
    pub insights: InsightReport,
}

/// Filter the store and compute every dashboard view from the same subset.
pub fn compute_dashboard(store: &TransactionStore, period: TimePeriod, categories: &[Category]) -> Dashboard {
    let lines = filter::apply(store, period, categories);

    let mut selected: Vec<Category> = if categories.is_empty() {
        Category::ALL.to_vec()
    } else {
        categories.to_vec()
    };
    selected.sort();
    selected.dedup();

    let dashboard = Dashboard {
        period,
        categories: selected,
        metrics: get_metrics(&lines),
        time_series: get_time_series(&lines, Granularity::for_period(period)),
        category_shares: get_category_shares(&lines),
        top_products: get_top_products(&lines),
        seasonal_trend: get_seasonal_trend(&lines),
        weekly_pattern: get_weekly_pattern(&lines),
        frequency_histogram: get_frequency_histogram(&lines),
        insights: insights::generate(&lines),
    };
    debug!(
        revenue = dashboard.metrics.total_revenue,
        transactions = dashboard.metrics.transactions,
        "computed dashboard"
    );
    dashboard
}
