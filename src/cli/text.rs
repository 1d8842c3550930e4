use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::fmt::{money, number, pct};
use crate::insights::InsightReport;
use crate::models::Category;
use crate::reports::{
    CategoryShare, Dashboard, FrequencyBin, Metrics, ProductTotal, SeasonalTrend, TimeSeries, WeekdayTotal,
};

const WRAP_WIDTH: usize = 88;

fn right(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn categories_label(categories: &[Category]) -> String {
    if categories.len() == Category::ALL.len() {
        "all categories".to_string()
    } else {
        categories.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

pub fn format_metrics(m: &Metrics) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Total Revenue", "Total Transactions", "Avg. Basket Size"]);
    table.add_row(vec![
        Cell::new(money(m.total_revenue)),
        Cell::new(number(m.transactions)),
        Cell::new(money(m.avg_basket)),
    ]);
    table.to_string()
}

pub fn format_time_series(series: &TimeSeries) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Period Start", "Revenue", "Transactions"]);
    for p in &series.points {
        table.add_row(vec![
            Cell::new(p.bucket.format("%Y-%m-%d")),
            right(money(p.revenue)),
            right(number(p.transactions)),
        ]);
    }
    format!("{}\n{table}", series.granularity.title())
}

pub fn format_category_shares(shares: &[CategoryShare]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Revenue", "%"]);
    for s in shares {
        table.add_row(vec![Cell::new(s.category), right(money(s.revenue)), right(pct(s.pct))]);
    }
    format!("Sales by Category\n{table}")
}

pub fn format_top_products(products: &[ProductTotal]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Product", "Category", "Revenue"]);
    for (i, p) in products.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&p.product),
            Cell::new(p.category),
            right(money(p.revenue)),
        ]);
    }
    format!("Top 10 Best-Selling Products\n{table}")
}

/// Category rows by month columns; blank where a category sold nothing.
pub fn format_seasonal(trend: &SeasonalTrend) -> String {
    let mut table = Table::new();
    let mut header = vec!["Category".to_string()];
    header.extend(trend.months.iter().map(|m| m.label.to_string()));
    table.set_header(header);
    for category in trend.categories() {
        let mut row = vec![Cell::new(category)];
        for m in &trend.months {
            let cell = trend.revenue(m.month, category).map(money).unwrap_or_default();
            row.push(right(cell));
        }
        table.add_row(row);
    }
    format!("Seasonal Trends\n{table}")
}

pub fn format_weekly(days: &[WeekdayTotal]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Day", "Revenue", "Transactions"]);
    for d in days {
        table.add_row(vec![Cell::new(d.label), right(money(d.revenue)), right(number(d.transactions))]);
    }
    format!("Weekly Sales Pattern\n{table}")
}

pub fn format_frequency(bins: &[FrequencyBin]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Purchases", "Customers"]);
    for b in bins {
        table.add_row(vec![Cell::new(b.label), right(number(b.customers))]);
    }
    format!("Customer Purchasing Frequency\n{table}")
}

pub fn format_insights(report: &InsightReport) -> String {
    if report.is_empty() {
        return "No sales match the selected filters.".to_string();
    }

    let opts = textwrap::Options::new(WRAP_WIDTH)
        .initial_indent("  ")
        .subsequent_indent("    ");

    let mut out = format!("{}\n", "Key Insights:".bold());
    for i in &report.insights {
        let para = format!("{} {}", format!("{}:", i.title).bold(), i.text);
        out.push_str(&textwrap::fill(&para, &opts));
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n", "Recommendations:".bold()));
    for (n, r) in report.recommendations.iter().enumerate() {
        let para = format!("{} {}", format!("{}. {}:", n + 1, r.title).bold(), r.text);
        out.push_str(&textwrap::fill(&para, &opts));
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn format_dashboard(d: &Dashboard) -> String {
    let title = format!(
        "Pet Shop Sales Analysis: {} ({})",
        d.period.label(),
        categories_label(&d.categories)
    );
    let sections = [
        format!("{}\n{}", title.bold(), format_metrics(&d.metrics)),
        format_time_series(&d.time_series),
        format_category_shares(&d.category_shares),
        format_top_products(&d.top_products),
        format_seasonal(&d.seasonal_trend),
        format_weekly(&d.weekly_pattern),
        format_frequency(&d.frequency_histogram),
        format!("Business Insights & Recommendations\n{}", format_insights(&d.insights)),
    ];
    sections.join("\n\n")
}
