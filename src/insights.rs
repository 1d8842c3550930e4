//! Plain-language observations and recommendations derived from a filtered
//! set of sales lines.
//!
//! Every observation is computed from the same lines the dashboard views use,
//! through the shared aggregates in [`crate::reports`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fmt::{day_name, money, month_name};
use crate::models::SalesLine;
use crate::reports::{
    average_basket, customer_transaction_counts, get_category_shares, pct_of, rank_products, revenue_by_month,
    revenue_by_weekday, total_revenue,
};

/// Seasonal best/worst months are only reported above this many distinct months.
pub const SEASONAL_MIN_MONTHS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub title: String,
    pub text: String,
}

impl Insight {
    fn new(title: &str, text: String) -> Self {
        Self {
            title: title.to_string(),
            text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Insight>,
}

impl InsightReport {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.recommendations.is_empty()
    }
}

/// Key with the highest value; the smallest key wins a tie.
fn best_key(totals: &BTreeMap<u32, f64>) -> Option<u32> {
    totals
        .iter()
        .fold(None, |acc: Option<(u32, f64)>, (&k, &v)| match acc {
            Some((_, best)) if best >= v => acc,
            _ => Some((k, v)),
        })
        .map(|(k, _)| k)
}

/// Key with the lowest value; the smallest key wins a tie.
fn worst_key(totals: &BTreeMap<u32, f64>) -> Option<u32> {
    totals
        .iter()
        .fold(None, |acc: Option<(u32, f64)>, (&k, &v)| match acc {
            Some((_, worst)) if worst <= v => acc,
            _ => Some((k, v)),
        })
        .map(|(k, _)| k)
}

/// Share of customers with more than one distinct transaction, as a percentage.
pub fn repeat_customer_pct(lines: &[&SalesLine]) -> f64 {
    let counts = customer_transaction_counts(lines);
    let repeat = counts.values().filter(|n| **n > 1).count();
    pct_of(repeat as f64, counts.len() as f64)
}

/// Build the ordered observations and recommendations for `lines`.
///
/// Returns an empty report when there are no lines.
pub fn generate(lines: &[&SalesLine]) -> InsightReport {
    let total = total_revenue(lines);
    let (Some(top_category), Some(top_product)) =
        (get_category_shares(lines).into_iter().next(), rank_products(lines).into_iter().next())
    else {
        return InsightReport::default();
    };

    let by_day = revenue_by_weekday(lines);
    let (best_day, worst_day) = match (best_key(&by_day), worst_key(&by_day)) {
        (Some(b), Some(w)) => (day_name(b), day_name(w)),
        _ => return InsightReport::default(),
    };

    let by_month = revenue_by_month(lines);
    let seasonal = if by_month.len() > SEASONAL_MIN_MONTHS {
        best_key(&by_month)
            .zip(worst_key(&by_month))
            .map(|(b, w)| (month_name(b), month_name(w)))
    } else {
        None
    };

    let mut insights = vec![
        Insight::new(
            "Top Performing Category",
            format!(
                "{} accounts for {} in sales ({:.1}% of total revenue).",
                top_category.category,
                money(top_category.revenue),
                top_category.pct
            ),
        ),
        Insight::new(
            "Best-Selling Product",
            format!(
                "{} generates {} in sales ({:.1}% of total revenue).",
                top_product.product,
                money(top_product.revenue),
                pct_of(top_product.revenue, total)
            ),
        ),
        Insight::new(
            "Weekly Sales Pattern",
            format!(
                "{best_day} is the highest-grossing day, while {worst_day} has the lowest sales. \
                 Consider running promotions on slower days to boost traffic and revenue."
            ),
        ),
    ];
    if let Some((best_month, worst_month)) = seasonal {
        insights.push(Insight::new(
            "Seasonal Trends",
            format!(
                "{best_month} shows the highest sales, while {worst_month} has the lowest. \
                 Plan inventory and staffing accordingly for these seasonal fluctuations."
            ),
        ));
    }
    insights.push(Insight::new(
        "Basket Size",
        format!(
            "The average transaction value is ${:.2}. \
             Consider implementing cross-selling strategies to increase basket size.",
            average_basket(lines)
        ),
    ));
    insights.push(Insight::new(
        "Customer Loyalty",
        format!(
            "{:.1}% of customers are repeat shoppers. \
             Implement a loyalty program to increase customer retention and frequency.",
            repeat_customer_pct(lines)
        ),
    ));

    let mut recommendations = vec![Insight::new(
        "Inventory Optimization",
        format!(
            "Focus on maintaining optimal stock levels for top-selling products, especially {} \
             and other items in the {} category.",
            top_product.product, top_category.category
        ),
    )];
    if let Some((_, worst_month)) = seasonal {
        recommendations.push(Insight::new(
            "Marketing Strategy",
            format!(
                "Increase marketing efforts during {worst_day} and {worst_month} \
                 to boost sales during slower periods."
            ),
        ));
    }
    recommendations.extend([
        Insight::new(
            "Customer Retention",
            "Implement a customer loyalty program with personalized offers based on purchase history \
             to increase repeat business."
                .to_string(),
        ),
        Insight::new(
            "Cross-Selling",
            "Train staff to suggest complementary products to increase average transaction value.".to_string(),
        ),
        Insight::new(
            "Seasonal Promotions",
            "Plan seasonal promotions and product bundles to capitalize on peak selling periods \
             and mitigate slow seasons."
                .to_string(),
        ),
    ]);

    InsightReport {
        insights,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn sale(txn: &str, (y, m, d): (i32, u32, u32), customer: &str, category: Category, total: f64) -> SalesLine {
        SalesLine {
            transaction_id: txn.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            customer_id: customer.to_string(),
            category,
            product: category.products()[0].to_string(),
            quantity: 1,
            unit_price: total,
            total_price: total,
            discount: 0.0,
        }
    }

    fn titles(items: &[Insight]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    fn two_month_lines() -> Vec<SalesLine> {
        vec![
            // 2024-05-06 Mon, 2024-05-11 Sat, 2024-06-04 Tue
            sale("T1", (2024, 5, 6), "C1", Category::DogFood, 40.0),
            sale("T2", (2024, 5, 11), "C1", Category::CatFood, 80.0),
            sale("T3", (2024, 6, 4), "C2", Category::DogFood, 30.0),
        ]
    }

    fn five_month_lines() -> Vec<SalesLine> {
        vec![
            sale("T1", (2024, 1, 8), "C1", Category::DogFood, 50.0),
            sale("T2", (2024, 2, 12), "C2", Category::DogFood, 20.0),
            sale("T3", (2024, 3, 11), "C1", Category::CatToys, 10.0),
            sale("T4", (2024, 4, 13), "C3", Category::DogFood, 90.0),
            sale("T5", (2024, 5, 18), "C3", Category::HealthProducts, 30.0),
        ]
    }

    #[test]
    fn test_two_months_omit_seasonal_insight_and_marketing() {
        let lines = two_month_lines();
        let refs: Vec<&SalesLine> = lines.iter().collect();
        let report = generate(&refs);
        assert_eq!(
            titles(&report.insights),
            vec![
                "Top Performing Category",
                "Best-Selling Product",
                "Weekly Sales Pattern",
                "Basket Size",
                "Customer Loyalty"
            ]
        );
        assert_eq!(
            titles(&report.recommendations),
            vec!["Inventory Optimization", "Customer Retention", "Cross-Selling", "Seasonal Promotions"]
        );
        assert!(report.recommendations.iter().all(|r| !r.text.contains("slower months")));
    }

    #[test]
    fn test_exactly_three_months_still_omits_seasonal() {
        let lines = five_month_lines();
        let refs: Vec<&SalesLine> = lines.iter().take(3).collect();
        let report = generate(&refs);
        assert!(!titles(&report.insights).contains(&"Seasonal Trends"));
    }

    #[test]
    fn test_more_than_three_months_reports_seasonal() {
        let lines = five_month_lines();
        let refs: Vec<&SalesLine> = lines.iter().collect();
        let report = generate(&refs);
        assert_eq!(report.insights.len(), 6);
        assert_eq!(report.insights[3].title, "Seasonal Trends");
        assert!(report.insights[3].text.starts_with("April shows the highest sales, while March has the lowest."));
        assert_eq!(report.recommendations.len(), 5);
        assert_eq!(report.recommendations[1].title, "Marketing Strategy");
        assert!(report.recommendations[1].text.contains("March"));
    }

    #[test]
    fn test_category_product_and_day_text() {
        let lines = two_month_lines();
        let refs: Vec<&SalesLine> = lines.iter().collect();
        let report = generate(&refs);
        assert_eq!(
            report.insights[0].text,
            "Cat Food accounts for $80.00 in sales (53.3% of total revenue)."
        );
        assert_eq!(
            report.insights[1].text,
            "Premium Cat Kibble generates $80.00 in sales (53.3% of total revenue)."
        );
        assert!(report.insights[2].text.starts_with("Saturday is the highest-grossing day, while Tuesday"));
        assert!(report.insights[3].text.starts_with("The average transaction value is $50.00."));
        assert!(report.insights[4].text.starts_with("50.0% of customers are repeat shoppers."));
        assert!(report.recommendations[0].text.contains("Premium Cat Kibble"));
        assert!(report.recommendations[0].text.contains("Cat Food category"));
    }

    #[test]
    fn test_basket_insight_matches_aggregation() {
        let lines = five_month_lines();
        let refs: Vec<&SalesLine> = lines.iter().collect();
        let report = generate(&refs);
        let basket = report.insights.iter().find(|i| i.title == "Basket Size").unwrap();
        let expected = format!("${:.2}", crate::reports::get_metrics(&refs).avg_basket);
        assert!(basket.text.contains(&expected), "{} vs {expected}", basket.text);
    }

    #[test]
    fn test_basket_amount_has_no_thousands_separator() {
        let lines = vec![
            sale("T1", (2024, 5, 6), "C1", Category::GroomingServices, 1000.0),
            sale("T2", (2024, 5, 7), "C2", Category::GroomingServices, 1469.0),
        ];
        let refs: Vec<&SalesLine> = lines.iter().collect();
        let report = generate(&refs);
        let basket = report.insights.iter().find(|i| i.title == "Basket Size").unwrap();
        assert!(basket.text.starts_with("The average transaction value is $1234.50."), "{}", basket.text);
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let report = generate(&[]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_zero_revenue_does_not_produce_nan() {
        let lines = vec![
            sale("T1", (2024, 5, 6), "C1", Category::DogToys, 0.0),
            sale("T2", (2024, 5, 7), "C2", Category::CatToys, 0.0),
        ];
        let refs: Vec<&SalesLine> = lines.iter().collect();
        let report = generate(&refs);
        assert!(report.insights.iter().all(|i| !i.text.contains("NaN")));
        assert!(report.insights[0].text.contains("(0.0% of total revenue)"));
        // ties resolve to the earliest weekday
        assert!(report.insights[2].text.starts_with("Monday is the highest-grossing day, while Monday"));
    }

    #[test]
    fn test_repeat_customer_pct() {
        let lines = five_month_lines();
        let refs: Vec<&SalesLine> = lines.iter().collect();
        // C1 and C3 have two baskets each, C2 one
        assert!((repeat_customer_pct(&refs) - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(repeat_customer_pct(&[]), 0.0);
    }

    #[test]
    fn test_best_and_worst_keys_break_ties_low() {
        let totals: BTreeMap<u32, f64> = [(2, 5.0), (0, 5.0), (4, 1.0), (6, 1.0)].into_iter().collect();
        assert_eq!(best_key(&totals), Some(0));
        assert_eq!(worst_key(&totals), Some(4));
        assert_eq!(best_key(&BTreeMap::new()), None);
    }
}
