use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{PawprintError, Result};
use crate::models::{Category, SalesLine};

/// Raw CSV row before validation. `discount` is optional and may be blank.
#[derive(Debug, Deserialize)]
struct RawRow {
    transaction_id: String,
    date: String,
    customer_id: String,
    category: String,
    product: String,
    quantity: i64,
    unit_price: f64,
    total_price: f64,
    #[serde(default)]
    discount: Option<f64>,
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component, which is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day_part = raw.split(|c| c == ' ' || c == 'T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

fn validate(raw: RawRow) -> std::result::Result<SalesLine, String> {
    let date = parse_date(&raw.date).ok_or_else(|| format!("unparseable date '{}'", raw.date))?;
    let category: Category = raw
        .category
        .parse()
        .map_err(|_| format!("unknown category '{}'", raw.category))?;
    if !category.has_product(&raw.product) {
        return Err(format!("product '{}' is not sold under {category}", raw.product));
    }
    if raw.transaction_id.trim().is_empty() {
        return Err("empty transaction_id".to_string());
    }
    if raw.quantity <= 0 {
        return Err(format!("quantity must be positive, got {}", raw.quantity));
    }
    if !(raw.unit_price > 0.0) {
        return Err(format!("unit_price must be positive, got {}", raw.unit_price));
    }
    if !(raw.total_price >= 0.0) {
        return Err(format!("total_price must not be negative, got {}", raw.total_price));
    }
    let discount = raw.discount.unwrap_or(0.0);
    if !(discount >= 0.0) {
        return Err(format!("discount must not be negative, got {discount}"));
    }

    Ok(SalesLine {
        transaction_id: raw.transaction_id,
        date,
        customer_id: raw.customer_id,
        category,
        product: raw.product,
        quantity: u32::try_from(raw.quantity).map_err(|_| format!("quantity too large: {}", raw.quantity))?,
        unit_price: raw.unit_price,
        total_price: raw.total_price,
        discount,
    })
}

/// Immutable, in-memory collection of every sales line, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    lines: Vec<SalesLine>,
    range: Option<(NaiveDate, NaiveDate)>,
}

impl TransactionStore {
    pub fn from_lines(lines: Vec<SalesLine>) -> Self {
        let range = lines.iter().map(|l| l.date).fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        });
        Self { lines, range }
    }

    /// Load a sales CSV. Any malformed row fails the whole load.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PawprintError::MissingData(path.to_path_buf()));
        }
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let headers = rdr.headers()?.clone();

        let mut lines = Vec::new();
        let mut mismatched = 0usize;
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let raw: RawRow = record
                .deserialize(Some(&headers))
                .map_err(|e| PawprintError::InvalidRow { line, reason: e.to_string() })?;
            let sale = validate(raw).map_err(|reason| PawprintError::InvalidRow { line, reason })?;

            let expected = sale.quantity as f64 * sale.unit_price - sale.discount;
            if (expected - sale.total_price).abs() > 0.011 {
                mismatched += 1;
                debug!(line, expected, actual = sale.total_price, "total_price mismatch");
            }
            lines.push(sale);
        }

        if mismatched > 0 {
            warn!(rows = mismatched, "total_price differs from quantity * unit_price - discount; keeping file values");
        }

        let store = Self::from_lines(lines);
        info!(path = %path.display(), rows = store.len(), "loaded sales data");
        Ok(store)
    }

    pub fn lines(&self) -> &[SalesLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Earliest and latest sale dates, or `None` for an empty store.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.range
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.range.map(|(_, hi)| hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "transaction_id,date,customer_id,category,product,quantity,unit_price,total_price";

    fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_without_discount_column() {
        let body = format!(
            "{HEADER}\n\
             TXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,2,10.00,20.00\n\
             TXN-000001,2024-03-01,CUST-0001,Cat Toys,Feather Wand,1,5.50,5.50\n\
             TXN-000002,2024-03-04,CUST-0002,Health Products,Vitamins,1,12.00,12.00\n"
        );
        let (_dir, path) = write_csv(&body);
        let store = TransactionStore::load(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.lines().iter().all(|l| l.discount == 0.0));
        assert_eq!(store.lines()[1].category, Category::CatToys);
        let (lo, hi) = store.date_range().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_load_with_discount_and_timestamps() {
        let body = format!(
            "{HEADER},discount\n\
             TXN-000001,2024-03-01 00:00:00,CUST-0001,Dog Food,Puppy Kibble,2,10.00,18.00,2.0\n\
             TXN-000002,2024-03-02,CUST-0002,Dog Food,Puppy Kibble,1,10.00,10.00,\n"
        );
        let (_dir, path) = write_csv(&body);
        let store = TransactionStore::load(&path).unwrap();
        assert_eq!(store.lines()[0].discount, 2.0);
        assert_eq!(store.lines()[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(store.lines()[1].discount, 0.0);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = TransactionStore::load(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, PawprintError::MissingData(_)));
    }

    #[test]
    fn test_unknown_category_rejected_with_line() {
        let body = format!(
            "{HEADER}\n\
             TXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,1,10.00,10.00\n\
             TXN-000002,2024-03-01,CUST-0001,Fish Food,Flakes,1,3.00,3.00\n"
        );
        let (_dir, path) = write_csv(&body);
        match TransactionStore::load(&path).unwrap_err() {
            PawprintError::InvalidRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("Fish Food"), "got: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_product_must_match_category() {
        let body = format!("{HEADER}\nTXN-000001,2024-03-01,CUST-0001,Cat Food,Puppy Kibble,1,10.00,10.00\n");
        let (_dir, path) = write_csv(&body);
        let msg = TransactionStore::load(&path).unwrap_err().to_string();
        assert!(msg.contains("Puppy Kibble"), "got: {msg}");
    }

    #[test]
    fn test_bad_date_and_quantity_rejected() {
        let body = format!("{HEADER}\nTXN-000001,03/01/2024,CUST-0001,Dog Food,Puppy Kibble,1,10.00,10.00\n");
        let (_dir, path) = write_csv(&body);
        assert!(TransactionStore::load(&path).unwrap_err().to_string().contains("unparseable date"));

        let body = format!("{HEADER}\nTXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,0,10.00,0.00\n");
        let (_dir, path) = write_csv(&body);
        assert!(TransactionStore::load(&path).unwrap_err().to_string().contains("quantity"));
    }

    #[test]
    fn test_non_numeric_price_is_invalid_row() {
        let body = format!("{HEADER}\nTXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,1,ten,10.00\n");
        let (_dir, path) = write_csv(&body);
        assert!(matches!(
            TransactionStore::load(&path).unwrap_err(),
            PawprintError::InvalidRow { line: 2, .. }
        ));
    }

    #[test]
    fn test_mismatched_total_is_kept() {
        let body = format!("{HEADER},discount\nTXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,2,10.00,99.00,0\n");
        let (_dir, path) = write_csv(&body);
        let store = TransactionStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.lines()[0].total_price, 99.0);
    }

    #[test]
    fn test_negative_total_discount_and_zero_price_rejected() {
        for row in [
            "TXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,1,10.00,-1.00,0",
            "TXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,1,10.00,12.00,-2",
            "TXN-000001,2024-03-01,CUST-0001,Dog Food,Puppy Kibble,1,0.00,0.00,0",
        ] {
            let (_dir, path) = write_csv(&format!("{HEADER},discount\n{row}\n"));
            let err = TransactionStore::load(&path).unwrap_err();
            assert!(matches!(err, PawprintError::InvalidRow { line: 2, .. }), "{row}: {err}");
        }
    }

    #[test]
    fn test_empty_store_has_no_range() {
        let store = TransactionStore::from_lines(Vec::new());
        assert!(store.is_empty());
        assert!(store.date_range().is_none());
        assert!(store.max_date().is_none());
    }

    #[test]
    fn test_parse_date_forms() {
        let d = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        assert_eq!(parse_date("2025-04-30"), Some(d));
        assert_eq!(parse_date("2025-04-30T10:00:00"), Some(d));
        assert_eq!(parse_date(" 2025-04-30 12:00:00 "), Some(d));
        assert_eq!(parse_date("30/04/2025"), None);
    }
}
