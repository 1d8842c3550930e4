const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

const DAY_NAMES: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Group the digits of a non-negative integer string with commas.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let cents = (val.abs() * 100.0).round() as u64;
    let dollars = group_thousands(&(cents / 100).to_string());
    let sign = if val < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${dollars}.{:02}", cents % 100)
}

/// Format an integer count with thousands separators: 12,345
pub fn number(val: usize) -> String {
    group_thousands(&val.to_string())
}

/// One-decimal percentage: 42.0%
pub fn pct(val: f64) -> String {
    format!("{val:.1}%")
}

/// Full month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month.wrapping_sub(1) as usize).copied().unwrap_or("")
}

/// Three-letter month label for a 1-based month number.
pub fn month_abbrev(month: u32) -> &'static str {
    let name = month_name(month);
    &name[..name.len().min(3)]
}

/// Full weekday name, Monday = 0.
pub fn day_name(day: u32) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("")
}

pub fn day_abbrev(day: u32) -> &'static str {
    let name = day_name(day);
    &name[..name.len().min(3)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
        assert_eq!(money(-0.001), "$0.00");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(0), "0");
        assert_eq!(number(999), "999");
        assert_eq!(number(12345), "12,345");
        assert_eq!(number(1234567), "1,234,567");
    }

    #[test]
    fn test_calendar_labels() {
        assert_eq!(month_abbrev(1), "Jan");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(day_name(0), "Monday");
        assert_eq!(day_abbrev(6), "Sun");
        assert_eq!(day_abbrev(7), "");
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(33.333), "33.3%");
        assert_eq!(pct(0.0), "0.0%");
    }
}
