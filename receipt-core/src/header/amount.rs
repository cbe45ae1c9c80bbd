//! Amount parsing for typed and extracted totals

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a loosely formatted money amount
///
/// Everything except digits, `.` and `,` is dropped (currency symbols,
/// codes, spaces). Separator handling:
///
/// - both `.` and `,` present: the last one is the decimal separator, the
///   other is digit grouping
/// - a single `,` or `.`: decimal separator
/// - the same separator repeated: digit grouping
///
/// The result is rounded to two decimal places. Returns `None` when no
/// digits remain.
///
/// ```
/// use receipt_core::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount("150,50 TL"), Some(Decimal::new(15050, 2)));
/// assert_eq!(parse_amount("1.234,5"), Some(Decimal::new(123450, 2)));
/// assert_eq!(parse_amount("TL"), None);
/// ```
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if dot > comma { ('.', ',') } else { (',', '.') };
            let without_grouping = cleaned.replace(grouping, "");
            single_decimal_point(&without_grouping, decimal)
        }
        (None, Some(_)) => single_decimal_point(&cleaned, ','),
        (Some(_), None) => single_decimal_point(&cleaned, '.'),
        (None, None) => cleaned,
    };

    let trimmed = normalized.trim_end_matches('.');
    let candidate = if trimmed.starts_with('.') {
        format!("0{}", trimmed)
    } else {
        trimmed.to_string()
    };

    let mut value = Decimal::from_str(&candidate)
        .ok()?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    Some(value)
}

/// Keep `sep` as the decimal point only when it occurs once
fn single_decimal_point(value: &str, sep: char) -> String {
    if value.matches(sep).count() == 1 {
        value.replace(sep, ".")
    } else {
        value.replace(sep, "")
    }
}
