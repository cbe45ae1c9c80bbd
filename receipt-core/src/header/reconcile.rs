//! Precedence merge

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::parse_receipt_date;
use crate::types::{HeaderFields, ReceiptHints};

/// Output of the reconciliation pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    /// Merged header, `None` when no layer contributed anything
    pub header: Option<HeaderFields>,
    /// Resolved vendor name for the receipt record
    pub vendor_name: Option<String>,
    /// Resolved calendar date
    pub date: Option<NaiveDate>,
    /// Resolved grand total
    pub grand_total: Option<Decimal>,
    /// Whether an AI layer was supplied
    pub ai_applied: bool,
}

/// Merge hints, heuristics and the optional AI layer
///
/// Ascending precedence: hints and their heuristic cleaning form the base
/// record, and every field present in `ai` overwrites it. A `None` AI layer
/// (call skipped, failed or unparseable) leaves the base untouched.
pub fn reconcile(hints: &ReceiptHints, ai: Option<HeaderFields>) -> Reconciled {
    let base = HeaderFields::from_hints(hints);
    let ai_applied = ai.is_some();
    let merged = match ai {
        Some(ai) => base.merge(ai),
        None => base,
    };

    let vendor_name = merged.business_name.clone();
    let date = merged
        .transaction_date
        .as_deref()
        .and_then(parse_receipt_date);
    let grand_total = merged.total_incl_tax;

    Reconciled {
        header: (!merged.is_empty()).then_some(merged),
        vendor_name,
        date,
        grand_total,
        ai_applied,
    }
}
