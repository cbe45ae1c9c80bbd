//! Uploader Hints

use serde::{Deserialize, Serialize};

/// Values typed by the uploader alongside the image
///
/// These are the lowest-precedence source for the receipt header. Blank
/// strings are treated the same as missing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptHints {
    /// Vendor name as typed
    #[serde(default)]
    pub vendor_name: Option<String>,
    /// Date string as typed
    #[serde(default)]
    pub date: Option<String>,
    /// Total amount as typed, e.g. `"150,50 TL"`
    #[serde(default)]
    pub grand_total: Option<String>,
}

impl ReceiptHints {
    /// Trimmed vendor name, if any
    pub fn vendor_name(&self) -> Option<&str> {
        non_blank(&self.vendor_name)
    }

    /// Trimmed date string, if any
    pub fn date(&self) -> Option<&str> {
        non_blank(&self.date)
    }

    /// Trimmed total string, if any
    pub fn grand_total(&self) -> Option<&str> {
        non_blank(&self.grand_total)
    }

    /// Whether no hint was supplied
    pub fn is_empty(&self) -> bool {
        self.vendor_name().is_none() && self.date().is_none() && self.grand_total().is_none()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
