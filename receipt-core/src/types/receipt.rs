//! Receipt Record
//!
//! The central persisted entity. A receipt points at a stored blob through
//! `file_locator`, carries the reconciled header values, and moves from
//! `DRAFT` to a reviewed status.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HeaderFields, ReceiptPatch};
use crate::error::CoreError;
use crate::header::Reconciled;

/// Receipt review status
///
/// A receipt starts as `Draft`. Approve and reject are independent,
/// unconditional transitions: repeating either one simply overwrites the
/// status, and nothing returns a receipt to `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptStatus {
    /// Uploaded, not yet reviewed
    Draft,
    /// Accepted by a reviewer
    Approved,
    /// Refused by a reviewer
    Rejected,
}

impl Default for ReceiptStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl ReceiptStatus {
    /// Database / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether the status is a review outcome
    pub fn is_reviewed(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReceiptStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(CoreError::invalid_input(format!(
                "unknown receipt status '{}'",
                other
            ))),
        }
    }
}

/// Persisted receipt record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Unique identifier, generated at creation
    pub id: Uuid,
    /// Locator of the stored blob (`/uploads/<name>` or a remote URL)
    pub file_locator: String,
    /// Vendor / business name
    pub vendor_name: Option<String>,
    /// Transaction date
    pub date: Option<NaiveDate>,
    /// Grand total including tax
    pub grand_total: Option<Decimal>,
    /// Review status
    pub status: ReceiptStatus,
    /// Structured header extraction
    pub header_fields: Option<HeaderFields>,
    /// Creation timestamp (canonical sort key)
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl Receipt {
    /// Create a new draft receipt from reconciled header data
    pub fn draft(file_locator: impl Into<String>, reconciled: Reconciled) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            file_locator: file_locator.into(),
            vendor_name: reconciled.vendor_name,
            date: reconciled.date,
            grand_total: reconciled.grand_total,
            status: ReceiptStatus::Draft,
            header_fields: reconciled.header,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the review status
    pub fn set_status(&mut self, status: ReceiptStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Apply a validated partial update in place
    ///
    /// `file_locator`, `id` and `created_at` are never touched.
    pub fn apply_patch(&mut self, patch: &ReceiptPatch) {
        if let Some(vendor_name) = &patch.vendor_name {
            self.vendor_name = vendor_name.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(grand_total) = patch.grand_total {
            self.grand_total = grand_total;
        }
        if let Some(header_fields) = &patch.header_fields {
            self.header_fields = header_fields.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}
