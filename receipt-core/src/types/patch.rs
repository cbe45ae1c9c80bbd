//! Partial Receipt Updates

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use super::{HeaderFields, ReceiptStatus};
use crate::error::{CoreError, CoreResult};

/// Partial update of an existing receipt
///
/// Each nullable field distinguishes "not supplied" (`None`) from "clear the
/// value" (`Some(None)`). Unknown keys are rejected, which also covers the
/// immutable `id`, `fileLocator` and `createdAt`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReceiptPatch {
    /// New vendor name
    #[serde(default, deserialize_with = "nullable")]
    pub vendor_name: Option<Option<String>>,

    /// New transaction date
    #[serde(default, deserialize_with = "nullable")]
    pub date: Option<Option<NaiveDate>>,

    /// New grand total
    #[serde(default, deserialize_with = "nullable")]
    pub grand_total: Option<Option<Decimal>>,

    /// Replacement header fields
    #[serde(default, deserialize_with = "nullable")]
    pub header_fields: Option<Option<HeaderFields>>,

    /// Review status (`APPROVED` or `REJECTED` only)
    #[serde(default)]
    pub status: Option<ReceiptStatus>,
}

impl ReceiptPatch {
    /// Parse and validate a patch from a JSON body
    pub fn from_json(value: serde_json::Value) -> CoreResult<Self> {
        let patch: ReceiptPatch = serde_json::from_value(value)
            .map_err(|e| CoreError::invalid_input(format!("invalid patch body: {}", e)))?;
        patch.validate()?;
        Ok(patch)
    }

    /// Check that the patch is non-empty and keeps the status invariant
    pub fn validate(&self) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::invalid_input("patch contains no fields"));
        }
        if self.status == Some(ReceiptStatus::Draft) {
            return Err(CoreError::invalid_input(
                "status cannot be set back to DRAFT",
            ));
        }
        Ok(())
    }

    /// Whether no field is supplied
    pub fn is_empty(&self) -> bool {
        self.vendor_name.is_none()
            && self.date.is_none()
            && self.grand_total.is_none()
            && self.header_fields.is_none()
            && self.status.is_none()
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
