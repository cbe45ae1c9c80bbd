//! Header Fields
//!
//! One record type is used for every extraction layer (hints, heuristics and
//! AI output) so that merging is a plain field-by-field operation.
//!
//! The serialized keys are the ones the vision prompt asks the model for, so
//! the same shape is used on the wire, in storage and in model output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ReceiptHints;
use crate::header::parse_amount;

/// Structured receipt header
///
/// Every field is optional; `None` means unknown, never "empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFields {
    /// Business name
    #[serde(rename = "isletme", default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,

    /// Business address
    #[serde(rename = "adres", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Business phone
    #[serde(rename = "telefon", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Transaction date, `dd.mm.yyyy` when the model follows the prompt
    #[serde(rename = "tarih", default, skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,

    /// Transaction time, `hh:mm`
    #[serde(rename = "saat", default, skip_serializing_if = "Option::is_none")]
    pub transaction_time: Option<String>,

    /// Sale / receipt number
    #[serde(rename = "satis_no", default, skip_serializing_if = "Option::is_none")]
    pub sale_number: Option<String>,

    /// Payment method
    #[serde(rename = "odeme_tipi", default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Cashier name
    #[serde(rename = "kasiyer", default, skip_serializing_if = "Option::is_none")]
    pub cashier: Option<String>,

    /// Total excluding tax
    #[serde(
        rename = "genel_toplam_kdv_haric",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_excl_tax: Option<Decimal>,

    /// Total including tax
    #[serde(
        rename = "genel_toplam_kdv_dahil",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_incl_tax: Option<Decimal>,
}

impl HeaderFields {
    /// Derive the heuristic layer from uploader hints
    ///
    /// Vendor name maps to the business name, the date string is carried
    /// verbatim and the total is cleaned with [`parse_amount`].
    pub fn from_hints(hints: &ReceiptHints) -> Self {
        Self {
            business_name: hints.vendor_name().map(str::to_string),
            transaction_date: hints.date().map(str::to_string),
            total_incl_tax: hints.grand_total().and_then(parse_amount),
            ..Default::default()
        }
    }

    /// Merge a higher-precedence layer over this one
    ///
    /// Every field present in `higher` wins; fields it leaves unset keep the
    /// value from `self`.
    pub fn merge(self, higher: HeaderFields) -> HeaderFields {
        HeaderFields {
            business_name: higher.business_name.or(self.business_name),
            address: higher.address.or(self.address),
            phone: higher.phone.or(self.phone),
            transaction_date: higher.transaction_date.or(self.transaction_date),
            transaction_time: higher.transaction_time.or(self.transaction_time),
            sale_number: higher.sale_number.or(self.sale_number),
            payment_method: higher.payment_method.or(self.payment_method),
            cashier: higher.cashier.or(self.cashier),
            total_excl_tax: higher.total_excl_tax.or(self.total_excl_tax),
            total_incl_tax: higher.total_incl_tax.or(self.total_incl_tax),
        }
    }

    /// Check whether no field is known
    pub fn is_empty(&self) -> bool {
        self == &HeaderFields::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hints() {
        let hints = ReceiptHints {
            vendor_name: Some("  Migros ".to_string()),
            date: Some("2024-03-05".to_string()),
            grand_total: Some("150,50 TL".to_string()),
        };

        let fields = HeaderFields::from_hints(&hints);
        assert_eq!(fields.business_name.as_deref(), Some("Migros"));
        assert_eq!(fields.transaction_date.as_deref(), Some("2024-03-05"));
        assert_eq!(fields.total_incl_tax, Some(Decimal::new(15050, 2)));
        assert!(fields.address.is_none());
    }

    #[test]
    fn test_merge_precedence() {
        let lower = HeaderFields {
            business_name: Some("hint".to_string()),
            cashier: Some("Ayse".to_string()),
            total_incl_tax: Some(Decimal::new(15050, 2)),
            ..Default::default()
        };
        let higher = HeaderFields {
            business_name: Some("ai".to_string()),
            phone: Some("0212 000 00 00".to_string()),
            ..Default::default()
        };

        let merged = lower.merge(higher);
        assert_eq!(merged.business_name.as_deref(), Some("ai"));
        assert_eq!(merged.phone.as_deref(), Some("0212 000 00 00"));
        assert_eq!(merged.cashier.as_deref(), Some("Ayse"));
        assert_eq!(merged.total_incl_tax, Some(Decimal::new(15050, 2)));
    }

    #[test]
    fn test_wire_keys() {
        let fields = HeaderFields {
            business_name: Some("A101".to_string()),
            total_incl_tax: Some(Decimal::new(20000, 2)),
            ..Default::default()
        };

        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["isletme"], "A101");
        assert_eq!(value["genel_toplam_kdv_dahil"], "200.00");
        assert!(value.get("adres").is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(HeaderFields::default().is_empty());
        assert!(HeaderFields::from_hints(&ReceiptHints::default()).is_empty());
    }
}
