//! Vision model output parsing
//!
//! Models rarely honour a schema exactly: numbers come back as strings,
//! strings as numbers, and JSON is sometimes wrapped in a Markdown fence.
//! Field reading is therefore lenient, while the top-level shape (a JSON
//! object) is strict.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::parse_amount;
use crate::error::{CoreError, CoreResult};
use crate::types::HeaderFields;

/// Parse the model's raw text into header fields
///
/// Returns [`CoreError::MalformedModelOutput`] when the text is not a JSON
/// object; callers treat that as "no AI contribution".
pub fn parse_model_output(raw: &str) -> CoreResult<HeaderFields> {
    let body = strip_code_fence(raw.trim());

    let value: Value = serde_json::from_str(body)
        .map_err(|e| CoreError::MalformedModelOutput(format!("not valid JSON: {}", e)))?;

    // Some models wrap the object in a single-element array
    let value = match value {
        Value::Array(items) if matches!(items.as_slice(), [Value::Object(_)]) => {
            items.into_iter().next().unwrap_or(Value::Null)
        }
        other => other,
    };

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(CoreError::MalformedModelOutput(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(header_from_object(&object))
}

fn header_from_object(object: &Map<String, Value>) -> HeaderFields {
    HeaderFields {
        business_name: text_field(object, "isletme"),
        address: text_field(object, "adres"),
        phone: text_field(object, "telefon"),
        transaction_date: text_field(object, "tarih"),
        transaction_time: text_field(object, "saat"),
        sale_number: text_field(object, "satis_no"),
        payment_method: text_field(object, "odeme_tipi"),
        cashier: text_field(object, "kasiyer"),
        total_excl_tax: amount_field(object, "genel_toplam_kdv_haric"),
        total_incl_tax: amount_field(object, "genel_toplam_kdv_dahil"),
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn amount_field(object: &Map<String, Value>, key: &str) -> Option<Decimal> {
    match object.get(key)? {
        Value::Number(n) => {
            let text = n.to_string();
            let mut value = Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()?
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            value.rescale(2);
            Some(value)
        }
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the optional language tag on the opening line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_object() {
        let raw = r#"{
            "isletme": "MIGROS TICARET A.S.",
            "adres": "Kadikoy / Istanbul",
            "tarih": "05.03.2024",
            "saat": "14:22",
            "satis_no": 1234,
            "odeme_tipi": "KREDI KARTI",
            "kasiyer": "",
            "genel_toplam_kdv_haric": 169.49,
            "genel_toplam_kdv_dahil": 200.00
        }"#;

        let fields = parse_model_output(raw).unwrap();
        assert_eq!(fields.business_name.as_deref(), Some("MIGROS TICARET A.S."));
        assert_eq!(fields.sale_number.as_deref(), Some("1234"));
        assert_eq!(fields.cashier, None);
        assert_eq!(fields.phone, None);
        assert_eq!(fields.total_excl_tax, Some(Decimal::new(16949, 2)));
        assert_eq!(fields.total_incl_tax, Some(Decimal::new(20000, 2)));
    }

    #[test]
    fn test_parses_fenced_json() {
        let raw = "```json\n{\"isletme\": \"BIM\", \"genel_toplam_kdv_dahil\": \"45,90\"}\n```";
        let fields = parse_model_output(raw).unwrap();
        assert_eq!(fields.business_name.as_deref(), Some("BIM"));
        assert_eq!(fields.total_incl_tax, Some(Decimal::new(4590, 2)));
    }

    #[test]
    fn test_null_fields_are_absent() {
        let fields =
            parse_model_output(r#"{"isletme": null, "genel_toplam_kdv_dahil": null}"#).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_malformed_output() {
        let err = parse_model_output("Here is the receipt: merchant BIM").unwrap_err();
        assert!(matches!(err, CoreError::MalformedModelOutput(_)));

        let err = parse_model_output("[1, 2]").unwrap_err();
        assert!(matches!(err, CoreError::MalformedModelOutput(_)));
    }

    #[test]
    fn test_single_object_array() {
        let fields = parse_model_output(r#"[{"kasiyer": "Ali"}]"#).unwrap();
        assert_eq!(fields.cashier.as_deref(), Some("Ali"));

        assert!(parse_model_output(r#"[{"kasiyer": "Ali"}, {"kasiyer": "Veli"}]"#).is_err());
        assert!(parse_model_output(r#"["Ali"]"#).is_err());
    }
}
