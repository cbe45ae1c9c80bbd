//! Extraction prompt

use crate::types::ReceiptHints;

/// JSON keys the model is asked to return, in prompt order
pub const HEADER_KEYS: [&str; 10] = [
    "isletme",
    "adres",
    "telefon",
    "tarih",
    "saat",
    "satis_no",
    "odeme_tipi",
    "kasiyer",
    "genel_toplam_kdv_haric",
    "genel_toplam_kdv_dahil",
];

/// Build the vision prompt, embedding known hints as extraction cues
pub fn build_prompt(hints: &ReceiptHints) -> String {
    let mut prompt = String::from(
        "You are reading a photographed sales receipt. Extract the receipt header and \
         return a single JSON object with exactly these keys:\n",
    );

    for (key, meaning) in HEADER_KEYS.iter().zip(KEY_MEANINGS) {
        prompt.push_str(&format!("- \"{}\": {}\n", key, meaning));
    }

    prompt.push_str(
        "Use null for any field you cannot read. Write amounts as plain numbers \
         with a period as the decimal separator.\n\
         Return only valid JSON, without Markdown fences or explanatory text.\n",
    );

    if !hints.is_empty() {
        prompt.push_str("\nHints provided by the uploader (may be incomplete or wrong):\n");
        if let Some(vendor) = hints.vendor_name() {
            prompt.push_str(&format!("- business name: {}\n", vendor));
        }
        if let Some(date) = hints.date() {
            prompt.push_str(&format!("- date: {}\n", date));
        }
        if let Some(total) = hints.grand_total() {
            prompt.push_str(&format!("- total including tax: {}\n", total));
        }
    }

    prompt
}

const KEY_MEANINGS: [&str; 10] = [
    "business name",
    "business address",
    "business phone number",
    "transaction date in dd.mm.yyyy form",
    "transaction time in hh:mm form",
    "sale or receipt number",
    "payment type (cash, card, ...)",
    "cashier name",
    "grand total excluding tax",
    "grand total including tax",
];
