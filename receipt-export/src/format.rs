//! Export formats and output documents

use serde::Serialize;
use std::str::FromStr;

use crate::error::ExportError;
use receipt_core::Receipt;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Pdf,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Pdf => "application/pdf",
            Self::Json => "application/json",
        }
    }

    /// Download file name, `receipts.<ext>`
    pub fn file_name(&self) -> String {
        format!("receipts.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            other => Err(ExportError::InvalidInput(format!(
                "unsupported export format '{}', expected csv, xlsx, pdf or json",
                other
            ))),
        }
    }
}

/// Rendered export ready to be sent as a download
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Column names shared by every format, in output order
pub const EXPORT_COLUMNS: [&str; 6] = [
    "id",
    "vendorName",
    "date",
    "grandTotal",
    "status",
    "fileLocator",
];

/// Flat, display-ready projection of a receipt
///
/// Unknown values are empty strings so every format renders the same cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub id: String,
    pub vendor_name: String,
    /// ISO 8601 date (`YYYY-MM-DD`) or empty
    pub date: String,
    /// Two-decimal amount or empty
    pub grand_total: String,
    pub status: String,
    pub file_locator: String,
}

impl ExportRow {
    /// Cells in [`EXPORT_COLUMNS`] order
    pub fn cells(&self) -> [&str; 6] {
        [
            self.id.as_str(),
            self.vendor_name.as_str(),
            self.date.as_str(),
            self.grand_total.as_str(),
            self.status.as_str(),
            self.file_locator.as_str(),
        ]
    }
}

impl From<&Receipt> for ExportRow {
    fn from(receipt: &Receipt) -> Self {
        Self {
            id: receipt.id.to_string(),
            vendor_name: receipt.vendor_name.clone().unwrap_or_default(),
            date: receipt
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            grand_total: receipt
                .grand_total
                .map(|t| t.to_string())
                .unwrap_or_default(),
            status: receipt.status.as_str().to_string(),
            file_locator: receipt.file_locator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(" XLSX ".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("Pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(ExportError::InvalidInput(_))
        ));
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ExportFormat::Json.file_name(), "receipts.json");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
    }
}
