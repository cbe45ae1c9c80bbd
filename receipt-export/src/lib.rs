//! ReceiptFlow Export Renderer
//!
//! Serializes receipt records into downloadable documents:
//!
//! | Format | Output |
//! |--------|--------|
//! | `json` | array of [`ExportRow`] |
//! | `csv`  | header line, then fully quoted rows |
//! | `xlsx` | one `Receipts` worksheet |
//! | `pdf`  | A4 text report with a centered title |
//!
//! Input order is preserved; callers pass receipts newest first.

pub mod delimited;
pub mod error;
pub mod format;
pub mod pdf;
pub mod spreadsheet;

pub use error::{ExportError, ExportResult};
pub use format::{ExportDocument, ExportFormat, ExportRow, EXPORT_COLUMNS};

use receipt_core::Receipt;
use tracing::debug;

/// Render `receipts` in the requested format
pub fn render(receipts: &[Receipt], format: ExportFormat) -> ExportResult<ExportDocument> {
    let rows: Vec<ExportRow> = receipts.iter().map(ExportRow::from).collect();

    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec(&rows)?,
        ExportFormat::Csv => delimited::render_csv(&rows)?,
        ExportFormat::Xlsx => spreadsheet::render_xlsx(&rows)?,
        ExportFormat::Pdf => pdf::render_pdf(&rows)?,
    };

    debug!(
        format = format.extension(),
        rows = rows.len(),
        size = bytes.len(),
        "Rendered export"
    );

    Ok(ExportDocument {
        bytes,
        content_type: format.content_type(),
        file_name: format.file_name(),
    })
}
