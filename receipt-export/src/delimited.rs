//! CSV rendering

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{ExportError, ExportResult};
use crate::format::{ExportRow, EXPORT_COLUMNS};

/// Header line of bare column names, then one fully quoted line per row
///
/// Embedded double quotes are doubled by the writer.
pub fn render_csv(rows: &[ExportRow]) -> ExportResult<Vec<u8>> {
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header.write_record(EXPORT_COLUMNS)?;
    let buffer = header
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;

    let mut body = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for row in rows {
        body.write_record(row.cells())?;
    }

    body.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
