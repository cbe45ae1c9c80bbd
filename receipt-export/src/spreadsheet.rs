//! XLSX rendering

use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExportResult;
use crate::format::{ExportRow, EXPORT_COLUMNS};

const SHEET_NAME: &str = "Receipts";

/// Single `Receipts` worksheet with a bold header row
pub fn render_xlsx(rows: &[ExportRow]) -> ExportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet().set_name(SHEET_NAME)?;

    for (col, name) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            worksheet.write_string(row_num, col as u16, *cell)?;
        }
    }

    worksheet.set_column_width(0, 38)?;
    worksheet.set_column_width(5, 48)?;

    Ok(workbook.save_to_buffer()?)
}
