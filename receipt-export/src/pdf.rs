//! PDF rendering
//!
//! Plain text report built directly with lopdf: Courier (a base-14 font, so
//! nothing is embedded), A4 pages, a centered title and one pipe-delimited
//! line per receipt.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::ExportResult;
use crate::format::ExportRow;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: i64 = 40;
const MARGIN_BOTTOM: i64 = 50;

const TITLE: &str = "Receipts";
const TITLE_SIZE: i64 = 18;
const TITLE_Y: i64 = 800;

const BODY_SIZE: i64 = 10;
const HEADER_Y: i64 = 770;
const LINE_HEIGHT: i64 = 14;

const HEADER_LINE: &str = "ID | Vendor | Date | Total | Status";

/// Cell widths in characters; a full row stays inside the page margins
const ID_CHARS: usize = 8;
const VENDOR_CHARS: usize = 30;
const TOTAL_CHARS: usize = 16;

/// Courier glyphs are 0.6 em wide
fn text_width(text: &str, size: i64) -> i64 {
    text.chars().count() as i64 * size * 3 / 5
}

/// Rows that fit below the header on one page
fn rows_per_page() -> usize {
    ((HEADER_Y - LINE_HEIGHT - MARGIN_BOTTOM) / LINE_HEIGHT + 1) as usize
}

/// Cut `text` to `max` characters, marking the cut with `...`
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(max - 3).collect();
        clipped.push_str("...");
        clipped
    }
}

/// One report line for a receipt, id truncated to eight characters
pub fn row_line(row: &ExportRow) -> String {
    let short_id: String = row.id.chars().take(ID_CHARS).collect();
    format!(
        "{} | {} | {} | {} | {}",
        short_id,
        clip(&row.vendor_name, VENDOR_CHARS),
        row.date,
        clip(&row.grand_total, TOTAL_CHARS),
        row.status
    )
}

/// Render the report; an empty input still yields one page with title and header
pub fn render_pdf(rows: &[ExportRow]) -> ExportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
            "F2" => bold_font_id,
        },
    });

    let lines: Vec<String> = rows.iter().map(row_line).collect();
    let mut chunks: Vec<&[String]> = lines.chunks(rows_per_page()).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let content = page_content(chunk, index == 0);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => page_ids.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

fn page_content(lines: &[String], with_title: bool) -> Content {
    let mut operations = Vec::new();

    if with_title {
        let x = (PAGE_WIDTH - text_width(TITLE, TITLE_SIZE)) / 2;
        push_text(&mut operations, "F2", TITLE_SIZE, x, TITLE_Y, TITLE);
    }

    push_text(&mut operations, "F2", BODY_SIZE, MARGIN_LEFT, HEADER_Y, HEADER_LINE);

    let mut y = HEADER_Y - LINE_HEIGHT;
    for line in lines {
        push_text(&mut operations, "F1", BODY_SIZE, MARGIN_LEFT, y, line);
        y -= LINE_HEIGHT;
    }

    Content { operations }
}

fn push_text(operations: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
    operations.push(Operation::new("Td", vec![x.into(), y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(to_win_ansi(text))],
    ));
    operations.push(Operation::new("ET", vec![]));
}

/// Map text onto the WinAnsi range of the standard fonts
///
/// Turkish letters outside Latin-1 are transliterated; anything else that
/// cannot be represented becomes `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            'ğ' => b'g',
            'Ğ' => b'G',
            'ş' => b's',
            'Ş' => b'S',
            'ı' => b'i',
            'İ' => b'I',
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: usize) -> ExportRow {
        ExportRow {
            id: format!("{:08x}-aaaa-bbbb-cccc-dddddddddddd", n),
            vendor_name: "Şok Market".into(),
            date: "2024-03-05".into(),
            grand_total: "12.50".into(),
            status: "DRAFT".into(),
            file_locator: "/uploads/x.png".into(),
        }
    }

    #[test]
    fn test_empty_report_has_title_and_header() {
        let bytes = render_pdf(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Receipts)"));
        assert!(text.contains("(ID | Vendor | Date | Total | Status)"));
    }

    #[test]
    fn test_row_line_truncates_id() {
        let line = row_line(&row(1));
        assert_eq!(line, "00000001 | Şok Market | 2024-03-05 | 12.50 | DRAFT");
    }

    #[test]
    fn test_row_line_fits_page() {
        let mut long = row(1);
        long.vendor_name = "Migros Ticaret Anonim Şirketi Kadıköy Moda Şubesi".into();
        long.grand_total = "-999999999999.99".into();
        long.status = "APPROVED".into();

        let line = row_line(&long);
        assert!(line.contains("| Migros Ticaret Anonim Şirke... |"));
        assert!(text_width(&line, BODY_SIZE) <= PAGE_WIDTH - 2 * MARGIN_LEFT);
    }

    #[test]
    fn test_paginates() {
        let rows: Vec<ExportRow> = (0..rows_per_page() * 2 + 3).map(row).collect();
        let bytes = render_pdf(&rows).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert!(String::from_utf8_lossy(&bytes).contains("(00000001 | Sok Market"));
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(to_win_ansi("Işık"), b"Isik".to_vec());
        assert_eq!(to_win_ansi("Çay"), vec![0xC7, b'a', b'y']);
        assert_eq!(to_win_ansi("€"), b"?".to_vec());
    }

    #[test]
    fn test_title_is_centered() {
        let x = (PAGE_WIDTH - text_width(TITLE, TITLE_SIZE)) / 2;
        assert_eq!(x, (595 - 86) / 2);
    }
}
