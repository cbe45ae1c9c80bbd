//! Blob naming and content types

use uuid::Uuid;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Lowercase extension of `file_name` when it is 1-10 ASCII alphanumerics
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    let valid = !stem.is_empty()
        && (1..=10).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    valid.then_some(ext)
}

/// Fresh collision-free blob name, `<uuid>.<ext>`
///
/// The extension comes from the uploaded file name, or `bin` when it has
/// none usable.
pub fn new_blob_name(file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(extension_of)
        .unwrap_or_else(|| "bin".to_string());
    format!("{}.{}", Uuid::new_v4().simple(), ext)
}

/// Content type served for a known extension
pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Content type guessed from a file name or URL path
pub fn content_type_for_name(name: &str) -> Option<&'static str> {
    let path = name.split(['?', '#']).next().unwrap_or(name);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    extension_of(last_segment).and_then(|ext| content_type_for_extension(&ext))
}

/// Upload content type: declared part type, then extension, then octet-stream
pub fn resolve_content_type(declared: Option<&str>, file_name: Option<&str>) -> String {
    declared
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != OCTET_STREAM)
        .map(str::to_string)
        .or_else(|| file_name.and_then(content_type_for_name).map(str::to_string))
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
