/// Blob naming policy
use chrono::Utc;
use uuid::Uuid;

/// Generate a collision-resistant blob name from an uploaded file name
///
/// Produces `<microsecond timestamp>_<uuid><extension>`, where the extension
/// is the substring of the original name from the last `.` inclusive (empty
/// if the name has none). The random component keeps names from concurrent
/// calls distinct regardless of timestamp resolution.
pub fn generate_blob_name(original: &str) -> String {
    format!(
        "{}_{}{}",
        Utc::now().timestamp_micros(),
        Uuid::new_v4(),
        extension_of(original)
    )
}

/// Content type for a blob name, inferred from its extension
pub fn content_type_for(blob_name: &str) -> &'static str {
    match extension_of(blob_name).to_ascii_lowercase().as_str() {
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".svg" => "image/svg+xml",
        ".bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Extension of a file name, from the last `.` inclusive. Empty if none.
fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[idx..],
        None => "",
    }
}
