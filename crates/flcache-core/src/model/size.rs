//! Display strings for file sizes and types.

const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Formats a byte count for display using 1024-based units.
///
/// Values below 1 KiB are shown as whole bytes (`"100 B"`); larger values
/// get one decimal place (`"1.5 KB"`, `"2.0 MB"`).
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Returns the type column text for an item named `name`.
pub(crate) fn type_name_for(name: &str, is_folder: bool) -> String {
    if is_folder {
        return "File folder".to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{} File", ext.to_uppercase())
        }
        _ => "File".to_string(),
    }
}
