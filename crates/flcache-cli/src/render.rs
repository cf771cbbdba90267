//! Plain-text rendering of listings.

use std::fmt::Write;

use flcache_core::{CacheEntry, FileItem};

/// Formats `entry` as a header line followed by one line per item.
pub fn render_listing(entry: &CacheEntry, label: &str) -> String {
    let folder = entry.current_folder();
    let mut out = format!(
        "{} [{label}] {} item(s)\n",
        folder.path().display(),
        entry.len()
    );
    for item in entry.file_list() {
        let _ = writeln!(out, "{}", render_item(item));
    }
    out
}

fn render_item(item: &FileItem) -> String {
    let name = if item.is_folder() {
        format!("{}/", item.name())
    } else {
        item.name().to_string()
    };
    format!("  {name:<40} {:>10}  {}", item.size_text(), item.type_name())
}
