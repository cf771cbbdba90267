//! Normalized directory paths used as cache keys.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// The normalized form of a directory path.
///
/// Normalization is purely lexical so a key built on one run matches the key
/// built on the next, whether or not the directory still exists:
///
/// - the text is re-composed to Unicode NFC;
/// - `/` and `\` are both separators, and the input's style is kept
///   (any `\` selects backslashes);
/// - empty and `.` components are dropped, `..` is resolved lexically;
/// - trailing separators are removed, except for a root (`/`, `C:\`);
/// - Windows-style paths (drive letter or `\\server` prefix) are lowercased,
///   because those file systems compare names case-insensitively.
///
/// ```
/// use flcache_core::CacheKey;
///
/// assert_eq!(CacheKey::new(r"C:\Docs\").as_str(), r"c:\docs");
/// assert_eq!(CacheKey::new("/home/me/../you/./music/").as_str(), "/home/you/music");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize(raw.as_ref()))
    }

    /// Builds a key from a path, replacing invalid UTF-8 lossily.
    pub fn from_path(path: &Path) -> Self {
        Self::new(path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<&Path> for CacheKey {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

fn is_sep(c: char) -> bool {
    c == '/' || c == '\\'
}

fn normalize(raw: &str) -> String {
    let text: String = raw.trim().nfc().collect();
    let sep = if text.contains('\\') { '\\' } else { '/' };

    let mut chars = text.chars();
    let (prefix, rest, windows_style) = match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            (format!("{drive}:"), &text[2..], true)
        }
        (Some(a), Some(b)) if a == '\\' && b == '\\' => (String::from(r"\\"), &text[2..], true),
        _ => (String::new(), text.as_str(), false),
    };
    let rooted = rest.starts_with(is_sep) && prefix != r"\\";

    let mut parts: Vec<&str> = Vec::new();
    for component in rest.split(is_sep) {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` above a root stays at the root
                _ if rooted || !prefix.is_empty() => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let mut out = prefix;
    if rooted {
        out.push(sep);
    }
    let sep_text = sep.to_string();
    out.push_str(&parts.join(sep_text.as_str()));
    if out.is_empty() {
        out.push('.');
    }
    if windows_style {
        out = out.to_lowercase();
    }
    out
}
