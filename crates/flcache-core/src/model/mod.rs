//! Cached listing model.
//!
//! A [`entry::CacheEntry`] is one directory snapshot: the folder descriptor
//! ([`entry::FolderInfo`]) plus its ordered rows ([`entry::FileItem`]).
//! Entries are keyed externally by a normalized [`key::CacheKey`].

pub mod entry;
pub mod key;
pub mod size;

pub use entry::{CacheEntry, FileItem, FolderInfo};
pub use key::CacheKey;
pub use size::format_size;
