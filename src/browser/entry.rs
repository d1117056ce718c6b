//! Directory listing.

use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

/// Prefix marking entries that are left out of listings.
pub const HIDDEN_PREFIX: char = '.';

/// One visible entry of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

/// Returns true if `name` is hidden from listings.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_PREFIX)
}

/// Directories first, then case-insensitive name, then exact name.
pub fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Reads the direct children of `path`, hidden entries excluded, sorted.
///
/// Entries whose metadata cannot be read (e.g. dangling symlinks) are listed
/// as files.
pub fn read_listing(path: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) {
            continue;
        }
        // Follows symlinks, so a link to a directory is navigable
        let is_dir = fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false);
        entries.push(DirEntry::new(name, is_dir));
    }

    entries.sort_by(compare_entries);
    Ok(entries)
}
