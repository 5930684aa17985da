/*!
 * Core types and data structures for the concatfs application
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A file selected for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Canonical absolute path, also the dedup key
    pub path: PathBuf,
    /// Canonical path of the input path that produced this file
    pub root: PathBuf,
    /// Path segments as the file was reached, starting with the root's own name
    pub segments: Vec<String>,
}

impl FileEntry {
    /// File name, the last of the segments
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

/// Deduplicated file entries in discovery order
///
/// A later entry with an already seen path is dropped, so the first
/// occurrence keeps its position.
#[derive(Debug, Clone, Default)]
pub struct FileList {
    entries: Vec<FileEntry>,
    seen: HashSet<PathBuf>,
}

impl FileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless its path is already present. Returns whether it was added.
    pub fn push(&mut self, entry: FileEntry) -> bool {
        if !self.seen.insert(entry.path.clone()) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Absolute paths in list order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Extend<FileEntry> for FileList {
    fn extend<T: IntoIterator<Item = FileEntry>>(&mut self, iter: T) {
        for entry in iter {
            self.push(entry);
        }
    }
}
