/*!
 * Directory tree reconstruction and rendering for the output header
 *
 * The tree is rebuilt from the final file list alone, so it only contains
 * directories holding at least one selected file. Children keep the order in
 * which they first appeared in that list.
 */

use std::collections::HashMap;
use std::path::{PathBuf, MAIN_SEPARATOR};

use log::debug;

use crate::types::{FileEntry, FileList};

/// Header line used when nothing was selected
pub const NO_FILES_MATCHED: &str = "No files matched the given criteria.";

/// Indentation added per depth level
pub const INDENT: &str = "  ";

/// Position of a child inside its parent, in first-appearance order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Child {
    Dir(usize),
    File(usize),
}

/// A directory that contains at least one selected file
#[derive(Debug, Clone, Default)]
pub struct DirectoryNode {
    /// Directory name
    pub name: String,
    subdirs: Vec<DirectoryNode>,
    subdir_index: HashMap<String, usize>,
    files: Vec<String>,
    order: Vec<Child>,
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Subdirectories in insertion order
    pub fn subdirs(&self) -> &[DirectoryNode] {
        &self.subdirs
    }

    /// Direct file names in insertion order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Get the named subdirectory, creating it on first use
    fn subdir_mut(&mut self, name: &str) -> &mut DirectoryNode {
        let idx = match self.subdir_index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.subdirs.len();
                self.subdirs.push(DirectoryNode::new(name));
                self.subdir_index.insert(name.to_string(), idx);
                self.order.push(Child::Dir(idx));
                idx
            }
        };
        &mut self.subdirs[idx]
    }

    fn add_file(&mut self, name: &str) {
        self.order.push(Child::File(self.files.len()));
        self.files.push(name.to_string());
    }

    /// Attach a file given its path segments below this directory
    fn insert(&mut self, segments: &[String]) {
        match segments {
            [] => {}
            [file] => self.add_file(file),
            [dir, rest @ ..] => self.subdir_mut(dir).insert(rest),
        }
    }

    fn render_into(&self, depth: usize, lines: &mut Vec<String>) {
        lines.push(format!("{}{}", INDENT.repeat(depth), dir_label(&self.name)));
        for child in &self.order {
            match *child {
                Child::Dir(idx) => self.subdirs[idx].render_into(depth + 1, lines),
                Child::File(idx) => {
                    lines.push(format!("{}{}", INDENT.repeat(depth + 1), self.files[idx]))
                }
            }
        }
    }
}

/// Top level of the tree: one directory per input directory, plus files given directly
#[derive(Debug, Clone, Default)]
pub struct Forest {
    roots: Vec<DirectoryNode>,
    root_index: HashMap<PathBuf, usize>,
    files: Vec<String>,
    order: Vec<Child>,
}

impl Forest {
    /// Build the forest from the ordered file list
    pub fn build(files: &FileList) -> Self {
        let mut forest = Self::default();
        for entry in files {
            forest.insert(entry);
        }
        debug!(
            "Built tree with {} root directories and {} top-level files",
            forest.roots.len(),
            forest.files.len()
        );
        forest
    }

    fn insert(&mut self, entry: &FileEntry) {
        if entry.path == entry.root || entry.segments.len() < 2 {
            self.order.push(Child::File(self.files.len()));
            self.files.push(entry.name().to_string());
            return;
        }

        let idx = match self.root_index.get(&entry.root) {
            Some(&idx) => idx,
            None => {
                let idx = self.roots.len();
                self.roots.push(DirectoryNode::new(entry.segments[0].clone()));
                self.root_index.insert(entry.root.clone(), idx);
                self.order.push(Child::Dir(idx));
                idx
            }
        };
        self.roots[idx].insert(&entry.segments[1..]);
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Root directories in first-appearance order
    pub fn roots(&self) -> &[DirectoryNode] {
        &self.roots
    }

    /// Files that were passed directly as inputs
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Render the forest as indented lines, depth first
    pub fn render(&self) -> Vec<String> {
        if self.is_empty() {
            return vec![NO_FILES_MATCHED.to_string()];
        }

        let mut lines = Vec::new();
        for child in &self.order {
            match *child {
                Child::Dir(idx) => self.roots[idx].render_into(0, &mut lines),
                Child::File(idx) => lines.push(self.files[idx].clone()),
            }
        }
        lines
    }
}

/// Directory names end with the path separator
fn dir_label(name: &str) -> String {
    if name.ends_with(MAIN_SEPARATOR) {
        name.to_string()
    } else {
        format!("{}{}", name, MAIN_SEPARATOR)
    }
}
