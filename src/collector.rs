/*!
 * Path collection: turns input paths into a deduplicated, ordered file list
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::Config;
use crate::filter::ExtensionFilter;
use crate::types::{FileEntry, FileList};
use crate::utils::display_name;

/// Why an input path or directory entry was left out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("does not exist")]
    NotFound,

    #[error("is neither a file nor a directory")]
    NotFileOrDirectory,

    #[error("cannot be read: {0}")]
    Unreadable(String),
}

impl From<io::Error> for SkipReason {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SkipReason::NotFound,
            _ => SkipReason::Unreadable(err.to_string()),
        }
    }
}

/// A path that was skipped during collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Result of a collection run
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Selected files, deduplicated, in discovery order
    pub files: FileList,
    /// Inputs and entries skipped along the way
    pub skipped: Vec<SkippedPath>,
}

impl Collection {
    /// True when no file matched the given criteria
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Collector for input paths
#[derive(Debug, Clone)]
pub struct Collector {
    /// Extension rules applied to every candidate file
    filter: ExtensionFilter,
    /// Descend into subdirectories
    recursive: bool,
    /// A path that must never be collected (the output destination)
    excluded_path: Option<PathBuf>,
}

impl Collector {
    /// Create a new collector
    pub fn new(filter: ExtensionFilter, recursive: bool) -> Self {
        Self {
            filter,
            recursive,
            excluded_path: None,
        }
    }

    /// Create a collector from the run configuration
    pub fn from_config(config: &Config) -> Self {
        let collector = Self::new(config.filter.clone(), config.recursive);
        match &config.output_file {
            Some(output) => collector.with_excluded_path(output),
            None => collector,
        }
    }

    /// Never collect `path`, even if it passes the filter
    pub fn with_excluded_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded_path = Some(path.into());
        self
    }

    /// Collect files from every input path, in input order
    pub fn collect<P: AsRef<Path>>(&self, paths: &[P]) -> Collection {
        let excluded = self
            .excluded_path
            .as_ref()
            .and_then(|p| fs::canonicalize(p).ok());

        let mut collection = Collection::default();
        for path in paths {
            self.collect_path(path.as_ref(), excluded.as_deref(), &mut collection);
        }

        debug!(
            "Collected {} files, skipped {} paths",
            collection.files.len(),
            collection.skipped.len()
        );
        collection
    }

    /// Collect files from a single input path
    fn collect_path(&self, input: &Path, excluded: Option<&Path>, collection: &mut Collection) {
        let root = match fs::canonicalize(input) {
            Ok(root) => root,
            Err(e) => {
                warn!("{} does not exist or cannot be resolved: {}. Skipping.", input.display(), e);
                collection.skipped.push(SkippedPath {
                    path: input.to_path_buf(),
                    reason: e.into(),
                });
                return;
            }
        };

        let metadata = match fs::metadata(&root) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Cannot read metadata of {}: {}. Skipping.", root.display(), e);
                collection.skipped.push(SkippedPath {
                    path: root,
                    reason: e.into(),
                });
                return;
            }
        };

        if metadata.is_file() {
            // Named as given, so a link shows its own name rather than its target's
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| display_name(&root));
            if !self.filter.matches(&name) {
                debug!("{} does not pass the extension filter", root.display());
                return;
            }
            if excluded == Some(root.as_path()) {
                debug!("Not collecting the output destination {}", root.display());
                return;
            }
            collection.files.push(FileEntry {
                path: root.clone(),
                root,
                segments: vec![name],
            });
        } else if metadata.is_dir() {
            let name = display_name(&root);
            self.collect_directory(&root, &name, excluded, collection);
        } else {
            warn!("{} is neither a file nor a directory. Skipping.", root.display());
            collection.skipped.push(SkippedPath {
                path: root,
                reason: SkipReason::NotFileOrDirectory,
            });
        }
    }

    /// Walk a directory in file name order, descending only when recursive
    fn collect_directory(
        &self,
        root: &Path,
        root_name: &str,
        excluded: Option<&Path>,
        collection: &mut Collection,
    ) {
        debug!(
            "Listing {} ({})",
            root.display(),
            if self.recursive { "recursive" } else { "direct entries only" }
        );

        let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    warn!("Error listing {}: {}", path.display(), e);
                    collection.skipped.push(SkippedPath {
                        path,
                        reason: SkipReason::Unreadable(e.to_string()),
                    });
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                trace!("Directory entry {}", entry.path().display());
                continue;
            }

            let is_file = if file_type.is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_dir() => {
                        debug!("Not following directory link {}", entry.path().display());
                        continue;
                    }
                    Ok(target) => target.is_file(),
                    Err(e) => {
                        warn!("Broken link {}: {}. Skipping.", entry.path().display(), e);
                        collection.skipped.push(SkippedPath {
                            path: entry.path().to_path_buf(),
                            reason: SkipReason::NotFileOrDirectory,
                        });
                        continue;
                    }
                }
            } else {
                file_type.is_file()
            };

            if !is_file {
                debug!("Ignoring special file {}", entry.path().display());
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            if !self.filter.matches(&file_name) {
                trace!("Filtered out {}", entry.path().display());
                continue;
            }

            let path = match fs::canonicalize(entry.path()) {
                Ok(path) => path,
                Err(e) => {
                    warn!("Cannot resolve {}: {}. Skipping.", entry.path().display(), e);
                    collection.skipped.push(SkippedPath {
                        path: entry.path().to_path_buf(),
                        reason: e.into(),
                    });
                    continue;
                }
            };

            if excluded == Some(path.as_path()) {
                debug!("Not collecting the output destination {}", path.display());
                continue;
            }

            let mut segments = vec![root_name.to_string()];
            if let Ok(relative) = entry.path().strip_prefix(root) {
                segments.extend(
                    relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().to_string()),
                );
            } else {
                segments.push(file_name);
            }

            trace!("Selected {}", path.display());
            collection.files.push(FileEntry {
                path,
                root: root.to_path_buf(),
                segments,
            });
        }
    }
}

/// Collect files from `paths` with the given recursion flag and filter
pub fn collect<P: AsRef<Path>>(paths: &[P], recursive: bool, filter: &ExtensionFilter) -> Collection {
    Collector::new(filter.clone(), recursive).collect(paths)
}
