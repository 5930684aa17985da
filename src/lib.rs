/*!
 * concatfs - Concatenate files into a single text stream
 *
 * This library collects files from a set of input paths, filters them by
 * extension and produces one text blob: a directory tree of the selected
 * files followed by each file's content between START/END delimiters.
 */

pub mod error;

pub mod collector;
pub mod config;
pub mod filter;
pub mod report;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use collector::{collect, Collection, Collector, SkipReason, SkippedPath};
pub use config::{Args, Config};
pub use error::{ConcatError, Result};
pub use filter::{extension_of, ExtensionFilter};
pub use report::{ReportFormat, Reporter, RunReport};
pub use tree::{DirectoryNode, Forest, NO_FILES_MATCHED};
pub use types::{FileEntry, FileList};
pub use writer::{assemble, Assembler, Assembly, FileBody, FileRecord, OutputWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collect, build the tree header and assemble the full output text
pub fn concatenate<P: AsRef<std::path::Path>>(
    paths: &[P],
    recursive: bool,
    filter: &ExtensionFilter,
) -> (Collection, Assembly) {
    let collection = collect(paths, recursive, filter);
    let header = Forest::build(&collection.files).render();
    let assembly = assemble(&header, &collection.files);
    (collection, assembly)
}
