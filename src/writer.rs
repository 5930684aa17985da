/*!
 * Output assembly and writing for concatfs
 */

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use log::{debug, warn};

use crate::config::Config;
use crate::error::{ConcatError, Result};
use crate::types::FileList;
use crate::utils::count_lines;

/// First line of the output
pub const HEADER_BANNER: &str = "===== Directory Structure Header =====";

/// Line closing the tree header
pub const HEADER_CLOSING: &str = "======================================";

/// Line opening a file block
pub fn start_delimiter(path: &Path) -> String {
    format!("===== START OF FILE: {} =====", path.display())
}

/// Line closing a file block
pub fn end_delimiter(path: &Path) -> String {
    format!("===== END OF FILE: {} =====", path.display())
}

/// Body of one file block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBody {
    /// File content, decoded as text
    Content(String),
    /// Explanation used when the file could not be read
    Placeholder(String),
}

impl FileBody {
    /// Read a file, downgrading any failure to a placeholder
    pub fn read(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => FileBody::Content(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!("Error reading {}: {}", path.display(), e);
                FileBody::Placeholder(format!("[Error reading file: {}]\n", e))
            }
        }
    }

    pub fn text(&self) -> &str {
        match self {
            FileBody::Content(text) | FileBody::Placeholder(text) => text,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, FileBody::Placeholder(_))
    }
}

/// What was written for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Number of lines in the body
    pub lines: usize,
    /// Number of bytes in the body
    pub bytes: usize,
    /// Whether a placeholder stood in for the content
    pub placeholder: bool,
}

/// Complete output text plus per-file records
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub text: String,
    pub records: Vec<FileRecord>,
}

impl Assembly {
    /// Number of files whose content was replaced by a placeholder
    pub fn placeholders(&self) -> usize {
        self.records.iter().filter(|r| r.placeholder).count()
    }
}

/// Builds the full output text in memory
pub struct Assembler {
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Assembler {
    /// Create a new assembler
    pub fn new(progress: Arc<ProgressBar>) -> Self {
        Self { progress }
    }

    /// Assemble the header followed by one delimited block per file, in list order
    pub fn assemble(&self, header_lines: &[String], files: &FileList) -> Assembly {
        self.progress.set_length(files.len() as u64);

        let mut text = render_header(header_lines);
        let mut records = Vec::with_capacity(files.len());

        for entry in files {
            self.progress
                .set_message(format!("Current file: {}", entry.name()));

            let body = FileBody::read(&entry.path);
            push_file_block(&mut text, &entry.path, &body);

            records.push(FileRecord {
                path: entry.path.clone(),
                lines: count_lines(body.text()),
                bytes: body.text().len(),
                placeholder: body.is_placeholder(),
            });
            self.progress.inc(1);
        }

        debug!("Assembled {} bytes of output", text.len());
        Assembly { text, records }
    }
}

/// Banner, tree lines, closing banner and the blank line after it
pub fn render_header(header_lines: &[String]) -> String {
    let mut header = String::new();
    header.push_str(HEADER_BANNER);
    header.push('\n');
    for line in header_lines {
        header.push_str(line);
        header.push('\n');
    }
    header.push_str(HEADER_CLOSING);
    header.push_str("\n\n");
    header
}

fn push_file_block(text: &mut String, path: &Path, body: &FileBody) {
    text.push_str(&start_delimiter(path));
    text.push('\n');
    text.push_str(body.text());
    text.push('\n');
    text.push_str(&end_delimiter(path));
    text.push_str("\n\n");
}

/// Assemble without progress reporting
pub fn assemble(header_lines: &[String], files: &FileList) -> Assembly {
    Assembler::new(Arc::new(ProgressBar::hidden())).assemble(header_lines, files)
}

/// Writes the assembled text to a file or stdout in a single step
pub struct OutputWriter {
    /// Output file; stdout when absent
    destination: Option<PathBuf>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(destination: Option<PathBuf>) -> Self {
        Self { destination }
    }

    /// Create a writer for the configured destination
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.output_file.clone())
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Write the complete text
    pub fn write(&self, text: &str) -> Result<()> {
        match &self.destination {
            Some(path) => {
                fs::write(path, text).map_err(|source| ConcatError::Write {
                    path: path.clone(),
                    source,
                })?;
                debug!("Wrote {} bytes to {}", text.len(), path.display());
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(text.as_bytes())?;
                handle.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileEntry;
    use tempfile::tempdir;

    fn entry(path: PathBuf) -> FileEntry {
        FileEntry {
            segments: vec![path.file_name().unwrap().to_string_lossy().to_string()],
            root: path.clone(),
            path,
        }
    }

    #[test]
    fn test_render_header() {
        let header = render_header(&["proj/".to_string(), "  a.py".to_string()]);
        assert_eq!(
            header,
            "===== Directory Structure Header =====\nproj/\n  a.py\n======================================\n\n"
        );
    }

    #[test]
    fn test_file_block_layout() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello\n")?;

        let mut files = FileList::new();
        files.push(entry(path.clone()));
        let assembly = assemble(&["a.txt".to_string()], &files);

        let expected = format!(
            "{}\n{}\n{}\n\n===== START OF FILE: {} =====\nhello\n\n===== END OF FILE: {} =====\n\n",
            HEADER_BANNER,
            "a.txt",
            HEADER_CLOSING,
            path.display(),
            path.display()
        );
        assert_eq!(assembly.text, expected);
        assert_eq!(assembly.records.len(), 1);
        assert_eq!(assembly.records[0].lines, 1);
        assert_eq!(assembly.records[0].bytes, 6);
        assert!(!assembly.records[0].placeholder);
        Ok(())
    }

    #[test]
    fn test_unreadable_file_gets_placeholder() -> io::Result<()> {
        let dir = tempdir()?;
        let present = dir.path().join("present.txt");
        let missing = dir.path().join("vanished.txt");
        fs::write(&present, "still here")?;

        let mut files = FileList::new();
        files.push(entry(missing.clone()));
        files.push(entry(present.clone()));
        let assembly = assemble(&[], &files);

        assert_eq!(assembly.placeholders(), 1);
        assert!(assembly.records[0].placeholder);
        assert!(assembly.text.contains(&format!(
            "{}\n[Error reading file: ",
            start_delimiter(&missing)
        )));
        assert!(assembly
            .text
            .contains(&format!("{}\nstill here\n{}", start_delimiter(&present), end_delimiter(&present))));
        Ok(())
    }

    #[test]
    fn test_non_utf8_content_is_decoded_lossily() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [b'c', b'a', b'f', 0xE9]).unwrap();

        match FileBody::read(&path) {
            FileBody::Content(text) => assert_eq!(text, "caf\u{FFFD}"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_write_to_file() -> io::Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out.txt");
        OutputWriter::new(Some(out.clone())).write("complete text")?;
        assert_eq!(fs::read_to_string(&out)?, "complete text");
        Ok(())
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("missing").join("out.txt");
        let err = OutputWriter::new(Some(out.clone())).write("text").unwrap_err();
        match err {
            ConcatError::Write { path, .. } => assert_eq!(path, out),
            other => panic!("unexpected error: {}", other),
        }
        assert!(!out.exists());
    }
}
