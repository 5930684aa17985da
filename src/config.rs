/*!
 * Configuration handling for concatfs
 */

use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use log::LevelFilter;

use crate::ensure;
use crate::error::Result;
use crate::filter::ExtensionFilter;

/// Command-line arguments for concatfs
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "concatfs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenate multiple files into one, with a directory structure header and file delimiters",
    long_about = "Walks the given files and directories, selects files by extension and writes a single text stream: a directory tree of the selected files followed by each file's content between START/END delimiters."
)]
pub struct Args {
    /// One or more files/directories to process
    #[clap(value_name = "PATH", required_unless_present = "generate")]
    pub paths: Vec<String>,

    /// Output file name. If not specified, outputs to STDOUT
    #[clap(short, long)]
    pub output: Option<String>,

    /// Recursively traverse directories to find files
    #[clap(short, long)]
    pub recursive: bool,

    /// Include only files with these extensions (repeatable or comma-separated)
    #[clap(long, value_name = "EXT")]
    pub include: Vec<String>,

    /// Exclude files with these extensions (repeatable or comma-separated)
    #[clap(long, value_name = "EXT")]
    pub exclude: Vec<String>,

    /// Print a summary table of the run to stderr
    #[clap(long)]
    pub report: bool,

    /// Do not show a progress bar
    #[clap(short, long)]
    pub quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[clap(short, long)]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Input paths, in the order given
    pub paths: Vec<PathBuf>,

    /// Output file path; stdout when absent
    pub output_file: Option<PathBuf>,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Extension include/exclude rules
    pub filter: ExtensionFilter,

    /// Print the summary report
    pub show_report: bool,

    /// Show the progress bar
    pub show_progress: bool,

    /// Default log level
    pub log_level: LevelFilter,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            paths: args.paths.iter().map(PathBuf::from).collect(),
            output_file: args.output.map(PathBuf::from),
            recursive: args.recursive,
            filter: ExtensionFilter::new(
                split_extensions(&args.include),
                split_extensions(&args.exclude),
            ),
            show_report: args.report,
            show_progress: !args.quiet,
            log_level: if args.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            },
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.paths.is_empty(), InvalidArgument, "at least one PATH is required");

        // Check if output file directory exists
        if let Some(output) = &self.output_file {
            ensure!(
                !output.is_dir(),
                Config,
                "Output path is a directory: {}",
                output.display()
            );
            if let Some(parent) = output.parent() {
                ensure!(
                    parent == Path::new("") || parent.is_dir(),
                    Config,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        Ok(())
    }
}

/// Split comma-separated extension arguments.
///
/// Empty pieces left by stray commas are dropped; an argument that is exactly
/// `""` or `.` selects files without an extension and is kept.
fn split_extensions(raw: &[String]) -> Vec<String> {
    let mut extensions = Vec::new();
    for arg in raw {
        if arg.is_empty() || arg == "." {
            extensions.push(arg.clone());
            continue;
        }
        extensions.extend(
            arg.split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string),
        );
    }
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_arguments() {
        let args = Args::try_parse_from([
            "concatfs",
            "src",
            "README.md",
            "-r",
            "-o",
            "out.txt",
            "--include",
            "py",
            "--include",
            ".RS,toml",
            "--exclude",
            "pyc",
        ])
        .unwrap();
        let config = Config::from_args(args);

        assert_eq!(config.paths, vec![PathBuf::from("src"), PathBuf::from("README.md")]);
        assert_eq!(config.output_file, Some(PathBuf::from("out.txt")));
        assert!(config.recursive);
        assert!(config.filter.matches("a.py"));
        assert!(config.filter.matches("lib.rs"));
        assert!(config.filter.matches("Cargo.toml"));
        assert!(!config.filter.matches("a.pyc"));
        assert!(!config.filter.matches("notes.txt"));
        assert!(config.show_progress);
        assert!(!config.show_report);
        assert_eq!(config.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_trailing_comma_does_not_select_extensionless_files() {
        let args = Args::try_parse_from(["concatfs", ".", "--include", "py,", "--exclude", ",log"]).unwrap();
        let config = Config::from_args(args);

        assert_eq!(config.filter.included().len(), 1);
        assert!(config.filter.included().contains("py"));
        assert!(!config.filter.included().contains(""));
        assert!(!config.filter.excluded().contains(""));
        assert!(config.filter.matches("a.py"));
        assert!(!config.filter.matches("Makefile"));
    }

    #[test]
    fn test_literal_empty_extension_is_kept() {
        let args = Args::try_parse_from(["concatfs", ".", "--include", "", "--include", "md"]).unwrap();
        let config = Config::from_args(args);
        assert!(config.filter.included().contains(""));
        assert!(config.filter.matches("Makefile"));
        assert!(config.filter.matches("README.md"));
        assert!(!config.filter.matches("main.rs"));

        let args = Args::try_parse_from(["concatfs", ".", "--exclude", "."]).unwrap();
        let config = Config::from_args(args);
        assert!(config.filter.excluded().contains(""));
        assert!(!config.filter.matches("LICENSE"));
        assert!(config.filter.matches("main.rs"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_args(Args::try_parse_from(["concatfs", "."]).unwrap());
        assert!(!config.recursive);
        assert_eq!(config.output_file, None);
        assert_eq!(config.filter, ExtensionFilter::allow_all());
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Args::try_parse_from(["concatfs"]).is_err());
        assert!(Args::try_parse_from(["concatfs", "--generate", "bash"]).is_ok());
    }

    #[test]
    fn test_validate_output_directory() {
        let dir = tempdir().unwrap();
        let mut config = Config::from_args(Args::try_parse_from(["concatfs", "."]).unwrap());
        assert!(config.validate().is_ok());

        config.output_file = Some(dir.path().join("out.txt"));
        assert!(config.validate().is_ok());

        config.output_file = Some(PathBuf::from("out.txt"));
        assert!(config.validate().is_ok());

        config.output_file = Some(dir.path().join("missing").join("out.txt"));
        assert!(config.validate().is_err());

        config.output_file = Some(dir.path().to_path_buf());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_paths() {
        let mut config = Config::from_args(Args::try_parse_from(["concatfs", "."]).unwrap());
        config.paths.clear();
        assert!(config.validate().is_err());
    }
}
