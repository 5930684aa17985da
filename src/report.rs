/*!
 * Reporting functionality for concatfs
 *
 * Renders a summary of a run as tables using the tabled library.
 */

use std::path::Path;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::collector::SkippedPath;
use crate::utils::format_file_size;
use crate::writer::FileRecord;

/// Statistics for a run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Output destination ("STDOUT" when not writing to a file)
    pub output: String,
    /// Time taken to collect, assemble and write
    pub duration: Duration,
    /// One record per file block, in output order
    pub files: Vec<FileRecord>,
    /// Input paths and entries that were skipped
    pub skipped: Vec<SkippedPath>,
}

impl RunReport {
    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|f| f.lines).sum()
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes).sum()
    }

    pub fn placeholders(&self) -> usize {
        self.files.iter().filter(|f| f.placeholder).count()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, stdout may carry the output itself
    pub fn print_report(&self, report: &RunReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    // Keep the file name and as many parent directories as fit
    fn format_path(&self, path: &Path, max_len: usize) -> String {
        let full = path.to_string_lossy();
        if full.chars().count() <= max_len {
            return full.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3;
        for part in path.iter().rev() {
            let part = part.to_string_lossy();
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len && !segments.is_empty() {
                break;
            }
            current_len += part_len;
            segments.push(part.to_string());
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "Output".to_string(),
                value: report.output.clone(),
            },
            SummaryRow {
                key: "Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Files Written".to_string(),
                value: self.format_number(report.files.len()),
            },
            SummaryRow {
                key: "Total Lines".to_string(),
                value: self.format_number(report.total_lines()),
            },
            SummaryRow {
                key: "Total Size".to_string(),
                value: format_file_size(report.total_bytes() as u64),
            },
            SummaryRow {
                key: "Unreadable Files".to_string(),
                value: report.placeholders().to_string(),
            },
            SummaryRow {
                key: "Skipped Paths".to_string(),
                value: report.skipped.len().to_string(),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        let rows: Vec<FileRow> = report
            .files
            .iter()
            .map(|file| FileRow {
                path: self.format_path(&file.path, 60),
                lines: self.format_number(file.lines),
                size: if file.placeholder {
                    "unreadable".to_string()
                } else {
                    format_file_size(file.bytes as u64)
                },
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_skipped_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SkippedRow {
            #[tabled(rename = "Path")]
            path: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<SkippedRow> = report
            .skipped
            .iter()
            .map(|skipped| SkippedRow {
                path: self.format_path(&skipped.path, 60),
                reason: skipped.reason.to_string(),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        let mut sections = Vec::new();

        if report.files.is_empty() {
            sections.push("No files matched the given criteria.".to_string());
        } else {
            sections.push(format!("CONCATENATED FILES\n{}", self.create_files_table(report)));
        }

        if !report.skipped.is_empty() {
            sections.push(format!("SKIPPED PATHS\n{}", self.create_skipped_table(report)));
        }

        sections.push(format!("SUMMARY\n{}", self.create_summary_table(report)));
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::SkipReason;
    use std::path::PathBuf;

    fn sample_report() -> RunReport {
        RunReport {
            output: "out.txt".to_string(),
            duration: Duration::from_millis(12),
            files: vec![
                FileRecord {
                    path: PathBuf::from("/proj/a.py"),
                    lines: 10,
                    bytes: 200,
                    placeholder: false,
                },
                FileRecord {
                    path: PathBuf::from("/proj/locked.py"),
                    lines: 1,
                    bytes: 40,
                    placeholder: true,
                },
            ],
            skipped: vec![SkippedPath {
                path: PathBuf::from("missing"),
                reason: SkipReason::NotFound,
            }],
        }
    }

    #[test]
    fn test_totals() {
        let report = sample_report();
        assert_eq!(report.total_lines(), 11);
        assert_eq!(report.total_bytes(), 240);
        assert_eq!(report.placeholders(), 1);
    }

    #[test]
    fn test_console_report_sections() {
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&sample_report());
        assert!(text.contains("CONCATENATED FILES"));
        assert!(text.contains("/proj/a.py"));
        assert!(text.contains("unreadable"));
        assert!(text.contains("SKIPPED PATHS"));
        assert!(text.contains("does not exist"));
        assert!(text.contains("Files Written"));
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport {
            output: "STDOUT".to_string(),
            duration: Duration::from_millis(1),
            files: vec![],
            skipped: vec![],
        };
        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);
        assert!(text.starts_with("No files matched the given criteria."));
        assert!(!text.contains("SKIPPED PATHS"));
    }

    #[test]
    fn test_format_path_truncates_from_the_left() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        let path = PathBuf::from("/very/long/directory/name/that/goes/on/and/on/file.rs");
        let formatted = reporter.format_path(&path, 20);
        assert!(formatted.starts_with("..."));
        assert!(formatted.ends_with("/file.rs"));
        assert!(formatted.chars().count() <= 20);
        assert_eq!(reporter.format_path(Path::new("/a/b.rs"), 20), "/a/b.rs");
    }
}
