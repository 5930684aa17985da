/*!
 * Utility functions for concatfs
 */

use std::path::Path;

/// Name used for a path in the tree: its last component, or the whole path for roots like `/`
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => path.to_string_lossy().to_string(),
    }
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Count lines the way editors do: a trailing newline does not start a new line
pub fn count_lines(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.lines().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/home/user/proj")), "proj");
        assert_eq!(display_name(Path::new("/home/user/a.py")), "a.py");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(""), 0);
        assert_eq!(count_lines("one"), 1);
        assert_eq!(count_lines("one\ntwo\n"), 2);
        assert_eq!(count_lines("one\n\nthree"), 3);
    }
}
