/*!
 * Extension based file filtering
 */

use std::collections::HashSet;

/// Include/exclude rules keyed on the lowercase, dot-free file extension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// Allowed extensions; empty means every extension is allowed
    included: HashSet<String>,
    /// Rejected extensions, checked after `included`
    excluded: HashSet<String>,
}

impl ExtensionFilter {
    /// Create a filter, normalizing every extension the way `matches` compares them
    pub fn new<I, E, S, T>(included: I, excluded: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            included: included.into_iter().map(|e| normalize(e.as_ref())).collect(),
            excluded: excluded.into_iter().map(|e| normalize(e.as_ref())).collect(),
        }
    }

    /// A filter that lets every file through
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Check whether a file name passes the include/exclude rules
    pub fn matches(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);

        if !self.included.is_empty() && !self.included.contains(&ext) {
            return false;
        }

        !self.excluded.contains(&ext)
    }

    pub fn included(&self) -> &HashSet<String> {
        &self.included
    }

    pub fn excluded(&self) -> &HashSet<String> {
        &self.excluded
    }
}

/// Lowercased suffix after the last `.` of a file name, or `""` when there is none
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(pos) => file_name[pos + 1..].to_lowercase(),
        None => String::new(),
    }
}

fn normalize(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}
