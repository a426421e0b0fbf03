//! Tree walk and parallel per-file auditing.

mod audit;
mod count;
mod process;

use std::path::Path;

use glob::Pattern;

use crate::report::AuditRecord;

pub use audit::{AuditContext, audit_file};
pub use count::count;
pub use process::process;

pub struct ScanResult {
    pub records: Vec<AuditRecord>,
    pub excluded_count: usize,
}

/// Check if a path should be excluded based on a list of glob patterns.
/// Patterns match either the full path or the bare file name.
pub(crate) fn is_path_excluded(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    exclude_patterns
        .iter()
        .any(|pattern| pattern.matches(&path_str) || pattern.matches(&file_name))
}
