use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Error;
use glob::Pattern;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::scanner::audit::{AuditContext, audit_file};
use crate::scanner::{ScanResult, is_path_excluded};

/// Walk `path` depth-first and audit every file, in parallel per directory.
/// Directory read failures are contained to the directory that failed.
pub fn process<P: AsRef<Path>>(
    path: P,
    max_depth: usize,
    progress_bar: Arc<ProgressBar>,
    exclude_patterns: &[Pattern],
    ctx: &AuditContext,
) -> Result<ScanResult, Error> {
    let path = path.as_ref();

    if is_path_excluded(path, exclude_patterns) {
        return Ok(ScanResult {
            records: Vec::new(),
            excluded_count: 1,
        });
    }

    let mut records = Vec::new();
    let mut total_excluded = 0;

    let entries: Vec<_> = fs::read_dir(path)?.filter_map(Result::ok).collect();

    let mut file_entries = Vec::new();
    let mut dir_entries = Vec::new();

    for entry in entries {
        let path = entry.path();

        if is_path_excluded(&path, exclude_patterns) {
            total_excluded += 1;
            continue;
        }

        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => file_entries.push(path),
            Ok(_) if path.is_dir() => dir_entries.push(path),
            _ => continue,
        }
    }

    records.append(
        &mut file_entries
            .par_iter()
            .map(|path| {
                let record = audit_file(ctx, path);
                progress_bar.inc(1);
                record
            })
            .collect(),
    );

    for path in dir_entries {
        if max_depth == 0 {
            continue;
        }
        match process(
            &path,
            max_depth - 1,
            progress_bar.clone(),
            exclude_patterns,
            ctx,
        ) {
            Ok(mut result) => {
                records.append(&mut result.records);
                total_excluded += result.excluded_count;
            }
            Err(e) => eprintln!("Error processing directory {}: {}", path.display(), e),
        }
    }

    Ok(ScanResult {
        records,
        excluded_count: total_excluded,
    })
}
