use colored::*;
use std::collections::HashSet;
use std::path::Path;

use crate::models::{FormatTag, SourceFile};

/// Expand glob patterns into regular files, first occurrence wins.
/// Directories, unreadable entries and bad patterns are warned about and
/// skipped.
pub fn collect_files(patterns: &[String], forced: Option<FormatTag>) -> Vec<SourceFile> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let entries = match glob::glob(pattern) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("{}: Invalid pattern {}: {}", "Warning".yellow(), pattern, e);
                continue;
            }
        };

        let mut matched = false;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    eprintln!("{}: {}", "Warning".yellow(), e);
                    continue;
                }
            };
            matched = true;

            if !path.is_file() {
                tracing::debug!("Skipping non-file {}", path.display());
                continue;
            }
            if !seen.insert(path.clone()) {
                continue;
            }

            match SourceFile::new(path.clone(), forced) {
                Ok(file) => files.push(file),
                Err(e) => {
                    eprintln!(
                        "{}: Failed to read {}: {}",
                        "Warning".yellow(),
                        path.display(),
                        e
                    );
                }
            }
        }

        if !matched {
            eprintln!("{}: No files match {}", "Warning".yellow(), pattern);
        }
    }

    files
}

pub fn total_size(files: &[SourceFile]) -> u64 {
    files.iter().map(|f| f.size).sum()
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
