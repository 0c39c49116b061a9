use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::Resolution;

/// `base` plus the source file's extension, if it had one. The extension is
/// copied as raw OS bytes, so non-UTF-8 extensions survive.
pub fn with_extension(base: &str, extension: Option<&OsStr>) -> OsString {
    let mut name = OsString::from(base);
    if let Some(ext) = extension.filter(|e| !e.is_empty()) {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Pick the first candidate whose name (with the original extension) is not
/// taken. If all are taken, number the first candidate: `_1`, `_2`, ...
///
/// Never returns a member of `existing`. The counter needs at most
/// `existing.len() + 1` tries since each taken suffix is a distinct entry.
/// `None` only for an empty candidate list.
pub fn resolve(
    candidates: &[String],
    existing: &HashSet<OsString>,
    extension: Option<&OsStr>,
) -> Option<(OsString, Resolution)> {
    let first = candidates.first()?;

    for (index, candidate) in candidates.iter().enumerate() {
        let name = with_extension(candidate, extension);
        if !existing.contains(&name) {
            return Some((name, Resolution::Candidate(index)));
        }
    }

    let mut counter = 1;
    loop {
        let name = with_extension(&format!("{}_{}", first, counter), extension);
        if !existing.contains(&name) {
            return Some((name, Resolution::Suffix(counter)));
        }
        counter += 1;
    }
}

pub fn list_entries(dir: &Path) -> io::Result<HashSet<OsString>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(dir)? {
        names.insert(entry?.file_name());
    }
    Ok(names)
}

/// Directory a file lives in, `.` for bare relative names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Names handed out during this batch, per directory. Resolution reads the
/// directory and claims the winner under one lock, so two files chasing the
/// same candidate can never both get it, including in dry-run where nothing
/// is renamed yet.
#[derive(Debug, Default)]
pub struct NameReservations {
    claimed: Mutex<HashMap<PathBuf, HashSet<OsString>>>,
}

impl NameReservations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(
        &self,
        dir: &Path,
        candidates: &[String],
        extension: Option<&OsStr>,
    ) -> io::Result<Option<(OsString, Resolution)>> {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut existing = list_entries(dir)?;
        let taken = claimed.entry(dir.to_path_buf()).or_default();
        existing.extend(taken.iter().cloned());

        let resolved = resolve(candidates, &existing, extension);
        if let Some((name, _)) = &resolved {
            taken.insert(name.clone());
        }
        Ok(resolved)
    }
}
