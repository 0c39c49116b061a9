use std::fs;
use std::path::PathBuf;

use crate::error::RenameError;
use crate::models::RenamePlan;

/// Move the source to its planned name in the same directory. An existing
/// target, including a dangling symlink, is refused rather than overwritten.
/// The check is not atomic with the rename, so the resolver's claim is what
/// actually prevents clashes.
pub fn execute(plan: &RenamePlan) -> Result<PathBuf, RenameError> {
    if plan.source.parent().is_none() {
        return Err(RenameError::NoParent(plan.source.clone()));
    }
    let target = plan.target_path();

    if fs::symlink_metadata(&target).is_ok() {
        return Err(RenameError::TargetExists(target));
    }

    fs::rename(&plan.source, &target).map_err(|source| RenameError::Io {
        from: plan.source.clone(),
        to: target.clone(),
        source,
    })?;

    tracing::info!("Renamed {} to {}", plan.source.display(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resolution;
    use tempfile::TempDir;

    fn plan(source: PathBuf, target_name: &str) -> RenamePlan {
        RenamePlan {
            source,
            target_name: target_name.into(),
            resolution: Resolution::Candidate(0),
        }
    }

    #[test]
    fn test_rename_success() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("original.txt");
        fs::write(&src, "data").unwrap();

        let renamed = execute(&plan(src.clone(), "renamed.txt")).unwrap();

        assert!(!src.exists());
        assert_eq!(renamed, dir.path().join("renamed.txt"));
        assert_eq!(fs::read_to_string(renamed).unwrap(), "data");
    }

    #[test]
    fn test_existing_target_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("original.txt");
        let other = dir.path().join("renamed.txt");
        fs::write(&src, "data").unwrap();
        fs::write(&other, "other").unwrap();

        let err = execute(&plan(src.clone(), "renamed.txt")).unwrap_err();

        assert!(matches!(err, RenameError::TargetExists(_)));
        assert!(src.exists());
        assert_eq!(fs::read_to_string(other).unwrap(), "other");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_target_not_replaced() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("original.txt");
        let link = dir.path().join("renamed.txt");
        fs::write(&src, "data").unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();

        let err = execute(&plan(src.clone(), "renamed.txt")).unwrap_err();

        assert!(matches!(err, RenameError::TargetExists(_)));
        assert!(src.exists());
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_missing_source_reports_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("gone.txt");

        let err = execute(&plan(src, "renamed.txt")).unwrap_err();

        assert!(matches!(err, RenameError::Io { .. }));
        assert!(!dir.path().join("renamed.txt").exists());
    }
}
