use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// What happens to a file's temporary resources once its pipeline run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetentionPolicy {
    #[default]
    Release,
    /// Keep everything on disk and report where it is (`--debug`).
    Retain,
}

/// Scratch directory for one file's pipeline run: rasterized pages, the
/// intermediate PDF of a slide deck, the extracted markdown in retain mode.
///
/// Dropped → deleted, unless the policy says retain.
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
    policy: RetentionPolicy,
}

impl ScratchDir {
    pub fn acquire(policy: RetentionPolicy) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("onoma_").tempdir()?;
        let path = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            path,
            policy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Write extracted text next to the page images. Only done when the
    /// resources are being kept for inspection.
    pub fn retain_text(&self, text: &str) -> io::Result<()> {
        if self.policy == RetentionPolicy::Retain {
            fs::write(self.join("extracted_content.md"), text)?;
        }
        Ok(())
    }

    /// End of the run. Returns the kept location under `Retain`; otherwise
    /// the directory is removed and `None` comes back.
    pub fn finish(mut self) -> Option<PathBuf> {
        let dir = self.dir.take()?;
        match self.policy {
            RetentionPolicy::Retain => Some(dir.keep()),
            RetentionPolicy::Release => {
                if let Err(e) = dir.close() {
                    tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
                }
                None
            }
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.policy == RetentionPolicy::Retain {
            if let Some(dir) = self.dir.take() {
                let kept = dir.keep();
                tracing::debug!("Retained scratch directory {}", kept.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_removes_directory() {
        let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
        let path = scratch.path().to_path_buf();
        fs::write(scratch.join("page_1.png"), b"png").unwrap();

        assert!(scratch.finish().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_release_on_drop() {
        let path = {
            let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_retain_keeps_directory_and_text() {
        let scratch = ScratchDir::acquire(RetentionPolicy::Retain).unwrap();
        scratch.retain_text("# Notes").unwrap();

        let kept = scratch.finish().expect("retained path");
        assert!(kept.join("extracted_content.md").exists());
        fs::remove_dir_all(kept).unwrap();
    }

    #[test]
    fn test_release_does_not_write_text() {
        let scratch = ScratchDir::acquire(RetentionPolicy::Release).unwrap();
        scratch.retain_text("# Notes").unwrap();
        assert!(!scratch.join("extracted_content.md").exists());
    }
}
