use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt as _;

/// Exclusive lock on a source file's directory while it is rewritten.
///
/// The lock is released, and its lock file removed, when the guard is dropped.
#[derive(Debug)]
pub(crate) struct WriteGuard {
    file: File,
    path: PathBuf,
}

impl WriteGuard {
    pub(crate) fn acquire(target: &Path) -> Result<Self> {
        let path = lock_path(target);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("failed to open lock file {}", path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("failed to lock {}", path.display()))?;
        Ok(Self { file, path })
    }

    /// Replace `target` with `text` via a temporary file in the same directory.
    pub(crate) fn write(&self, target: &Path, text: &str) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(parent_dir(target))
            .context("failed to create temporary file")?;
        tmp.write_all(text.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(target)
            .with_context(|| format!("failed to replace {}", target.display()))?;
        Ok(())
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::debug!(
                target: "callmatch.cli",
                path = %self.path.display(),
                error = %err,
                "failed to remove lock file"
            );
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn lock_path(target: &Path) -> PathBuf {
    parent_dir(target).join(".callmatch.lock")
}
