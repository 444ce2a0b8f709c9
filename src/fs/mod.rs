/// File system helpers for build directories
///
/// Responsibilities:
/// - On-demand directory creation
/// - Recursive build directory removal (no-op if absent)
/// - Moving a build directory aside while it is being replaced
/// - Atomic file writes (used for the generator marker)
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create a directory (and parents) if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "CREATE-DIRECTORY");
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Recursively remove a directory tree.
///
/// Returns `true` if something was (or, in dry-run mode, would have been)
/// removed. A missing directory is not an error.
pub fn remove_dir_tree(dir: &Path, dry_run: bool) -> Result<bool> {
    if dry_run {
        tracing::info!(dir = %dir.display(), "REMOVE_DIR (DRY-RUN SIMULATED)");
        return Ok(dir.is_dir());
    }

    if !dir.is_dir() {
        return Ok(false);
    }

    tracing::info!(dir = %dir.display(), "RMTREE");
    fs::remove_dir_all(dir)
        .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;

    Ok(true)
}

/// Sibling path a directory is moved to while it is being replaced
pub fn aside_path(dir: &Path) -> PathBuf {
    let mut name = dir.file_name().unwrap_or_default().to_os_string();
    name.push(".old");
    dir.with_file_name(name)
}

/// Rename `dir` to its aside path, replacing a stale leftover there.
///
/// Returns the aside path; `dir` no longer exists afterwards.
pub fn move_aside(dir: &Path) -> Result<PathBuf> {
    let aside = aside_path(dir);
    remove_dir_tree(&aside, false)?;

    tracing::debug!(from = %dir.display(), to = %aside.display(), "MOVE-ASIDE");
    fs::rename(dir, &aside).with_context(|| {
        format!("Failed to move {} to {}", dir.display(), aside.display())
    })?;

    Ok(aside)
}

/// Undo [`move_aside`]: drop whatever is at `dir` and move `aside` back
pub fn restore_aside(aside: &Path, dir: &Path) -> Result<()> {
    remove_dir_tree(dir, false)?;

    tracing::debug!(from = %aside.display(), to = %dir.display(), "RESTORE");
    fs::rename(aside, dir).with_context(|| {
        format!("Failed to move {} back to {}", aside.display(), dir.display())
    })
}

/// Write file atomically (write to temp, then rename)
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
