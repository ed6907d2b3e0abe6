//! Filesystem helpers shared by archive extraction and the projector variants.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ProjectorError, Result};

/// Run blocking filesystem or codec work off the async executor
pub async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ProjectorError::generic(format!("Blocking task failed: {}", e)))?
}

/// Map a directory walk failure onto the I/O error that caused it
pub fn walk_error(err: walkdir::Error) -> ProjectorError {
    ProjectorError::Io(
        err.into_io_error()
            .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk loop")),
    )
}

/// Recursively copy `src` into `dest`, creating `dest` if needed
///
/// Symlinks are recreated as symlinks on Unix so application bundles keep
/// their framework layout; elsewhere the link target is copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<u64> {
    fs::create_dir_all(dest)?;
    let mut copied = 0u64;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(walk_error)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| ProjectorError::generic(e.to_string()))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!("Copied {} entries from {:?} to {:?}", copied, src, dest);
    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(src)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    std::os::unix::fs::symlink(link, target)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::metadata(src)?.is_dir() {
        copy_tree(src, target)?;
    } else {
        fs::copy(src, target)?;
    }
    Ok(())
}

/// Trim `extension` from the end of `name`, ignoring ASCII case
pub fn trim_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    if extension.is_empty() || name.len() < extension.len() {
        return name;
    }
    let split = name.len() - extension.len();
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(tail)) if tail.eq_ignore_ascii_case(extension) => stem,
        _ => name,
    }
}

/// Case-insensitive suffix test on a file name
pub fn has_suffix_ignore_case(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .map(|tail| tail.eq_ignore_ascii_case(suffix))
            .unwrap_or(false)
}
