//! Temporary file management module
//!
//! RAII guards for downloaded archives and their extraction directories.
//! Both are removed again when the guard is dropped.

use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Guard for temporary resources that automatically cleans up on drop
#[derive(Debug)]
pub(crate) enum TempGuard {
    /// Temporary file that will be deleted when dropped
    File(PathBuf),
    /// Temporary directory that will be deleted recursively when dropped
    Directory(PathBuf),
}

impl TempGuard {
    /// Get the path to the temporary resource
    pub(crate) fn path(&self) -> &Path {
        match self {
            TempGuard::File(path) | TempGuard::Directory(path) => path,
        }
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        // Errors during cleanup are ignored
        let result = match self {
            TempGuard::File(path) => fs::remove_file(path),
            TempGuard::Directory(path) => fs::remove_dir_all(path),
        };

        if let Err(e) = result {
            tracing::debug!(path = %self.path().display(), error = %e, "Failed to remove temporary resource");
        }
    }
}

impl Deref for TempGuard {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.path()
    }
}

/// Unique path in the system's temporary directory, named with a ULID
fn unique_temp_path(prefix: &str, extension: Option<&str>) -> PathBuf {
    let ulid = ulid::Ulid::new();
    let name = match extension {
        Some(extension) => format!("{}_{}.{}", prefix, ulid, extension),
        None => format!("{}_{}", prefix, ulid),
    };

    std::env::temp_dir().join(name)
}

/// Writes `contents` to a new temporary file and returns its guard
///
/// # Examples
///
/// ```ignore
/// let archive = create_temp_file("series", "zip", &bytes)?;
/// // The file is deleted when `archive` goes out of scope
/// ```
pub(crate) fn create_temp_file(prefix: &str, extension: &str, contents: &[u8]) -> io::Result<TempGuard> {
    let path = unique_temp_path(prefix, Some(extension));
    fs::write(&path, contents)?;

    Ok(TempGuard::File(path))
}

/// Creates an empty temporary directory and returns its guard
pub(crate) fn create_temp_dir(prefix: &str) -> io::Result<TempGuard> {
    let path = unique_temp_path(prefix, None);
    fs::create_dir_all(&path)?;

    Ok(TempGuard::Directory(path))
}
