//! Directory size measurement.
//!
//! This module walks a directory tree and reports how many bytes its regular
//! files occupy and how many of them there are. Traversal errors are returned
//! to the caller as [`std::io::Error`] so a missing path can be told apart
//! from any other failure.

use std::{io, path::Path};

use walkdir::WalkDir;

/// Aggregate size and file count of a directory tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirStats {
    /// Total length in bytes of every regular file found
    pub size: u64,

    /// Number of regular files found
    pub files: u64,
}

/// Calculate the total size and file count of a directory tree.
///
/// Recursively traverses `path` using `walkdir`, summing the lengths of all
/// regular files and counting them.
///
/// # Traversal policy
///
/// - Symbolic links below the root are not followed and not counted.
/// - Directories are descended into but are not counted as files.
/// - Zero-byte files count as files.
/// - Each directory entry is counted once, so a file reachable through several
///   hard links is counted once per link.
/// - If `path` is itself a regular file, the result is its length and a count of 1.
///
/// # Errors
///
/// The first traversal error aborts the walk and is returned unchanged. A path
/// that does not exist yields an error of kind [`io::ErrorKind::NotFound`]
/// (see [`is_not_found`]); unreadable directories anywhere in the tree yield
/// [`io::ErrorKind::PermissionDenied`].
///
/// # Examples
///
/// ```no_run
/// # use std::path::Path;
/// # use doku_du::utils::dir_size;
/// let stats = dir_size(Path::new("/var/lib/docker/volumes"))?;
/// println!("{} bytes in {} files", stats.size, stats.files);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn dir_size(path: &Path) -> io::Result<DirStats> {
    let mut stats = DirStats::default();

    for entry in WalkDir::new(path) {
        let entry = entry?;
        if entry.file_type().is_file() {
            stats.size += entry.metadata()?.len();
            stats.files += 1;
        }
    }

    Ok(stats)
}

/// Whether `err` means the path does not exist.
#[must_use]
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}
