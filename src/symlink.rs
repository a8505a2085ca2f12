//! Helpers for working with symbolic links.
//!
//! These centralize the platform distinctions so callers don't duplicate
//! them. IO errors propagate unchanged; callers decide whether to fall back
//! to copying or give up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Create a symbolic link at `link` that points to `target`.
///
/// On Unix this delegates to `std::os::unix::fs::symlink`. On Windows the
/// link kind is chosen from the target's metadata; a missing target defaults
/// to a file symlink.
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        let use_dir = target.metadata().map(|m| m.is_dir()).unwrap_or(false);
        if use_dir {
            symlink_dir(target, link)
        } else {
            symlink_file(target, link)
        }
    }
}

/// Returns `true` when `path` itself is a symbolic link (not followed).
/// Probe failures, including a missing path, count as `false`.
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Read the target a symbolic link points to.
pub fn read_symlink(path: &Path) -> io::Result<PathBuf> {
    path.read_link()
}

/// Remove the symbolic link node at `path` without touching its target.
pub fn remove_symlink(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        fs::remove_file(path)
    }

    #[cfg(windows)]
    {
        // metadata() follows the link, which tells us whether the target is
        // a directory; Windows removes directory links with remove_dir.
        let meta = path.metadata()?;
        if meta.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
    }
}
