use std::fs;
use std::path::Path;

/// Lightweight classification of a filesystem path's kind.
///
/// Classification looks at the node itself (link metadata); a symbolic link
/// is reported as [`PathType::Symlink`] regardless of what it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    /// The path does not exist.
    NotFound,
    /// The path exists and is a directory.
    Directory,
    /// The path exists and is a regular file.
    File,
    /// The path is a symbolic link (possibly dangling).
    Symlink,
    /// The path exists but is none of the above
    /// (socket, FIFO, block device, etc.).
    Other,
}

impl PathType {
    /// Classify `path` and return its `PathType`.
    ///
    /// The kind is resolved at call time; nothing is cached between calls.
    pub fn of<P: AsRef<Path>>(path: P) -> Self {
        let meta = match fs::symlink_metadata(path.as_ref()) {
            Ok(m) => m,
            Err(_) => return PathType::NotFound,
        };
        let ft = meta.file_type();
        if ft.is_symlink() {
            PathType::Symlink
        } else if ft.is_dir() {
            PathType::Directory
        } else if ft.is_file() {
            PathType::File
        } else {
            PathType::Other
        }
    }
}

/// Return `true` if the provided `path` exists. Never errors: IO failures
/// while probing count as "does not exist".
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Return `true` if `path` resolves to a directory (symlinks followed).
pub fn is_dir<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_dir()
}

/// Return `true` if `path` resolves to a regular file (symlinks followed).
pub fn is_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}

/// Return `true` when `path` itself is a symbolic link (not followed).
pub fn is_symlink<P: AsRef<Path>>(path: P) -> bool {
    PathType::of(path) == PathType::Symlink
}

#[cfg(unix)]
fn access_ok(path: &Path, amode: nix::unistd::AccessFlags) -> bool {
    nix::unistd::access(path, amode).is_ok()
}

/// Return `true` if the calling process may read `path`.
#[cfg(unix)]
pub fn is_readable<P: AsRef<Path>>(path: P) -> bool {
    access_ok(path.as_ref(), nix::unistd::AccessFlags::R_OK)
}

/// Return `true` if the calling process may write `path`.
#[cfg(unix)]
pub fn is_writable<P: AsRef<Path>>(path: P) -> bool {
    access_ok(path.as_ref(), nix::unistd::AccessFlags::W_OK)
}

/// Return `true` if the calling process may execute `path`.
#[cfg(unix)]
pub fn is_executable<P: AsRef<Path>>(path: P) -> bool {
    access_ok(path.as_ref(), nix::unistd::AccessFlags::X_OK)
}

// On non-Unix platforms there is no access(2); approximate with metadata.
#[cfg(not(unix))]
pub fn is_readable<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path.as_ref()).is_ok()
}

#[cfg(not(unix))]
pub fn is_writable<P: AsRef<Path>>(path: P) -> bool {
    fs::metadata(path.as_ref())
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable<P: AsRef<Path>>(_path: P) -> bool {
    false
}
