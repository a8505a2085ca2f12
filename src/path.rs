//! Pure helpers for picking apart and rebuilding path strings.
//!
//! Nothing in this module touches the filesystem except
//! [`resolve_target`] (which probes whether the destination is a directory)
//! and [`ensure_parent_exists`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Extension of `path` without the leading dot, when it has one.
pub fn extension<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
}

/// File name of `path` without its extension (`/a/b/c.txt` -> `c`).
pub fn name<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}

/// Final component of `path`, extension included.
pub fn basename<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
}

/// Replace (or add) the extension of `path`.
pub fn set_extension<P: AsRef<Path>>(path: P, ext: &str) -> PathBuf {
    let mut p = path.as_ref().to_path_buf();
    p.set_extension(ext);
    p
}

/// Strip the extension from `path`, if any.
pub fn remove_extension<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut p = path.as_ref().to_path_buf();
    p.set_extension("");
    p
}

/// Ancestor of `path`, `levels` components up. `levels` of zero returns the
/// path itself.
pub fn parent<P: AsRef<Path>>(path: P, levels: usize) -> Option<PathBuf> {
    let mut p = path.as_ref();
    for _ in 0..levels {
        p = p.parent()?;
    }
    Some(p.to_path_buf())
}

/// True when the final path component starts with a dot, the Unix
/// hidden-name convention. Purely lexical; the path need not exist.
pub fn is_hidden_name<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Resolve the destination path for an operation: if `dst` looks like a
/// directory (exists as one or ends with a separator) the target becomes
/// `dst.join(src_name)`, otherwise `dst` itself.
pub fn resolve_target(dst: &Path, src_name: &str) -> PathBuf {
    if dst.is_dir() || dst.to_string_lossy().ends_with('/') {
        dst.join(src_name)
    } else {
        dst.to_path_buf()
    }
}

/// Ensure the parent directory of `p` exists, creating it if needed.
pub fn ensure_parent_exists(p: &Path) -> Result<()> {
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn extension_and_name_parts() {
        assert_eq!(extension("/a/b/c.txt").as_deref(), Some("txt"));
        assert_eq!(extension("/a/b/noext"), None);
        assert_eq!(name("/a/b/c.txt").as_deref(), Some("c"));
        assert_eq!(basename("/a/b/c.txt").as_deref(), Some("c.txt"));
    }

    #[test]
    fn extension_rewrites() {
        assert_eq!(set_extension("/a/b/c.txt", "json"), PathBuf::from("/a/b/c.json"));
        assert_eq!(set_extension("/a/b/c", "json"), PathBuf::from("/a/b/c.json"));
        assert_eq!(remove_extension("/a/b/c.txt"), PathBuf::from("/a/b/c"));
    }

    #[test]
    fn parent_levels() {
        assert_eq!(parent("/a/b/c", 1), Some(PathBuf::from("/a/b")));
        assert_eq!(parent("/a/b/c", 2), Some(PathBuf::from("/a")));
        assert_eq!(parent("/a/b/c", 0), Some(PathBuf::from("/a/b/c")));
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden_name("/home/user/.config"));
        assert!(!is_hidden_name("/home/user/config"));
    }

    #[test]
    fn resolve_target_into_directory() {
        let td = tempdir().unwrap();
        let got = resolve_target(td.path(), "f.txt");
        assert_eq!(got, td.path().join("f.txt"));

        let plain = td.path().join("dest.txt");
        assert_eq!(resolve_target(&plain, "f.txt"), plain);
    }

    #[test]
    fn ensure_parent_creates_chain() {
        let td = tempdir().unwrap();
        let deep = td.path().join("x/y/z/file.txt");
        ensure_parent_exists(&deep).unwrap();
        assert!(deep.parent().unwrap().is_dir());
    }
}
