//! Recursive whole-subtree operations built from the leaf layer.
//!
//! Traversal is iterative (`walkdir`), so pathologically deep trees cannot
//! exhaust the call stack. Symbolic links are never followed: a symlinked
//! directory inside a tree is treated as a leaf node, which both prevents
//! cycles and keeps destructive operations from reaching files outside the
//! tree through the link.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::entry::{self, EntryKind};
use crate::error::{DeleteReport, FsError, Result};
use crate::{file, metadata, path as path_util, symlink};

/// Options for [`list_entries`].
#[derive(Debug, Default, Clone)]
pub struct ListOptions {
    /// Return full joined paths instead of bare names.
    pub full_path: bool,
    /// Allow-list of extensions (without the dot). Only entries whose
    /// extension is in the list are returned; `None` returns everything.
    pub extensions: Option<Vec<String>>,
}

impl ListOptions {
    fn admits(&self, p: &Path) -> bool {
        match &self.extensions {
            None => true,
            Some(allowed) => extension_matches(p, allowed),
        }
    }
}

fn extension_matches<S: AsRef<str>>(p: &Path, allowed: &[S]) -> bool {
    match path_util::extension(p) {
        Some(ext) => allowed.iter().any(|a| a.as_ref() == ext),
        None => false,
    }
}

/// Delete the directory tree rooted at `path`, children before parents.
///
/// Fails with [`FsError::NotADirectory`] when the precondition does not
/// hold. Symlinked directories inside the tree are unlinked, never
/// descended into. With `preserve_root` the root directory itself survives,
/// emptied. The pass is best-effort: individual removal failures are
/// recorded in the report and the traversal keeps going.
pub fn delete_tree<P: AsRef<Path>>(path: P, preserve_root: bool) -> Result<DeleteReport> {
    let root = path.as_ref();
    if !root.is_dir() || symlink::is_symlink(root) {
        return Err(FsError::NotADirectory(root.to_path_buf()));
    }

    let mut report = DeleteReport::default();
    // contents_first yields a directory only after all of its children,
    // which is exactly the post-order a recursive delete needs.
    for dirent in WalkDir::new(root).follow_links(false).contents_first(true) {
        let dirent = match dirent {
            Ok(d) => d,
            Err(e) => {
                let p = e.path().unwrap_or(root).to_path_buf();
                tracing::warn!("traversal error under {}: {e}", p.display());
                report.failed.push((p, io::Error::other(e)));
                continue;
            }
        };
        if dirent.depth() == 0 && preserve_root {
            continue;
        }
        let res = if dirent.file_type().is_dir() {
            fs::remove_dir(dirent.path())
        } else {
            // Regular files, symlinks (directory-target ones included on
            // Unix), and special files are all unlinked directly.
            fs::remove_file(dirent.path())
        };
        match res {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::warn!("failed to remove {}: {e}", dirent.path().display());
                report.failed.push((dirent.path().to_path_buf(), e));
            }
        }
    }
    Ok(report)
}

/// Delete every directory child of `path`, leaving file children untouched.
///
/// Symlinked directories are not considered directory children and survive.
pub fn delete_subdirectories<P: AsRef<Path>>(path: P) -> Result<DeleteReport> {
    let root = path.as_ref();
    let mut report = DeleteReport::default();
    for child in entry::list_children(root)? {
        if child.kind != EntryKind::Directory {
            continue;
        }
        match delete_tree(&child.path, false) {
            Ok(sub) => report.absorb(sub),
            Err(e) => {
                tracing::warn!("failed to delete subtree {}: {e}", child.path.display());
                report
                    .failed
                    .push((child.path, io::Error::other(e.to_string())));
            }
        }
    }
    Ok(report)
}

/// Delete the immediate file children of `path`, optionally restricted to
/// an allow-list of extensions. Directory children are untouched.
pub fn delete_files<P: AsRef<Path>>(
    path: P,
    extensions: Option<&[&str]>,
) -> Result<DeleteReport> {
    let root = path.as_ref();
    let mut report = DeleteReport::default();
    for child in entry::list_children(root)? {
        if child.kind == EntryKind::Directory {
            continue;
        }
        if let Some(allowed) = extensions {
            if !extension_matches(&child.path, allowed) {
                continue;
            }
        }
        match file::delete(&child.path) {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::warn!("failed to delete {}: {e}", child.path.display());
                report
                    .failed
                    .push((child.path, io::Error::other(e.to_string())));
            }
        }
    }
    Ok(report)
}

/// Empty `path`: delete its files (optionally filtered by extension), then
/// its subdirectories.
///
/// The two phases are not atomic; a crash in between leaves the files gone
/// and the subdirectories intact.
pub fn empty_directory<P: AsRef<Path>>(
    path: P,
    extensions: Option<&[&str]>,
) -> Result<DeleteReport> {
    let root = path.as_ref();
    let mut report = delete_files(root, extensions)?;
    report.absorb(delete_subdirectories(root)?);
    Ok(report)
}

/// Enumerate the immediate children of `path` (non-recursive), in
/// directory-iteration order.
///
/// The extension filter in [`ListOptions`] is an allow-list. Zero matches
/// is an empty vector, not an error; the error case is `path` not being a
/// directory.
pub fn list_entries<P: AsRef<Path>>(path: P, opts: &ListOptions) -> Result<Vec<PathBuf>> {
    let root = path.as_ref();
    let mut out = Vec::new();
    for child in entry::list_children(root)? {
        if !opts.admits(&child.path) {
            continue;
        }
        out.push(presented(&child.path, opts.full_path));
    }
    Ok(out)
}

/// Enumerate the directory children of `path`. Symlinked directories are
/// excluded.
pub fn list_directories<P: AsRef<Path>>(path: P, full_path: bool) -> Result<Vec<PathBuf>> {
    let root = path.as_ref();
    let mut out = Vec::new();
    for child in entry::list_children(root)? {
        if child.kind == EntryKind::Directory {
            out.push(presented(&child.path, full_path));
        }
    }
    Ok(out)
}

/// True when `path` has at least one child entry.
pub fn has_entries<P: AsRef<Path>>(path: P) -> Result<bool> {
    Ok(!entry::list_children(path)?.is_empty())
}

/// Copy the directory tree at `src` into `dst`, creating `dst` if absent.
///
/// Parents are created before their children (pre-order). Regular files are
/// copied atomically; symlink nodes are re-created as links at the
/// destination and never followed or descended into, so link cycles cannot
/// trap the copy and data outside the tree is never duplicated. Special
/// files are skipped. Permissions and timestamps are preserved best-effort
/// once the structure is in place.
pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<()> {
    let s = src.as_ref();
    let d = dst.as_ref();
    if !s.is_dir() {
        return Err(FsError::NotADirectory(s.to_path_buf()));
    }
    fs::create_dir_all(d)?;

    for dirent in WalkDir::new(s).min_depth(1).follow_links(false) {
        let dirent = dirent.map_err(|e| FsError::Io(io::Error::other(e)))?;
        let rel = dirent
            .path()
            .strip_prefix(s)
            .map_err(|e| FsError::Io(io::Error::other(e)))?;
        let dest = d.join(rel);
        let ft = dirent.file_type();

        if ft.is_dir() {
            fs::create_dir_all(&dest)?;
        } else if ft.is_symlink() {
            let target = fs::read_link(dirent.path())?;
            symlink::create_symlink(&target, &dest)?;
        } else if ft.is_file() {
            path_util::ensure_parent_exists(&dest)?;
            file::copy(dirent.path(), &dest)?;
        } else {
            tracing::debug!("skipping special file {}", dirent.path().display());
        }
    }

    let _ = metadata::preserve_metadata(s, d);
    Ok(())
}

fn presented(p: &Path, full_path: bool) -> PathBuf {
    if full_path {
        p.to_path_buf()
    } else {
        p.file_name().map(PathBuf::from).unwrap_or_else(|| p.to_path_buf())
    }
}
