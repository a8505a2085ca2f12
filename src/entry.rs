use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{io_to_fs, FsError, Result};
use crate::stat;

/// Kind of one observed filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// The node itself is a symbolic link; the target is not inspected.
    Symlink,
    /// Socket, FIFO, device node, and similar.
    Other,
}

/// One named node in a directory listing.
///
/// An `Entry` is a snapshot: kind and permission flags are resolved at the
/// moment of observation and never cached, so a fresh `Entry` must be taken
/// whenever current state matters.
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub readable: bool,
    pub writable: bool,
}

impl Entry {
    /// Observe the node at `path` now.
    ///
    /// Fails with [`FsError::NotFound`] when the path does not exist.
    pub fn observe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let meta = fs::symlink_metadata(p).map_err(|e| io_to_fs(e, p))?;
        let ft = meta.file_type();
        let kind = if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        Ok(Entry {
            kind,
            readable: stat::is_readable(p),
            writable: stat::is_writable(p),
            path: p.to_path_buf(),
        })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Final component of the entry's path.
    pub fn file_name(&self) -> Option<&OsStr> {
        self.path.file_name()
    }
}

/// List the immediate children of `dir` in directory-iteration order.
///
/// The `.` and `..` pseudo-entries are never produced. A child removed by
/// someone else between the directory read and its stat is skipped, not an
/// error. Fails with [`FsError::NotADirectory`] when `dir` is not a
/// directory.
pub fn list_children<P: AsRef<Path>>(dir: P) -> Result<Vec<Entry>> {
    let d = dir.as_ref();
    if !d.is_dir() {
        return Err(FsError::NotADirectory(d.to_path_buf()));
    }
    let mut out = Vec::new();
    for ent in fs::read_dir(d)? {
        let ent = ent?;
        if let Some(e) = observe_existing(&ent.path())? {
            out.push(e);
        }
    }
    Ok(out)
}

// A listing wants the current children; one that disappeared under us is
// simply no longer a child.
fn observe_existing(path: &Path) -> Result<Option<Entry>> {
    match Entry::observe(path) {
        Ok(e) => Ok(Some(e)),
        Err(FsError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn observe_resolves_kind() {
        let tmp = tempdir().unwrap();
        let f = tmp.path().join("a.txt");
        fs::write(&f, b"x").unwrap();
        let e = Entry::observe(&f).unwrap();
        assert_eq!(e.kind, EntryKind::File);
        assert!(e.is_file());
        assert!(e.readable);

        let d = tmp.path().join("sub");
        fs::create_dir(&d).unwrap();
        assert!(Entry::observe(&d).unwrap().is_dir());
    }

    #[test]
    fn observe_missing_is_not_found() {
        let tmp = tempdir().unwrap();
        let err = Entry::observe(tmp.path().join("ghost")).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[test]
    fn list_children_excludes_pseudo_entries() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), b"a").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let children = list_children(tmp.path()).unwrap();
        assert_eq!(children.len(), 2);
        for c in &children {
            let name = c.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name != "." && name != "..");
        }
    }

    #[test]
    fn vanished_child_is_skipped_not_an_error() {
        let tmp = tempdir().unwrap();
        let gone = tmp.path().join("gone.txt");
        // The path no longer exists by the time it is observed; the listing
        // must treat that as "no such child" rather than failing.
        assert!(observe_existing(&gone).unwrap().is_none());

        let present = tmp.path().join("here.txt");
        fs::write(&present, b"x").unwrap();
        assert!(observe_existing(&present).unwrap().is_some());
    }

    #[test]
    fn list_children_on_file_is_error() {
        let tmp = tempdir().unwrap();
        let f = tmp.path().join("plain.txt");
        fs::write(&f, b"x").unwrap();
        assert!(matches!(
            list_children(&f).unwrap_err(),
            FsError::NotADirectory(p) if p == f
        ));
    }
}
