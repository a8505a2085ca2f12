use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced by filesystem and document helpers.
///
/// Every fallible operation in this crate returns `Result<T, FsError>`.
/// Partial failure of best-effort bulk operations is reported through
/// [`DeleteReport`] values instead of the error channel.
#[derive(Error, Debug)]
pub enum FsError {
    /// Wrapper for underlying IO errors (permission denied, disk full,
    /// cross-device rename, and friends).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The target path does not exist where the operation requires it to.
    #[error("path does not exist: {0}")]
    NotFound(PathBuf),

    /// A directory-type precondition was violated.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A file-type precondition was violated.
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    /// A JSON array mutation was requested on a document whose root is not
    /// an array.
    #[error("document root is not an array: {0}")]
    NotAnArrayDocument(PathBuf),

    /// A key/value query was requested on a document whose root is not an
    /// object.
    #[error("document root is not an object: {0}")]
    NotAnObjectDocument(PathBuf),

    /// The document could not be decoded.
    #[error("malformed document `{path}`: {source}")]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// XML construction failed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;

/// Map an IO error to [`FsError::NotFound`] when that is what it means,
/// keeping the path for the message.
pub(crate) fn io_to_fs(e: io::Error, path: &Path) -> FsError {
    if e.kind() == io::ErrorKind::NotFound {
        FsError::NotFound(path.to_path_buf())
    } else {
        FsError::Io(e)
    }
}

/// Outcome of a best-effort bulk removal.
///
/// Bulk operations (multi-file delete, recursive tree delete) continue past
/// individual failures. The caller gets the count of removed nodes plus the
/// paths that could not be removed, each with the error that stopped it,
/// rather than a single collapsed boolean.
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Number of filesystem nodes successfully removed.
    pub deleted: usize,
    /// Nodes that could not be removed.
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl DeleteReport {
    /// True when every sub-operation succeeded.
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }

    pub(crate) fn absorb(&mut self, other: DeleteReport) {
        self.deleted += other.deleted;
        self.failed.extend(other.failed);
    }
}
