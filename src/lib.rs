//! Filesystem, directory-tree, and structured-document helpers.
//!
//! The crate is organized as three layers:
//!
//! - a leaf layer answering questions about single paths and performing
//!   single-file operations ([`stat`], [`entry`], [`file`], [`path`],
//!   [`symlink`], [`disk`]);
//! - a tree operator building recursive whole-subtree operations purely from
//!   the leaf layer ([`tree`]);
//! - structured-document utilities treating whole files as decoded values,
//!   including a JSON file whose root is mutated as a persistent array
//!   ([`doc`]).
//!
//! Every operation is synchronous and blocking. Apart from [`file::replace`]
//! and the internal single-file copy, writes happen in place and carry no
//! durability guarantee. See [`doc::json::mutate`] for the documented
//! read-modify-write hazard of the document store.

pub mod doc;
pub mod entry;
pub mod error;
pub mod file;
pub mod metadata;
pub mod path;
pub mod stat;
pub mod symlink;
pub mod tree;

#[cfg(unix)]
pub mod disk;

pub use crate::entry::{Entry, EntryKind};
pub use crate::error::{DeleteReport, FsError, Result};
pub use crate::stat::PathType;
pub use crate::tree::ListOptions;
