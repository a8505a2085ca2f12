//! Structured-document utilities built on the leaf file layer.
//!
//! Each submodule follows the same whole-file pattern: read everything,
//! decode, operate in memory, re-encode, write everything. None of them
//! stream, and none hold a lock across a read-modify-write window.

pub mod csv;
pub mod json;
pub mod xml;
