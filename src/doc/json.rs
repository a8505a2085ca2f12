//! JSON documents, including the file-as-array store.
//!
//! A JSON file whose root value is an array can be mutated in place with
//! [`push`], [`pop`], and [`shift`], all built on the single
//! decode / transform / re-encode primitive [`mutate`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{io_to_fs, FsError, Result};
use crate::file::{self, WriteOptions};
use crate::path as path_util;

// How much of the file the root-kind heuristic looks at.
const PEEK_LEN: usize = 20;

fn first_structural_byte(path: &Path) -> Result<Option<u8>> {
    // Only the peek window is read from disk; the heuristic must stay cheap
    // no matter how large the document is.
    let f = File::open(path).map_err(|e| io_to_fs(e, path))?;
    let mut buf = [0u8; PEEK_LEN];
    let mut taken = f.take(PEEK_LEN as u64);
    let mut filled = 0;
    loop {
        let n = taken.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(buf[..filled]
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace()))
}

/// True when the document's root value is an array.
///
/// This peeks at the first few bytes and checks for `[`; it is a heuristic,
/// not a parse, and assumes the file starts with the structural character
/// as encoders produce.
pub fn root_is_array<P: AsRef<Path>>(path: P) -> Result<bool> {
    Ok(first_structural_byte(path.as_ref())? == Some(b'['))
}

/// True when the document's root value is an object. Same heuristic as
/// [`root_is_array`].
pub fn root_is_object<P: AsRef<Path>>(path: P) -> Result<bool> {
    Ok(first_structural_byte(path.as_ref())? == Some(b'{'))
}

/// Decode the whole document at `path`.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<Value> {
    let p = path.as_ref();
    let text = file::read_to_string(p)?;
    serde_json::from_str(&text).map_err(|e| FsError::MalformedDocument {
        path: p.to_path_buf(),
        source: e,
    })
}

/// Decode the document at `path`, requiring an array root.
pub fn decode_array<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let p = path.as_ref();
    match decode(p)? {
        Value::Array(items) => Ok(items),
        _ => Err(FsError::NotAnArrayDocument(p.to_path_buf())),
    }
}

/// Apply `transform` to the array stored in the document at `path` and
/// persist the result, returning the bytes written.
///
/// The sequence is: check the root heuristic, decode fresh from disk,
/// transform in memory, re-encode, overwrite the file in place. The file is
/// left untouched when the root is not an array or the decode fails.
///
/// No lock is held across the read-modify-write window: a concurrent writer
/// can race this call and one update will be lost. Single-writer use is
/// assumed; callers needing exclusion must provide it themselves.
pub fn mutate<P, F>(path: P, transform: F) -> Result<u64>
where
    P: AsRef<Path>,
    F: FnOnce(Vec<Value>) -> Vec<Value>,
{
    let p = path.as_ref();
    if !root_is_array(p)? {
        return Err(FsError::NotAnArrayDocument(p.to_path_buf()));
    }
    let items = decode_array(p)?;
    let new_items = transform(items);
    let encoded = encode(p, &Value::Array(new_items))?;
    file::write(p, &encoded, &WriteOptions::default())
}

/// Append `value` to the array document at `path`.
pub fn push<P: AsRef<Path>, T: Serialize>(path: P, value: T) -> Result<u64> {
    let p = path.as_ref();
    let v = serde_json::to_value(value).map_err(|e| FsError::MalformedDocument {
        path: p.to_path_buf(),
        source: e,
    })?;
    mutate(p, move |mut items| {
        items.push(v);
        items
    })
}

/// Remove the last element of the array document at `path`. Popping an
/// empty array is a no-op rewrite.
pub fn pop<P: AsRef<Path>>(path: P) -> Result<u64> {
    mutate(path, |mut items| {
        items.pop();
        items
    })
}

/// Remove the first element of the array document at `path`. Shifting an
/// empty array is a no-op rewrite.
pub fn shift<P: AsRef<Path>>(path: P) -> Result<u64> {
    mutate(path, |mut items| {
        if !items.is_empty() {
            items.remove(0);
        }
        items
    })
}

/// Keys of the object document at `path`, in key order.
pub fn keys<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let p = path.as_ref();
    match decode(p)? {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        _ => Err(FsError::NotAnObjectDocument(p.to_path_buf())),
    }
}

/// Values of the object document at `path`, in key order.
pub fn values<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let p = path.as_ref();
    match decode(p)? {
        Value::Object(map) => Ok(map.into_iter().map(|(_, v)| v).collect()),
        _ => Err(FsError::NotAnObjectDocument(p.to_path_buf())),
    }
}

/// Encode `data` and write it to `path`, appending a `.json` extension when
/// the path doesn't already carry one. Returns the bytes written.
pub fn create<P: AsRef<Path>, T: Serialize>(path: P, data: &T) -> Result<u64> {
    create_with(path, data, serde_json::to_vec)
}

/// Like [`create`] but pretty-printed.
pub fn create_pretty<P: AsRef<Path>, T: Serialize>(path: P, data: &T) -> Result<u64> {
    create_with(path, data, serde_json::to_vec_pretty)
}

fn create_with<P, T, E>(path: P, data: &T, encoder: E) -> Result<u64>
where
    P: AsRef<Path>,
    T: Serialize,
    E: Fn(&T) -> serde_json::Result<Vec<u8>>,
{
    let p = ensure_json_extension(path.as_ref());
    let encoded = encoder(data).map_err(|e| FsError::MalformedDocument {
        path: p.clone(),
        source: e,
    })?;
    file::write(&p, &encoded, &WriteOptions::default())
}

/// Decode each input file as an array and write the collected
/// sequence-of-sequences to `result_path`. When no result path is given the
/// output name is derived from the current UNIX timestamp (with a `.json`
/// extension) and lands in the process working directory. Returns the bytes
/// written.
pub fn combine<P: AsRef<Path>>(paths: &[P], result_path: Option<&Path>) -> Result<u64> {
    let mut collected: Vec<Value> = Vec::with_capacity(paths.len());
    for p in paths {
        collected.push(Value::Array(decode_array(p)?));
    }
    let out = match result_path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(chrono::Utc::now().timestamp().to_string()),
    };
    create(&out, &collected)
}

fn ensure_json_extension(p: &Path) -> PathBuf {
    if path_util::extension(p).as_deref() == Some("json") {
        p.to_path_buf()
    } else {
        let mut s = p.as_os_str().to_os_string();
        s.push(".json");
        PathBuf::from(s)
    }
}

fn encode(path: &Path, value: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| FsError::MalformedDocument {
        path: path.to_path_buf(),
        source: e,
    })
}
