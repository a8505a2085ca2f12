//! Leaf single-file operations.
//!
//! Everything here touches exactly one filesystem node per call. The only
//! operations with a durability guarantee stronger than "write in place"
//! are [`replace`] and [`copy`], which stage into a sibling temp file and
//! rename into position so other processes never observe a half-written
//! file. Plain [`write`] can leave a truncated file if the process dies
//! mid-call.

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{io_to_fs, DeleteReport, FsError, Result};
use crate::metadata;
use crate::symlink;

/// Options controlling [`write`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteOptions {
    /// Append to the file instead of truncating it.
    pub append: bool,
    /// Take an OS exclusive lock on the file for the duration of the write.
    /// Only cooperating processes that also lock are excluded.
    pub lock: bool,
}

/// Read the entire contents of `path`.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let p = path.as_ref();
    fs::read(p).map_err(|e| io_to_fs(e, p))
}

/// Read the entire contents of `path` as UTF-8 text.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let p = path.as_ref();
    fs::read_to_string(p).map_err(|e| io_to_fs(e, p))
}

/// Write `data` to `path`, returning the number of bytes written.
///
/// This is a direct in-place write with no durability guarantee; use
/// [`replace`] when other observers must never see a partial file.
pub fn write<P: AsRef<Path>>(path: P, data: &[u8], opts: &WriteOptions) -> Result<u64> {
    let p = path.as_ref();
    let mut options = fs::OpenOptions::new();
    options.create(true);
    if opts.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    let mut f = options.open(p)?;
    if opts.lock {
        // Released when the handle closes at the end of this call.
        f.lock()?;
    }
    f.write_all(data)?;
    f.flush()?;
    Ok(data.len() as u64)
}

/// Append `data` to `path`, creating the file when absent.
pub fn append<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<u64> {
    write(
        path,
        data,
        &WriteOptions {
            append: true,
            lock: false,
        },
    )
}

/// Truncate `path` to zero length, creating it when absent.
pub fn clear<P: AsRef<Path>>(path: P) -> Result<()> {
    write(path, &[], &WriteOptions::default()).map(|_| ())
}

/// Replace the contents of `path` atomically.
///
/// The data is written to a temp file in the target's directory and renamed
/// into place, so concurrent readers observe either the old or the new
/// contents, never a mix. The temp file is removed on every failure path.
pub fn replace<P: AsRef<Path>>(path: P, data: &[u8]) -> Result<()> {
    let target = path.as_ref();
    let dir = match target.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(d) => d,
        None => {
            // No usable parent; a plain write is all we can do.
            fs::write(target, data)?;
            return Ok(());
        }
    };
    fs::create_dir_all(dir)?;
    let tmp = temp_sibling(dir, "tmp_replace");
    if let Err(e) = fs::write(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, target) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Copy the regular file at `src` to `dst`, returning the bytes copied.
///
/// The copy is staged into a sibling temp file and renamed into place.
/// Permissions and timestamps are carried over best-effort afterwards.
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<u64> {
    let s = src.as_ref();
    let d = dst.as_ref();
    if !s.is_file() {
        return Err(if s.exists() {
            FsError::NotAFile(s.to_path_buf())
        } else {
            FsError::NotFound(s.to_path_buf())
        });
    }

    let mut options = fs_extra::file::CopyOptions::new();
    options.overwrite = false;
    // 64 KiB buffer balances throughput and memory for single-file copies.
    options.buffer_size = 64 * 1024;

    let dir = match d.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir,
        None => {
            let n = fs_extra::file::copy(s, d, &options)
                .map_err(|e| FsError::Io(io::Error::other(e)))?;
            let _ = metadata::preserve_metadata(s, d);
            return Ok(n);
        }
    };
    fs::create_dir_all(dir)?;
    let tmp = temp_sibling(dir, "tmp_copy");
    match fs_extra::file::copy(s, &tmp, &options) {
        Ok(n) => match fs::rename(&tmp, d) {
            Ok(()) => {
                let _ = metadata::preserve_metadata(s, d);
                Ok(n)
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(e.into())
            }
        },
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(FsError::Io(io::Error::other(e)))
        }
    }
}

/// Delete the file or symlink at `path`.
///
/// Deleting a non-existent path is a no-op success so callers can attempt
/// removal without probing first. Symlinks are unlinked without touching
/// their target. Directories are refused; use the tree operations for
/// those.
pub fn delete<P: AsRef<Path>>(path: P) -> Result<()> {
    let p = path.as_ref();
    let meta = match fs::symlink_metadata(p) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
        Ok(m) => m,
    };
    let ft = meta.file_type();
    if ft.is_symlink() {
        symlink::remove_symlink(p)?;
    } else if ft.is_dir() {
        return Err(FsError::NotAFile(p.to_path_buf()));
    } else {
        fs::remove_file(p)?;
    }
    Ok(())
}

/// Delete many files, best-effort.
///
/// Failures do not stop the pass; each failed path is collected into the
/// report together with the error that stopped it.
pub fn delete_many<P: AsRef<Path>>(paths: &[P]) -> DeleteReport {
    let mut report = DeleteReport::default();
    for path in paths {
        let p = path.as_ref();
        match delete(p) {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::warn!("failed to delete {}: {e}", p.display());
                report
                    .failed
                    .push((p.to_path_buf(), io::Error::other(e.to_string())));
            }
        }
    }
    report
}

/// Rename `old` to `new` with the bare rename syscall.
///
/// There is deliberately no copy+delete fallback; a cross-device rename
/// surfaces the OS error unchanged so the caller can decide what to do.
pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(old: P, new: Q) -> Result<()> {
    fs::rename(old.as_ref(), new.as_ref()).map_err(|e| io_to_fs(e, old.as_ref()))?;
    Ok(())
}

/// Size of the file at `path` in bytes.
pub fn size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let p = path.as_ref();
    Ok(fs::metadata(p).map_err(|e| io_to_fs(e, p))?.len())
}

/// Last-modified time of `path`.
pub fn last_modified<P: AsRef<Path>>(path: P) -> Result<SystemTime> {
    let p = path.as_ref();
    Ok(fs::metadata(p)
        .map_err(|e| io_to_fs(e, p))?
        .modified()?)
}

// Unique-enough sibling name for staging writes: pid + clock + sequence
// counter keeps concurrent callers in the same directory apart.
fn temp_sibling(dir: &Path, prefix: &str) -> PathBuf {
    static NEXT_ID: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(".{prefix}.{pid:x}{nanos:x}{seq:x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_roundtrip() {
        let td = tempdir().unwrap();
        let f = td.path().join("f.txt");
        let n = write(&f, b"hello", &WriteOptions::default()).unwrap();
        assert_eq!(n, 5);
        assert_eq!(read(&f).unwrap(), b"hello");
    }

    #[test]
    fn append_extends_existing_content() {
        let td = tempdir().unwrap();
        let f = td.path().join("log.txt");
        write(&f, b"one\n", &WriteOptions::default()).unwrap();
        append(&f, b"two\n").unwrap();
        assert_eq!(read_to_string(&f).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn clear_truncates() {
        let td = tempdir().unwrap();
        let f = td.path().join("f.txt");
        write(&f, b"data", &WriteOptions::default()).unwrap();
        clear(&f).unwrap();
        assert_eq!(size(&f).unwrap(), 0);
    }

    #[test]
    fn locked_write_succeeds() {
        let td = tempdir().unwrap();
        let f = td.path().join("locked.txt");
        let opts = WriteOptions {
            append: false,
            lock: true,
        };
        write(&f, b"guarded", &opts).unwrap();
        assert_eq!(read(&f).unwrap(), b"guarded");
    }

    #[test]
    fn read_missing_is_not_found() {
        let td = tempdir().unwrap();
        let err = read(td.path().join("ghost")).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[test]
    fn replace_leaves_no_temp_files() {
        let td = tempdir().unwrap();
        let f = td.path().join("doc.txt");
        write(&f, b"old", &WriteOptions::default()).unwrap();
        replace(&f, b"new").unwrap();
        assert_eq!(read(&f).unwrap(), b"new");

        for e in fs::read_dir(td.path()).unwrap() {
            let name = e.unwrap().file_name().to_string_lossy().into_owned();
            assert!(!name.starts_with(".tmp_replace."), "leftover temp: {name}");
        }
    }

    #[test]
    fn delete_is_idempotent() {
        let td = tempdir().unwrap();
        let f = td.path().join("f.txt");
        write(&f, b"x", &WriteOptions::default()).unwrap();
        delete(&f).unwrap();
        assert!(!f.exists());
        // Second delete of the same path must not escalate.
        delete(&f).unwrap();
        delete(&f).unwrap();
    }

    #[test]
    fn delete_refuses_directories() {
        let td = tempdir().unwrap();
        let d = td.path().join("sub");
        fs::create_dir(&d).unwrap();
        assert!(matches!(delete(&d).unwrap_err(), FsError::NotAFile(p) if p == d));
        assert!(d.exists());
    }

    #[test]
    fn delete_many_reports_failures() {
        let td = tempdir().unwrap();
        let ok = td.path().join("ok.txt");
        let dir = td.path().join("dir");
        write(&ok, b"x", &WriteOptions::default()).unwrap();
        fs::create_dir(&dir).unwrap();

        let report = delete_many(&[ok.clone(), dir.clone()]);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.all_ok());
        assert_eq!(report.failed[0].0, dir);
        assert!(!ok.exists());
    }

    #[test]
    fn copy_carries_content() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dst = td.path().join("nested/b.txt");
        write(&src, b"payload", &WriteOptions::default()).unwrap();
        let n = copy(&src, &dst).unwrap();
        assert_eq!(n, 7);
        assert_eq!(read(&dst).unwrap(), b"payload");
    }

    #[test]
    fn copy_of_directory_is_refused() {
        let td = tempdir().unwrap();
        let d = td.path().join("sub");
        fs::create_dir(&d).unwrap();
        assert!(matches!(
            copy(&d, td.path().join("out")).unwrap_err(),
            FsError::NotAFile(_)
        ));
    }

    #[test]
    fn rename_moves_within_device() {
        let td = tempdir().unwrap();
        let a = td.path().join("a.txt");
        let b = td.path().join("b.txt");
        write(&a, b"x", &WriteOptions::default()).unwrap();
        rename(&a, &b).unwrap();
        assert!(!a.exists());
        assert!(b.exists());
    }

    #[test]
    fn rename_missing_source_is_not_found() {
        let td = tempdir().unwrap();
        let err = rename(td.path().join("nope"), td.path().join("dst")).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }
}
