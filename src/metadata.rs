//! Preservation of file metadata (permissions and timestamps) after copies.
//!
//! For a single file the core attributes are propagated and failures
//! surface to the caller. For a directory tree the pass is best-effort:
//! missing targets and individual failures are skipped so bulk copies stay
//! resilient.

use std::fs::{self, Permissions};
use std::io;
use std::path::{Path, PathBuf};

use filetime::{set_file_times, FileTime};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Copy permission bits from `src` to `dst`. Propagates IO errors.
pub fn copy_permissions(src: &Path, dst: &Path) -> io::Result<()> {
    let perms: Permissions = fs::metadata(src)?.permissions();
    fs::set_permissions(dst, perms)
}

/// Preserve permissions and timestamps from `src` onto `dst`.
///
/// When `src` is a file both attributes are applied and errors propagate.
/// When `src` is a directory the tree is walked and metadata is applied to
/// every corresponding path that already exists under `dst`, skipping
/// anything that fails.
pub fn preserve_metadata(src: &Path, dst: &Path) -> io::Result<()> {
    if !src.exists() || !dst.exists() {
        return Ok(());
    }

    if src.is_file() {
        copy_permissions(src, dst)?;

        let meta = fs::metadata(src)?;
        let m = FileTime::from_system_time(meta.modified()?);
        let a = FileTime::from_system_time(meta.accessed()?);
        set_file_times(dst, a, m)?;
        return Ok(());
    }

    let entries: Vec<PathBuf> = WalkDir::new(src)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .map(|e| e.into_path())
        .collect();

    entries
        .into_par_iter()
        .for_each(|p| apply_to_target(&p, src, dst));

    Ok(())
}

fn apply_to_target(path: &Path, src_root: &Path, dst_root: &Path) {
    let rel = match path.strip_prefix(src_root) {
        Ok(r) => r,
        Err(_) => return,
    };
    let target = dst_root.join(rel);
    if !target.exists() {
        return;
    }

    let _ = copy_permissions(path, &target);

    if let Ok(meta) = fs::metadata(path) {
        if let (Ok(m), Ok(a)) = (meta.modified(), meta.accessed()) {
            let _ = set_file_times(
                &target,
                FileTime::from_system_time(a),
                FileTime::from_system_time(m),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    #[test]
    fn file_permissions_and_times_carry_over() -> io::Result<()> {
        let dir = tempdir()?;
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, b"hello\n")?;
        fs::write(&dst, b"world\n")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&src, fs::Permissions::from_mode(0o640))?;
        }

        let past = SystemTime::now() - Duration::from_secs(24 * 3600);
        let ft = FileTime::from_system_time(past);
        set_file_times(&src, ft, ft)?;

        preserve_metadata(&src, &dst)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode_src = fs::metadata(&src)?.permissions().mode();
            let mode_dst = fs::metadata(&dst)?.permissions().mode();
            assert_eq!(mode_src & 0o777, mode_dst & 0o777);
        }

        let src_m = fs::metadata(&src)?.modified()?;
        let dst_m = fs::metadata(&dst)?.modified()?;
        let diff = dst_m
            .duration_since(src_m)
            .unwrap_or_else(|e| e.duration());
        assert!(diff.as_secs() < 2, "timestamps differ too much");
        Ok(())
    }

    #[test]
    fn tree_pass_skips_missing_targets() -> io::Result<()> {
        let td = tempdir()?;
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(src.join("sub"))?;
        fs::write(src.join("sub/a.txt"), b"a")?;
        fs::create_dir_all(&dst)?;
        // dst has no counterpart for sub/a.txt; the pass must not error.
        preserve_metadata(&src, &dst)?;
        Ok(())
    }
}
