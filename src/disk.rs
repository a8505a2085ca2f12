//! Disk space queries for the filesystem holding a given path.

use std::io;
use std::path::Path;

use nix::sys::statvfs::statvfs;

use crate::error::Result;

/// Bytes available to unprivileged callers on the filesystem of `path`.
pub fn space_available<P: AsRef<Path>>(path: P) -> Result<u64> {
    let st = statvfs(path.as_ref()).map_err(to_io)?;
    Ok(st.blocks_available() as u64 * st.fragment_size() as u64)
}

/// Total size in bytes of the filesystem of `path`.
pub fn space_total<P: AsRef<Path>>(path: P) -> Result<u64> {
    let st = statvfs(path.as_ref()).map_err(to_io)?;
    Ok(st.blocks() as u64 * st.fragment_size() as u64)
}

fn to_io(e: nix::errno::Errno) -> io::Error {
    io::Error::from_raw_os_error(e as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn total_space_is_positive_and_bounds_available() {
        let td = tempdir().unwrap();
        let total = space_total(td.path()).unwrap();
        let available = space_available(td.path()).unwrap();
        assert!(total > 0);
        assert!(available <= total);
    }

    #[test]
    fn missing_path_errors() {
        let td = tempdir().unwrap();
        assert!(space_total(td.path().join("ghost")).is_err());
    }
}
