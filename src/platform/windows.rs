//! Non-Unix implementations of platform helpers (best-effort).
//!
//! Notes:
//! - No POSIX modes; created objects inherit the directory's ACLs.
//! - No host unique-creation primitive; the retry loop is always used.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use super::AccessMode;

pub const DEFAULT_TMPDIR: Option<&str> = None;

// MAX_PATH
pub const PATH_MAX: usize = 260;

pub const HAS_HOST_UNIQUE: bool = false;

/// Existing, non-readonly directory.
pub fn is_writable_dir(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false)
}

pub fn max_name_len(_dir: &Path) -> Option<usize> {
    None
}

pub fn open_exclusive(path: &Path, read_write: bool) -> io::Result<File> {
    OpenOptions::new()
        .read(read_write)
        .write(true)
        .create_new(true)
        .open(path)
}

pub fn create_dir_exclusive(path: &Path) -> io::Result<()> {
    fs::create_dir(path)
}

pub fn host_create_file(_template: &Path) -> io::Result<(File, PathBuf)> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "no host mkstemp"))
}

pub fn host_create_dir(_template: &Path) -> io::Result<PathBuf> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "no host mkdtemp"))
}

/// Access mode is not queryable through std here.
pub fn access_mode(_file: &File) -> io::Result<Option<AccessMode>> {
    Ok(None)
}

/// Open log file for appending (best-effort; no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
