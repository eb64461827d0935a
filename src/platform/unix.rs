//! Unix implementations of platform helpers.

use std::ffi::{CString, OsString};
use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use super::AccessMode;

/// The C library's `P_tmpdir`.
#[cfg(target_os = "macos")]
pub const DEFAULT_TMPDIR: Option<&str> = Some("/var/tmp/");
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_TMPDIR: Option<&str> = Some("/tmp");

pub const PATH_MAX: usize = libc::PATH_MAX as usize;

/// `mkstemp(3)` and `mkdtemp(3)` are always present on Unix.
pub const HAS_HOST_UNIQUE: bool = true;

fn c_path(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))
}

/// True when `path` is a directory the calling process may create entries in.
pub fn is_writable_dir(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        _ => return false,
    }
    let Ok(c) = c_path(path) else {
        return false;
    };
    // SAFETY: c is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c.as_ptr(), libc::W_OK) == 0 }
}

/// `pathconf(_PC_NAME_MAX)`; `None` when the limit is unknown or the query fails.
pub fn max_name_len(dir: &Path) -> Option<usize> {
    let c = c_path(dir).ok()?;
    // SAFETY: c is a valid NUL-terminated string for the duration of the call.
    let n = unsafe { libc::pathconf(c.as_ptr(), libc::_PC_NAME_MAX) };
    if n > 0 { usize::try_from(n).ok() } else { None }
}

/// `open(O_CREAT|O_EXCL, 0600)`, write-only or read-write.
pub fn open_exclusive(path: &Path, read_write: bool) -> io::Result<File> {
    OpenOptions::new()
        .read(read_write)
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

/// `mkdir(path, 0700)`; fails with `AlreadyExists` when anything is there.
pub fn create_dir_exclusive(path: &Path) -> io::Result<()> {
    DirBuilder::new().mode(0o700).create(path)
}

fn template_buf(template: &Path) -> io::Result<Vec<u8>> {
    Ok(c_path(template)?.into_bytes_with_nul())
}

fn path_from_buf(mut buf: Vec<u8>) -> PathBuf {
    buf.pop();
    PathBuf::from(OsString::from_vec(buf))
}

/// `mkstemp(3)`: the template's trailing `XXXXXX` are replaced in place.
pub fn host_create_file(template: &Path) -> io::Result<(File, PathBuf)> {
    let mut buf = template_buf(template)?;
    // SAFETY: buf is writable and NUL-terminated; mkstemp only rewrites the
    // placeholder bytes before the terminator.
    let fd = unsafe { libc::mkstemp(buf.as_mut_ptr().cast()) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: fd was just returned by mkstemp and nothing else owns it.
    let file = unsafe { File::from_raw_fd(fd) };
    Ok((file, path_from_buf(buf)))
}

/// `mkdtemp(3)`: creates a 0700 directory from the template.
pub fn host_create_dir(template: &Path) -> io::Result<PathBuf> {
    let mut buf = template_buf(template)?;
    // SAFETY: as for mkstemp; on success the returned pointer aliases buf.
    let ret = unsafe { libc::mkdtemp(buf.as_mut_ptr().cast()) };
    if ret.is_null() {
        return Err(io::Error::last_os_error());
    }
    Ok(path_from_buf(buf))
}

/// Access mode of an open descriptor via `fcntl(F_GETFL)`.
pub fn access_mode(file: &File) -> io::Result<Option<AccessMode>> {
    // SAFETY: the descriptor is owned by `file` and open for the whole call.
    let fl = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_GETFL) };
    if fl < 0 {
        return Err(io::Error::last_os_error());
    }
    let mode = match fl & libc::O_ACCMODE {
        libc::O_RDONLY => AccessMode::ReadOnly,
        libc::O_WRONLY => AccessMode::WriteOnly,
        _ => AccessMode::ReadWrite,
    };
    Ok(Some(mode))
}

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600) // applies on create
        .open(path)?;
    if !existed {
        // Newly created: ensure 0600
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserve_existing_log_file_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, b"hello").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640, "existing permissions should be preserved");
    }

    #[test]
    fn exclusive_open_refuses_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken");
        fs::write(&path, b"x").unwrap();
        let err = open_exclusive(&path, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn exclusive_open_sets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh");
        let _f = open_exclusive(&path, true).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn mkstemp_replaces_placeholders() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("probe.XXXXXX");
        let (_f, path) = host_create_file(&template).unwrap();
        assert_ne!(path, template);
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("probe."));
        assert_eq!(name.len(), "probe.XXXXXX".len());
    }

    #[test]
    fn mkdtemp_creates_owner_only_dir() {
        let dir = tempdir().unwrap();
        let path = host_create_dir(&dir.path().join("d.XXXXXX")).unwrap();
        let meta = fs::metadata(&path).unwrap();
        assert!(meta.is_dir());
        assert_eq!(meta.permissions().mode() & 0o777, 0o700);
    }

    #[test]
    fn access_mode_reports_write_only() {
        let dir = tempdir().unwrap();
        let f = open_exclusive(&dir.path().join("w"), false).unwrap();
        assert_eq!(access_mode(&f).unwrap(), Some(AccessMode::WriteOnly));
    }

    #[test]
    fn name_max_known_for_tempdir() {
        let dir = tempdir().unwrap();
        let n = max_name_len(dir.path());
        assert!(n.is_none_or(|n| n > 0));
    }
}
