//! I/O error description helpers.
//!
//! Turns a raw `io::Error` from a probe/create/unlink into a message that names
//! the operation, the path, and a short hint for the errno values that matter
//! when allocating temporary objects. The underlying error is never replaced;
//! these strings only feed `Display`.
//!
//! Usage:
//!   let msg = describe_io("create file", path, &err);

use std::io;
use std::path::Path;

/// Hint for the errno values commonly hit while creating temp objects.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check that the temp directory is writable",
        libc::ENOENT => "directory not found; verify the temp directory exists",
        libc::EEXIST => "already exists; a template without placeholders cannot be retried",
        libc::ENOSPC => "insufficient space on device",
        libc::EDQUOT => "disk quota exceeded",
        libc::EROFS => "read-only filesystem; choose another temp directory",
        libc::ELOOP => "too many symbolic link levels (ELOOP); possible symlink cycle",
        libc::ENAMETOOLONG => "filename or path too long; shorten the name root",
        libc::EMFILE => "process file descriptor limit reached; close files or raise limits",
        libc::ENFILE => "system-wide file table overflow; reduce open files",
        libc::EINVAL => "invalid argument; templates must end in at least six 'X' characters",
        _ => return None,
    };
    Some(hint)
}

#[cfg(not(unix))]
fn os_hint(code: i32) -> Option<&'static str> {
    // Common Win32 errors
    let hint = match code {
        5 => "access denied; check permissions",            // ERROR_ACCESS_DENIED
        2 | 3 => "path not found; verify it exists",         // FILE/ PATH NOT FOUND
        80 | 183 => "already exists",                        // ERROR_FILE_EXISTS / ERROR_ALREADY_EXISTS
        112 => "insufficient disk space",                    // ERROR_DISK_FULL
        206 => "filename or path too long",                  // ERROR_FILENAME_EXCED_RANGE
        4 => "too many open files; close handles",           // ERROR_TOO_MANY_OPEN_FILES
        _ => return None,
    };
    Some(hint)
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check directory permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        io::ErrorKind::InvalidInput => Some("invalid input"),
        _ => None,
    }
}

/// Format "<op> '<path>': <error> - <hint> [os code: N]".
pub fn describe_io(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    match e.raw_os_error() {
        Some(code) => {
            if let Some(hint) = os_hint(code) {
                msg.push_str(" - ");
                msg.push_str(hint);
            }
            msg.push_str(&format!(" [os code: {}]", code));
        }
        None => {
            if let Some(hint) = kind_hint(e.kind()) {
                msg.push_str(" - ");
                msg.push_str(hint);
            }
        }
    }

    msg
}
