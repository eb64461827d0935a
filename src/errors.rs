//! Typed error definitions for tmpalloc.
//! Every failure that reaches a caller carries the underlying OS error so the
//! errno can be inspected; the two "recoverable" kinds are handled inside the
//! allocator and only surface in the narrow cases documented on each variant.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tmp_ops::helpers::describe_io;

#[derive(Debug, Error)]
pub enum TmpError {
    /// Override directory was rejected. Recovered by falling back to the
    /// system directory; never returned from the public operations.
    #[error("override directory '{}' rejected: {reason}", path.display())]
    ConfigurationInvalid { path: PathBuf, reason: &'static str },

    /// Candidate name already exists. Retried internally; only surfaced when a
    /// literal caller template leaves nothing to retry with.
    #[error("temporary name already taken: {}", .0.display())]
    NameCollision(PathBuf),

    /// Fatal OS failure while probing or creating (disk full, permission
    /// denied, descriptor table full, ...).
    #[error("{}", describe_io(.op, .path, .source))]
    ResourceExhausted {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The object was created but a follow-up step (unlink, stream setup)
    /// failed. The descriptor has already been closed.
    #[error("{} after creating temporary object", describe_io(.op, .path, .source))]
    CleanupFailure {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TmpError {
    pub(crate) fn exhausted(op: &'static str, path: &Path, source: io::Error) -> Self {
        TmpError::ResourceExhausted {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn cleanup(op: &'static str, path: &Path, source: io::Error) -> Self {
        TmpError::CleanupFailure {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Preserved errno of the underlying failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            TmpError::ResourceExhausted { source, .. } | TmpError::CleanupFailure { source, .. } => {
                source.raw_os_error()
            }
            #[cfg(unix)]
            TmpError::NameCollision(_) => Some(libc::EEXIST),
            _ => None,
        }
    }

    /// `io::ErrorKind` view of the failure.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            TmpError::ResourceExhausted { source, .. } | TmpError::CleanupFailure { source, .. } => {
                source.kind()
            }
            TmpError::NameCollision(_) => io::ErrorKind::AlreadyExists,
            TmpError::ConfigurationInvalid { .. } => io::ErrorKind::InvalidInput,
        }
    }
}

impl From<TmpError> for io::Error {
    fn from(e: TmpError) -> Self {
        let kind = e.kind();
        match e {
            TmpError::ResourceExhausted { source, .. } | TmpError::CleanupFailure { source, .. } => {
                source
            }
            other => io::Error::new(kind, other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TmpError>;
