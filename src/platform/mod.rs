//! Platform-specific helpers.
//! This module hides OS differences (Unix/other) behind a uniform API so
//! the allocator can stay platform-agnostic: directory probing, name length
//! limits, exclusive creation, and the host's own unique-creation primitives.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    DEFAULT_TMPDIR, HAS_HOST_UNIQUE, PATH_MAX, access_mode, create_dir_exclusive,
    host_create_dir, host_create_file, is_writable_dir, max_name_len, open_exclusive,
    open_log_file_secure_append,
};

#[cfg(not(unix))]
pub use windows::{
    DEFAULT_TMPDIR, HAS_HOST_UNIQUE, PATH_MAX, access_mode, create_dir_exclusive,
    host_create_dir, host_create_file, is_writable_dir, max_name_len, open_exclusive,
    open_log_file_secure_append,
};

/// Access mode a descriptor was opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    #[inline]
    pub fn can_write(self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }

    #[inline]
    pub fn can_read(self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }
}
