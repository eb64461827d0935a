//! Buffered stream over a created temporary file.

use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::file::TmpFile;
use super::flags::ModeFlags;
use crate::errors::{Result, TmpError};
use crate::platform::{self, AccessMode};

/// Buffered handle; write-only unless built with `READ_WRITE`.
#[derive(Debug)]
pub struct TmpStream {
    inner: BufWriter<File>,
    path: PathBuf,
    anonymous: bool,
    readable: bool,
}

/// Wrap a created file in a stream. If the descriptor cannot back the requested
/// mode it is closed before the error is returned.
pub fn wrap(tmp: TmpFile, flags: ModeFlags) -> Result<TmpStream> {
    let readable = flags.contains(ModeFlags::READ_WRITE);
    let anonymous = tmp.is_anonymous();
    let (file, path) = tmp.into_parts();

    let checked = platform::access_mode(&file).and_then(|mode| match mode {
        Some(m) if !m.can_write() || (readable && !m.can_read()) => Err(mode_mismatch(m, readable)),
        _ => Ok(()),
    });
    if let Err(e) = checked {
        drop(file);
        return Err(TmpError::cleanup("open stream", &path, e));
    }

    Ok(TmpStream {
        inner: BufWriter::new(file),
        path,
        anonymous,
        readable,
    })
}

fn mode_mismatch(have: AccessMode, want_read: bool) -> io::Error {
    let want = if want_read { "read-write" } else { "write" };
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("descriptor opened {have:?} cannot back a {want} stream"),
    )
}

impl TmpStream {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Flush and hand back the file.
    pub fn into_file(self) -> io::Result<File> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

impl Write for TmpStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Read for TmpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.readable {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "stream is write-only"));
        }
        self.inner.flush()?;
        self.inner.get_mut().read(buf)
    }
}

impl Seek for TmpStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
