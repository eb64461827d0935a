//! Created temporary files.
//! - `TmpFile` owns the descriptor and the path it was created under.
//! - `unlink_after_create` turns a named file into an anonymous one.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{Result, TmpError};

/// An exclusively created temporary file.
#[derive(Debug)]
pub struct TmpFile {
    file: File,
    path: PathBuf,
    anonymous: bool,
}

impl TmpFile {
    pub(crate) fn new(file: File, path: PathBuf) -> Self {
        Self {
            file,
            path,
            anonymous: false,
        }
    }

    /// Path the file was created under. For anonymous files the entry is gone.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the directory entry was removed after creation.
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }

    pub fn into_parts(self) -> (File, PathBuf) {
        (self.file, self.path)
    }
}

/// Remove the directory entry but keep the descriptor. On failure the
/// descriptor is closed and the creation is not reported as a success.
pub(crate) fn unlink_after_create(tmp: TmpFile) -> Result<TmpFile> {
    match fs::remove_file(&tmp.path) {
        Ok(()) => {
            debug!(path = %tmp.path.display(), "unlinked after create");
            Ok(TmpFile {
                anonymous: true,
                ..tmp
            })
        }
        Err(e) => {
            let (file, path) = tmp.into_parts();
            drop(file);
            warn!(path = %path.display(), error = %e, "unlink after create failed");
            Err(TmpError::cleanup("unlink", &path, e))
        }
    }
}

impl Read for TmpFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for TmpFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for TmpFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
