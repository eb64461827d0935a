//! Unique-creation strategies.
//! - `HostPrimitive`: the C library's mkstemp/mkdtemp do naming and retrying.
//! - `RetryLoop`: our NameGenerator plus O_EXCL open / mkdir, retried on EEXIST.
//!
//! Both honor the same contract: success is only reported for an object the
//! OS created exclusively for this call. The name-only reservation is the one
//! exception and is documented as racy.

use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, trace};

use super::flags::ModeFlags;
use super::names::NameGenerator;
use crate::config::StrategyChoice;
use crate::errors::{Result, TmpError};
use crate::platform;

/// Everything a strategy needs for one allocation.
#[derive(Debug, Clone)]
pub struct Request {
    pub directory: PathBuf,
    pub root: String,
    /// Caller template, present only when `USE_CALLER_TEMPLATE` survived normalization.
    pub template: Option<String>,
    pub flags: ModeFlags,
    pub name_max: Option<usize>,
}

impl Request {
    fn read_write(&self) -> bool {
        self.flags.contains(ModeFlags::READ_WRITE)
    }

    /// `dir/root.XXXXXX`, or the caller template verbatim.
    fn placeholder_template(&self) -> String {
        match &self.template {
            Some(t) => t.clone(),
            None => format!("{}/{}.XXXXXX", self.directory.display(), self.root),
        }
    }
}

pub trait UniqueCreationStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Pick a name that did not exist at probe time. Creates nothing.
    fn reserve_name(&self, req: &Request, names: &Mutex<NameGenerator>) -> Result<PathBuf>;

    /// Exclusively create a regular file with owner-only permissions.
    fn create_file(&self, req: &Request, names: &Mutex<NameGenerator>) -> Result<(File, PathBuf)>;

    /// Exclusively create an owner-only directory.
    fn create_dir(&self, req: &Request, names: &Mutex<NameGenerator>) -> Result<PathBuf>;
}

/// Pick the strategy once, at allocator construction.
pub fn select(choice: StrategyChoice) -> Box<dyn UniqueCreationStrategy> {
    let host = match choice {
        StrategyChoice::Auto => platform::HAS_HOST_UNIQUE,
        StrategyChoice::Host if !platform::HAS_HOST_UNIQUE => {
            debug!("host unique-creation primitive unavailable; using retry loop");
            false
        }
        StrategyChoice::Host => true,
        StrategyChoice::Retry => false,
    };
    if host {
        Box::new(HostPrimitive)
    } else {
        Box::new(RetryLoop)
    }
}

fn lock(names: &Mutex<NameGenerator>) -> std::sync::MutexGuard<'_, NameGenerator> {
    names.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Non-atomic existence probe: `Ok(true)` when nothing is at `path`.
fn is_free(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(TmpError::exhausted("probe name", path, e)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HostPrimitive;

impl UniqueCreationStrategy for HostPrimitive {
    fn name(&self) -> &'static str {
        "host"
    }

    fn reserve_name(&self, req: &Request, names: &Mutex<NameGenerator>) -> Result<PathBuf> {
        let template = req.placeholder_template();
        loop {
            let filled = lock(names)
                .fill_placeholders(&template)
                .map_err(|e| TmpError::exhausted("fill template", Path::new(&template), e))?;
            let path = PathBuf::from(filled);
            if is_free(&path)? {
                return Ok(path);
            }
            trace!(path = %path.display(), "reserved name exists; retrying");
        }
    }

    fn create_file(&self, req: &Request, _names: &Mutex<NameGenerator>) -> Result<(File, PathBuf)> {
        let template = PathBuf::from(req.placeholder_template());
        platform::host_create_file(&template).map_err(|e| TmpError::exhausted("mkstemp", &template, e))
    }

    fn create_dir(&self, req: &Request, _names: &Mutex<NameGenerator>) -> Result<PathBuf> {
        let template = PathBuf::from(req.placeholder_template());
        platform::host_create_dir(&template).map_err(|e| TmpError::exhausted("mkdtemp", &template, e))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RetryLoop;

impl RetryLoop {
    /// Run `attempt` on fresh candidates until it stops reporting a collision.
    /// A literal template gets exactly one attempt.
    fn drive<T>(
        req: &Request,
        names: &Mutex<NameGenerator>,
        op: &'static str,
        mut attempt: impl FnMut(&Path) -> io::Result<T>,
    ) -> Result<(T, PathBuf)> {
        if let Some(t) = &req.template {
            let path = PathBuf::from(t);
            return match attempt(&path) {
                Ok(v) => Ok((v, path)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(TmpError::NameCollision(path)),
                Err(e) => Err(TmpError::exhausted(op, &path, e)),
            };
        }
        loop {
            let candidate = lock(names)
                .next(&req.directory, &req.root, req.flags, req.name_max)
                .map_err(|e| TmpError::exhausted("generate name", &req.directory, e))?;
            match attempt(&candidate.path) {
                Ok(v) => return Ok((v, candidate.path)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %candidate.path.display(), "name collision; retrying");
                }
                Err(e) => return Err(TmpError::exhausted(op, &candidate.path, e)),
            }
        }
    }
}

impl UniqueCreationStrategy for RetryLoop {
    fn name(&self) -> &'static str {
        "retry"
    }

    fn reserve_name(&self, req: &Request, names: &Mutex<NameGenerator>) -> Result<PathBuf> {
        if let Some(t) = &req.template {
            let path = PathBuf::from(t);
            return if is_free(&path)? {
                Ok(path)
            } else {
                Err(TmpError::NameCollision(path))
            };
        }
        loop {
            let candidate = lock(names)
                .next(&req.directory, &req.root, req.flags, req.name_max)
                .map_err(|e| TmpError::exhausted("generate name", &req.directory, e))?;
            if is_free(&candidate.path)? {
                return Ok(candidate.path);
            }
            trace!(path = %candidate.path.display(), "name exists; retrying");
        }
    }

    fn create_file(&self, req: &Request, names: &Mutex<NameGenerator>) -> Result<(File, PathBuf)> {
        let rw = req.read_write();
        Self::drive(req, names, "create file", |p| platform::open_exclusive(p, rw))
    }

    fn create_dir(&self, req: &Request, names: &Mutex<NameGenerator>) -> Result<PathBuf> {
        Self::drive(req, names, "create directory", platform::create_dir_exclusive).map(|((), p)| p)
    }
}
