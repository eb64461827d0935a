//! Temp directory resolution.
//! - Optional override directory from an environment-style lookup.
//! - System directory probed once, in fixed order, then cached.
//! - Name length limit of the first resolved directory, cached likewise.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use super::flags::ModeFlags;
use crate::errors::TmpError;
use crate::platform;

/// Final fallback when no system candidate qualifies.
pub const FALLBACK_TMPDIR: &str = ".";

/// Environment-style key lookup used for the override directory.
pub trait EnvLookup: Send + Sync {
    fn lookup(&self, key: &str) -> Option<OsString>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<OsString> + Send + Sync,
{
    fn lookup(&self, key: &str) -> Option<OsString> {
        self(key)
    }
}

/// Directory chosen for one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirectory {
    pub path: PathBuf,
    /// Maximum basename length, when the platform could report one.
    pub name_max: Option<usize>,
}

/// System candidates in probe order: `P_tmpdir`, then the classic locations.
pub fn default_system_dirs() -> Vec<PathBuf> {
    platform::DEFAULT_TMPDIR
        .into_iter()
        .chain(["/tmp", "/var/tmp", "/usr/tmp"])
        .map(PathBuf::from)
        .collect()
}

pub struct DirectoryResolver {
    env: Box<dyn EnvLookup>,
    override_var: String,
    candidates: Vec<PathBuf>,
    system_dir: OnceLock<PathBuf>,
    name_max: OnceLock<Option<usize>>,
}

impl std::fmt::Debug for DirectoryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryResolver")
            .field("override_var", &self.override_var)
            .field("candidates", &self.candidates)
            .field("system_dir", &self.system_dir.get())
            .field("name_max", &self.name_max.get())
            .finish_non_exhaustive()
    }
}

impl DirectoryResolver {
    pub fn new(env: Box<dyn EnvLookup>, override_var: impl Into<String>, candidates: Vec<PathBuf>) -> Self {
        Self {
            env,
            override_var: override_var.into(),
            candidates,
            system_dir: OnceLock::new(),
            name_max: OnceLock::new(),
        }
    }

    /// Pick the directory for one allocation.
    pub fn resolve(&self, flags: ModeFlags) -> ResolvedDirectory {
        let path = if flags.contains(ModeFlags::USE_OVERRIDE_DIR) {
            match self.override_dir() {
                Ok(Some(dir)) => dir,
                Ok(None) => self.system_dir().to_path_buf(),
                Err(e) => {
                    debug!(error = %e, "ignoring override directory");
                    self.system_dir().to_path_buf()
                }
            }
        } else {
            self.system_dir().to_path_buf()
        };
        let name_max = *self.name_max.get_or_init(|| {
            let n = platform::max_name_len(&path);
            debug!(dir = %path.display(), name_max = ?n, "cached name length limit");
            n
        });
        ResolvedDirectory { path, name_max }
    }

    /// Configured override, if set and usable.
    pub fn override_dir(&self) -> Result<Option<PathBuf>, TmpError> {
        let Some(raw) = self.env.lookup(&self.override_var) else {
            return Ok(None);
        };
        let path = PathBuf::from(raw);
        let reject = |reason| TmpError::ConfigurationInvalid { path: path.clone(), reason };
        if path.as_os_str().is_empty() {
            return Err(reject("empty value"));
        }
        if path.as_os_str().len() > platform::PATH_MAX {
            return Err(reject("longer than PATH_MAX"));
        }
        if !platform::is_writable_dir(&path) {
            return Err(reject("not an existing writable directory"));
        }
        Ok(Some(path))
    }

    /// Cached system directory; probed on first use only.
    pub fn system_dir(&self) -> &Path {
        self.system_dir.get_or_init(|| {
            let dir = self
                .candidates
                .iter()
                .find(|c| platform::is_writable_dir(c))
                .cloned()
                .unwrap_or_else(|| PathBuf::from(FALLBACK_TMPDIR));
            debug!(dir = %dir.display(), "selected system temp directory");
            dir
        })
    }
}
