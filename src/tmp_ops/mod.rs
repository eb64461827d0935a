//! Temporary object allocation.
//!
//! `TempAllocator` owns the state every allocation shares: the resolved
//! directories, the name generator (behind a mutex), and the creation strategy
//! picked at construction. The free functions use a lazily-built process-wide
//! allocator with default configuration.

mod file;
pub mod flags;
pub mod helpers;
pub mod names;
pub mod resolve;
pub mod strategy;
pub mod stream;

pub use file::TmpFile;
pub use flags::ModeFlags;
pub use names::{CandidateName, Clock, NameGenerator};
pub use resolve::{DirectoryResolver, EnvLookup, ProcessEnv, ResolvedDirectory};
pub use strategy::{HostPrimitive, Request, RetryLoop, UniqueCreationStrategy};
pub use stream::{TmpStream, wrap as wrap_stream};

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing::debug;

use crate::config::AllocatorConfig;
use crate::errors::Result;
use crate::platform;

pub struct TempAllocator {
    config: AllocatorConfig,
    resolver: DirectoryResolver,
    names: Mutex<NameGenerator>,
    strategy: Box<dyn UniqueCreationStrategy>,
}

impl std::fmt::Debug for TempAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempAllocator")
            .field("config", &self.config)
            .field("resolver", &self.resolver)
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}

impl TempAllocator {
    /// Allocator reading overrides from the process environment.
    pub fn new(config: AllocatorConfig) -> Self {
        Self::with_env(config, ProcessEnv)
    }

    /// Allocator with a caller-provided environment lookup.
    pub fn with_env(config: AllocatorConfig, env: impl EnvLookup + 'static) -> Self {
        let resolver = DirectoryResolver::new(
            Box::new(env),
            config.override_var.clone(),
            config.system_dirs.clone(),
        );
        let strategy = strategy::select(config.strategy);
        debug!(strategy = strategy.name(), "temp allocator ready");
        Self {
            config,
            resolver,
            names: Mutex::new(NameGenerator::new()),
            strategy,
        }
    }

    /// Replace the name generator (e.g. a deterministic one).
    pub fn with_name_generator(mut self, names: NameGenerator) -> Self {
        self.names = Mutex::new(names);
        self
    }

    /// Process-wide allocator with default configuration.
    pub fn global() -> &'static TempAllocator {
        static GLOBAL: OnceLock<TempAllocator> = OnceLock::new();
        GLOBAL.get_or_init(|| TempAllocator::new(AllocatorConfig::default()))
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Directory an allocation with `flags` would use right now.
    pub fn resolve_dir(&self, flags: ModeFlags) -> ResolvedDirectory {
        self.resolver.resolve(flags)
    }

    /// Normalize the name hint: empty/missing means the default root (and no
    /// template); an over-long template is demoted to a plain root.
    fn request(&self, root: Option<&str>, mut flags: ModeFlags) -> Request {
        let hint = root.filter(|r| !r.is_empty());
        let root = hint.unwrap_or(&self.config.default_root);
        if hint.is_none() || root.len() > platform::PATH_MAX {
            flags.remove(ModeFlags::USE_CALLER_TEMPLATE);
        }
        let template = flags
            .contains(ModeFlags::USE_CALLER_TEMPLATE)
            .then(|| root.to_string());
        let dir = self.resolver.resolve(flags);
        Request {
            directory: dir.path,
            root: root.to_string(),
            template,
            flags,
            name_max: dir.name_max,
        }
    }

    /// A name that did not exist when probed. Nothing is created, so another
    /// process may claim it before the caller uses it; prefer `make_tmp_file`.
    pub fn make_tmp_name(&self, root: Option<&str>, flags: ModeFlags) -> Result<PathBuf> {
        let req = self.request(root, flags);
        let path = self.strategy.reserve_name(&req, &self.names)?;
        debug!(path = %path.display(), "reserved temp name");
        Ok(path)
    }

    /// Exclusively create a 0600 file, named `root-<digits>` by the retry loop
    /// or `root.XXXXXX` by the host primitive. With `UNLINK_AFTER_CREATE` the entry is
    /// removed before returning and only the descriptor remains.
    pub fn make_tmp_file(&self, root: Option<&str>, flags: ModeFlags) -> Result<TmpFile> {
        let req = self.request(root, flags);
        let (file, path) = self.strategy.create_file(&req, &self.names)?;
        debug!(path = %path.display(), strategy = self.strategy.name(), "created temp file");
        let tmp = TmpFile::new(file, path);
        if req.flags.contains(ModeFlags::UNLINK_AFTER_CREATE) {
            file::unlink_after_create(tmp)
        } else {
            Ok(tmp)
        }
    }

    /// `make_tmp_file` wrapped in a buffered stream.
    pub fn make_tmp_stream(&self, root: Option<&str>, flags: ModeFlags) -> Result<TmpStream> {
        let tmp = self.make_tmp_file(root, flags)?;
        stream::wrap(tmp, flags)
    }

    /// Exclusively create a 0700 directory.
    pub fn make_tmp_dir(&self, root: Option<&str>, flags: ModeFlags) -> Result<PathBuf> {
        let req = self.request(root, flags);
        let path = self.strategy.create_dir(&req, &self.names)?;
        debug!(path = %path.display(), strategy = self.strategy.name(), "created temp directory");
        Ok(path)
    }
}

/// See [`TempAllocator::make_tmp_name`].
pub fn make_tmp_name(root: Option<&str>, flags: ModeFlags) -> Result<PathBuf> {
    TempAllocator::global().make_tmp_name(root, flags)
}

/// See [`TempAllocator::make_tmp_file`].
pub fn make_tmp_file(root: Option<&str>, flags: ModeFlags) -> Result<TmpFile> {
    TempAllocator::global().make_tmp_file(root, flags)
}

/// See [`TempAllocator::make_tmp_stream`].
pub fn make_tmp_stream(root: Option<&str>, flags: ModeFlags) -> Result<TmpStream> {
    TempAllocator::global().make_tmp_stream(root, flags)
}

/// See [`TempAllocator::make_tmp_dir`].
pub fn make_tmp_dir(root: Option<&str>, flags: ModeFlags) -> Result<PathBuf> {
    TempAllocator::global().make_tmp_dir(root, flags)
}
