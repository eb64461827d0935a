//! Core library for `tmpalloc`.
//!
//! Hands out uniquely named temporary files, directories and names in a
//! directory chosen from an optional override (`$TMPDIR` by default), a list of
//! well-known system locations, or the current directory. Files are created
//! exclusively with mode 0600 and directories with mode 0700, so a process never
//! opens or adopts an object someone else planted.
//!
//! The shape of generated names depends on the creation strategy. The retry
//! loop (`StrategyChoice::Retry`) produces `<dir>/<root>-<digits>`. The host
//! primitive produces `<dir>/<root>.XXXXXX` with the placeholders filled by
//! `mkstemp`/`mkdtemp`. `StrategyChoice::Auto`, the default, picks the host
//! primitive on Unix and the retry loop elsewhere.
//!
//! ```no_run
//! use tmpalloc::{ModeFlags, make_tmp_dir, make_tmp_file};
//!
//! let scratch = make_tmp_dir(Some("build"), ModeFlags::USE_OVERRIDE_DIR)?;
//! let mut log = make_tmp_file(None, ModeFlags::READ_WRITE | ModeFlags::UNLINK_AFTER_CREATE)?;
//! std::io::Write::write_all(&mut log, b"scratch data")?;
//! # let _ = scratch;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod output;
pub mod platform;
pub mod tmp_ops;

pub use config::{AllocatorConfig, LogLevel, StrategyChoice, default_config_path, path_has_symlink_ancestor};
pub use errors::TmpError;
pub use tmp_ops::{
    ModeFlags, TempAllocator, TmpFile, TmpStream, make_tmp_dir, make_tmp_file, make_tmp_name,
    make_tmp_stream,
};

/// Common imports for callers.
pub mod prelude {
    pub use crate::config::{AllocatorConfig, StrategyChoice};
    pub use crate::errors::{Result as TmpResult, TmpError};
    pub use crate::tmp_ops::{
        EnvLookup, ModeFlags, NameGenerator, TempAllocator, TmpFile, TmpStream, make_tmp_dir,
        make_tmp_file, make_tmp_name, make_tmp_stream,
    };
}
