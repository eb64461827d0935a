//! Config module.
//! Provides configuration types, default paths, and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{config_path_from_env, default_config_path, path_has_symlink_ancestor};
pub use types::{AllocatorConfig, LogLevel, StrategyChoice};
pub use xml::{load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TMPALLOC_CONFIG";
/// Environment key consulted for the override directory.
pub const DEFAULT_OVERRIDE_VAR: &str = "TMPDIR";
/// Name root used when callers pass none.
pub const DEFAULT_NAME_ROOT: &str = "shtmp";
