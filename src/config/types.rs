//! Core configuration types.
//! - AllocatorConfig holds allocator and runtime settings with sensible defaults.
//! - StrategyChoice selects how unique objects are created.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DEFAULT_NAME_ROOT, DEFAULT_OVERRIDE_VAR};
use crate::tmp_ops::resolve::default_system_dirs;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Which unique-creation strategy the allocator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    /// Host primitive when the platform has one, else the retry loop.
    #[default]
    Auto,
    /// mkstemp/mkdtemp (falls back to the retry loop where missing).
    Host,
    /// Name generator plus exclusive create, retried on collision.
    Retry,
}

impl StrategyChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(StrategyChoice::Auto),
            "host" | "mkstemp" => Some(StrategyChoice::Host),
            "retry" | "loop" => Some(StrategyChoice::Retry),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyChoice::Auto => "auto",
            StrategyChoice::Host => "host",
            StrategyChoice::Retry => "retry",
        })
    }
}

impl FromStr for StrategyChoice {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid strategy: '{s}' (expected auto, host or retry)"))
    }
}

/// Runtime configuration for the allocator and the CLI around it.
#[derive(Debug, Clone)]
pub struct AllocatorConfig {
    /// Environment key naming the override directory
    pub override_var: String,
    /// Name root used when the caller passes none
    pub default_root: String,
    /// Unique-creation strategy
    pub strategy: StrategyChoice,
    /// System directory candidates, probed in order
    pub system_dirs: Vec<PathBuf>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            override_var: DEFAULT_OVERRIDE_VAR.to_string(),
            default_root: DEFAULT_NAME_ROOT.to_string(),
            strategy: StrategyChoice::Auto,
            system_dirs: default_system_dirs(),
            log_level: LogLevel::Normal,
            log_file: None,
        }
    }
}
