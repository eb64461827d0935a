//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - -u/--dry-run reserves names only; nothing is created.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{AllocatorConfig, LogLevel, StrategyChoice};
use crate::tmp_ops::ModeFlags;

/// Create temporary files and directories safely.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Create uniquely named temporary files and directories"
)]
pub struct Args {
    /// Name root (or a template ending in XXXXXX with --template).
    #[arg(value_name = "ROOT")]
    pub root: Option<String>,

    /// Create a directory instead of a file.
    #[arg(short = 'd', long, help = "Create a directory instead of a file")]
    pub directory: bool,

    /// Print a currently unused name without creating anything.
    #[arg(
        short = 'u',
        long,
        help = "Only print a name that did not exist when checked; create nothing"
    )]
    pub dry_run: bool,

    /// Honor the override directory from the environment ($TMPDIR by default).
    #[arg(short = 't', long, help = "Prefer the directory named by $TMPDIR")]
    pub tmpdir: bool,

    /// Treat ROOT as a literal name or XXXXXX template.
    #[arg(long, help = "Treat ROOT as a template (trailing XXXXXX are replaced)")]
    pub template: bool,

    /// Use the OS random source for name suffixes.
    #[arg(short = 'r', long, help = "Use strong randomness for name suffixes")]
    pub random: bool,

    /// How many objects to create.
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of objects to create"
    )]
    pub count: u32,

    /// Creation strategy: auto, host, retry.
    #[arg(long, help = "Creation strategy: auto, host, retry")]
    pub strategy: Option<StrategyChoice>,

    /// Explicit config file (overrides $TMPALLOC_CONFIG).
    #[arg(long, value_hint = ValueHint::FilePath, help = "Path to config.xml")]
    pub config: Option<PathBuf>,

    /// Print where tmpalloc will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by tmpalloc and exit")]
    pub print_config: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Also write logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath, help = "Append logs to this file")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Mode flags implied by the command line.
    pub fn flags(&self) -> ModeFlags {
        let mut flags = ModeFlags::READ_WRITE;
        if self.tmpdir {
            flags |= ModeFlags::USE_OVERRIDE_DIR;
        }
        if self.template {
            flags |= ModeFlags::USE_CALLER_TEMPLATE;
        }
        if self.random {
            flags |= ModeFlags::USE_STRONG_RANDOM;
        }
        flags
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut AllocatorConfig) {
        if let Some(s) = self.strategy {
            cfg.strategy = s;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
