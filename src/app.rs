//! Application orchestrator.
//! Loads/merges config, initializes logging, builds the allocator, and prints
//! each produced path on its own stdout line.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, error, warn};

use tmpalloc::cli::Args;
use tmpalloc::config::{CONFIG_ENV_VAR, default_config_path, load_config};
use tmpalloc::output as out;
use tmpalloc::{TempAllocator, TmpError};

use crate::logging::init_tracing;

/// What a single iteration produces.
enum Kind {
    Name,
    File,
    Dir,
}

fn kind(args: &Args) -> Kind {
    match (args.dry_run, args.directory) {
        (true, _) => Kind::Name,
        (false, true) => Kind::Dir,
        (false, false) => Kind::File,
    }
}

fn print_config_location(args: &Args) {
    if let Some(p) = &args.config {
        out::print_info(&format!("Using --config (explicit):\n  {}", p.display()));
        return;
    }
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV_VAR) {
        out::print_info(&format!("Using {CONFIG_ENV_VAR} (explicit):\n  {cfg_env}"));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default tmpalloc config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there; built-in defaults apply.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn produce(alloc: &TempAllocator, args: &Args) -> Result<PathBuf, TmpError> {
    let root = args.root.as_deref();
    let flags = args.flags();
    match kind(args) {
        Kind::Name => alloc.make_tmp_name(root, flags),
        Kind::Dir => alloc.make_tmp_dir(root, flags),
        // The file is closed on drop; the entry stays for the caller.
        Kind::File => alloc
            .make_tmp_file(root, flags)
            .map(|f| f.path().to_path_buf()),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location(&args);
        return Ok(());
    }

    // Config file values first, CLI flags win.
    let (mut cfg, cfg_path) = load_config(args.config.as_deref()).inspect_err(|e| {
        out::print_error(&format!("Failed to load config: {e:#}"));
    })?;
    args.apply_overrides(&mut cfg);

    // Held until exit so the non-blocking file writer flushes.
    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    debug!(?args, config = ?cfg_path, "starting tmpalloc");

    let alloc = TempAllocator::new(cfg);
    if args.template && args.count > 1 && !args.root.as_deref().is_some_and(|r| r.ends_with("XXXXXX")) {
        warn!("a literal --template name can only be created once; later iterations will collide");
    }

    for _ in 0..args.count {
        match produce(&alloc, &args) {
            Ok(path) => out::print_user(&path.display().to_string()),
            Err(e) => {
                error!(code = e.raw_os_error(), kind = ?e.kind(), error = %e, "allocation failed");
                return Err(e.into());
            }
        }
    }
    Ok(())
}
