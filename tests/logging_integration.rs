use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tempfile::tempdir;
use tmpalloc::platform::open_log_file_secure_append;
use tmpalloc::prelude::*;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// A simple writer that appends written bytes into an in-memory Vec<u8>.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(f: impl FnOnce()) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let layer = tsfmt::layer()
        .with_writer(make_writer)
        .with_target(false)
        .with_ansi(false)
        .compact();
    let subscriber = registry().with(EnvFilter::new("trace")).with(layer);
    let dispatch = tracing::Dispatch::new(subscriber);
    tracing::dispatcher::with_default(&dispatch, f);
    let guard = buf.lock().unwrap();
    String::from_utf8_lossy(&guard[..]).to_string()
}

#[test]
fn allocation_events_are_logged() {
    let td = tempdir().unwrap();
    let logs = capture(|| {
        let cfg = AllocatorConfig {
            strategy: StrategyChoice::Retry,
            system_dirs: vec![td.path().to_path_buf()],
            ..AllocatorConfig::default()
        };
        let alloc = TempAllocator::with_env(cfg, |_: &str| None::<OsString>);
        alloc.make_tmp_file(None, ModeFlags::empty()).unwrap();
        alloc.make_tmp_dir(None, ModeFlags::empty()).unwrap();
    });
    assert!(logs.contains("selected system temp directory"), "logs: {logs}");
    assert!(logs.contains("created temp file"), "logs: {logs}");
    assert!(logs.contains("created temp directory"), "logs: {logs}");
}

#[test]
fn rejected_override_is_logged() {
    let td = tempdir().unwrap();
    let logs = capture(|| {
        let cfg = AllocatorConfig {
            system_dirs: vec![td.path().to_path_buf()],
            ..AllocatorConfig::default()
        };
        let alloc = TempAllocator::with_env(cfg, |_: &str| Some(OsString::from("/nonexistent/x")));
        alloc.resolve_dir(ModeFlags::USE_OVERRIDE_DIR);
    });
    assert!(logs.contains("ignoring override directory"), "logs: {logs}");
}

#[test]
fn file_logging_writes_to_custom_path() {
    let td = tempdir().expect("tempdir");
    let log_path = td.path().join("tmpalloc_test.log");

    // The binary refuses file logging under symlinked ancestors (macOS /var).
    if tmpalloc::path_has_symlink_ancestor(&log_path).unwrap() {
        eprintln!("Skipping file logging test: path has symlink ancestor: {}", log_path.display());
        return;
    }

    let file = open_log_file_secure_append(&log_path).expect("open_log_file_secure_append");
    let (writer, guard): (tracing_appender::non_blocking::NonBlocking, WorkerGuard) =
        tracing_appender::non_blocking(file);
    let file_layer = tsfmt::layer()
        .with_writer(move || writer.clone())
        .with_target(false)
        .compact();
    let subscriber = registry().with(EnvFilter::new("info")).with(file_layer);
    let dispatch = tracing::Dispatch::new(subscriber);
    tracing::dispatcher::with_default(&dispatch, || {
        tracing::info!("file-logging-test: written");
    });
    drop(guard);

    let contents = std::fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("file-logging-test"), "contents={contents}");
}
