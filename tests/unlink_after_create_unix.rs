#![cfg(unix)]

use std::ffi::OsString;
use std::io::{Read, Seek, SeekFrom, Write};

use tempfile::tempdir;
use tmpalloc::prelude::*;

fn allocator(dir: &std::path::Path, strategy: StrategyChoice) -> TempAllocator {
    let cfg = AllocatorConfig {
        strategy,
        system_dirs: vec![dir.to_path_buf()],
        ..AllocatorConfig::default()
    };
    TempAllocator::with_env(cfg, |_: &str| None::<OsString>)
}

#[test]
fn unlinked_file_has_no_entry_but_works() {
    for strategy in [StrategyChoice::Retry, StrategyChoice::Host] {
        let td = tempdir().unwrap();
        let alloc = allocator(td.path(), strategy);
        let mut f = alloc
            .make_tmp_file(None, ModeFlags::UNLINK_AFTER_CREATE | ModeFlags::READ_WRITE)
            .unwrap();
        assert!(f.is_anonymous());
        assert!(!f.path().exists(), "{strategy}: entry should be gone");
        assert!(std::fs::read_dir(td.path()).unwrap().next().is_none());

        f.write_all(b"anonymous scratch").unwrap();
        f.seek(SeekFrom::Start(0)).unwrap();
        let mut back = String::new();
        f.read_to_string(&mut back).unwrap();
        assert_eq!(back, "anonymous scratch");
    }
}

#[test]
fn unlinked_stream_reads_back() {
    let td = tempdir().unwrap();
    let alloc = allocator(td.path(), StrategyChoice::Retry);
    let mut s = alloc
        .make_tmp_stream(Some("heredoc"), ModeFlags::UNLINK_AFTER_CREATE | ModeFlags::READ_WRITE)
        .unwrap();
    assert!(s.is_anonymous());
    writeln!(s, "line one").unwrap();
    s.seek(SeekFrom::Start(0)).unwrap();
    let mut back = String::new();
    s.read_to_string(&mut back).unwrap();
    assert_eq!(back, "line one\n");
}
