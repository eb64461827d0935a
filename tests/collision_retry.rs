//! Two allocators with identical naming state share one directory, so every
//! candidate the second one generates has already been taken by the first.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;

use tempfile::tempdir;
use tmpalloc::prelude::*;

fn twin(dir: &std::path::Path) -> TempAllocator {
    let cfg = AllocatorConfig {
        strategy: StrategyChoice::Retry,
        system_dirs: vec![dir.to_path_buf()],
        ..AllocatorConfig::default()
    };
    TempAllocator::with_env(cfg, |_: &str| None::<OsString>)
        .with_name_generator(NameGenerator::deterministic(4242, 1_700_000_000))
}

#[test]
fn colliding_twin_retries_until_free() {
    let td = tempdir().unwrap();
    let first = twin(td.path());
    let second = twin(td.path());

    let mut taken = HashSet::new();
    for _ in 0..5 {
        let f = first.make_tmp_file(None, ModeFlags::empty()).unwrap();
        taken.insert(f.path().to_path_buf());
    }
    for _ in 0..5 {
        let f = second.make_tmp_file(None, ModeFlags::empty()).unwrap();
        assert!(!taken.contains(f.path()), "reused {}", f.path().display());
        taken.insert(f.path().to_path_buf());
    }
    assert_eq!(fs::read_dir(td.path()).unwrap().count(), 10);
}

#[test]
fn squatted_file_is_left_alone() {
    let td = tempdir().unwrap();
    let probe = twin(td.path());
    let predicted = probe.make_tmp_name(None, ModeFlags::empty()).unwrap();
    fs::write(&predicted, b"planted").unwrap();

    let victim = twin(td.path());
    let f = victim.make_tmp_file(None, ModeFlags::empty()).unwrap();
    assert_ne!(f.path(), predicted);
    assert_eq!(fs::read(&predicted).unwrap(), b"planted");
}

#[test]
fn colliding_directories_retry() {
    let td = tempdir().unwrap();
    let a = twin(td.path()).make_tmp_dir(None, ModeFlags::empty()).unwrap();
    let b = twin(td.path()).make_tmp_dir(None, ModeFlags::empty()).unwrap();
    assert_ne!(a, b);
    assert!(a.is_dir() && b.is_dir());
}

#[test]
fn literal_template_collision_surfaces() {
    let td = tempdir().unwrap();
    let alloc = twin(td.path());
    let literal = td.path().join("exact-name");
    fs::write(&literal, b"").unwrap();

    let err = alloc
        .make_tmp_file(literal.to_str(), ModeFlags::USE_CALLER_TEMPLATE)
        .unwrap_err();
    assert!(matches!(err, TmpError::NameCollision(ref p) if *p == literal));
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
}

#[test]
fn literal_template_name_already_taken() {
    let td = tempdir().unwrap();
    let alloc = twin(td.path());
    let literal = td.path().join("already-here");
    fs::write(&literal, b"").unwrap();

    let err = alloc
        .make_tmp_name(literal.to_str(), ModeFlags::USE_CALLER_TEMPLATE)
        .unwrap_err();
    assert!(matches!(err, TmpError::NameCollision(ref p) if *p == literal));

    let free = td.path().join("not-yet");
    let p = alloc
        .make_tmp_name(free.to_str(), ModeFlags::USE_CALLER_TEMPLATE)
        .unwrap();
    assert_eq!(p, free);
    assert!(!p.exists());
}
