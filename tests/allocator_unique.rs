use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;

use tempfile::tempdir;
use tmpalloc::prelude::*;

fn allocator(dir: &Path, strategy: StrategyChoice) -> TempAllocator {
    let cfg = AllocatorConfig {
        strategy,
        system_dirs: vec![dir.to_path_buf()],
        ..AllocatorConfig::default()
    };
    TempAllocator::with_env(cfg, |_: &str| None::<OsString>)
}

fn is_default_name(p: &Path) -> bool {
    let name = p.file_name().unwrap().to_string_lossy().into_owned();
    name.strip_prefix("shtmp-")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[test]
fn thousand_strong_random_files_are_distinct() {
    let td = tempdir().unwrap();
    let alloc = allocator(td.path(), StrategyChoice::Retry);

    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let f = alloc
            .make_tmp_file(None, ModeFlags::USE_STRONG_RANDOM | ModeFlags::READ_WRITE)
            .unwrap();
        assert_eq!(f.path().parent(), Some(td.path()));
        assert!(is_default_name(f.path()), "unexpected name {}", f.path().display());
        assert_eq!(f.file().metadata().unwrap().len(), 0, "{} not fresh", f.path().display());
        assert!(seen.insert(f.path().to_path_buf()), "duplicate {}", f.path().display());
    }
    assert_eq!(std::fs::read_dir(td.path()).unwrap().count(), 1000);
}

#[test]
fn counter_source_names_are_distinct_too() {
    let td = tempdir().unwrap();
    let alloc = allocator(td.path(), StrategyChoice::Retry);
    let paths: HashSet<_> = (0..200)
        .map(|_| alloc.make_tmp_file(Some("job"), ModeFlags::empty()).unwrap().into_parts().1)
        .collect();
    assert_eq!(paths.len(), 200);
    assert!(paths.iter().all(|p| {
        p.file_name().unwrap().to_string_lossy().starts_with("job-")
    }));
}

#[test]
fn empty_root_means_default_root() {
    let td = tempdir().unwrap();
    let alloc = allocator(td.path(), StrategyChoice::Retry);
    let f = alloc.make_tmp_file(Some(""), ModeFlags::empty()).unwrap();
    assert!(is_default_name(f.path()));
}

#[test]
fn names_are_free_at_probe_time() {
    let td = tempdir().unwrap();
    let alloc = allocator(td.path(), StrategyChoice::Retry);
    let a = alloc.make_tmp_name(None, ModeFlags::empty()).unwrap();
    let b = alloc.make_tmp_name(None, ModeFlags::empty()).unwrap();
    assert_ne!(a, b);
    assert!(!a.exists() && !b.exists());
    assert!(std::fs::read_dir(td.path()).unwrap().next().is_none());
}

#[test]
fn shared_allocator_across_threads() {
    let td = tempdir().unwrap();
    let alloc = allocator(td.path(), StrategyChoice::Retry);

    let paths: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..100)
                        .map(|_| {
                            let f = alloc.make_tmp_file(None, ModeFlags::empty()).unwrap();
                            assert!(is_default_name(f.path()));
                            f.into_parts().1
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect()
    });

    let distinct: HashSet<_> = paths.iter().collect();
    assert_eq!(paths.len(), 800);
    assert_eq!(distinct.len(), 800);
    assert_eq!(std::fs::read_dir(td.path()).unwrap().count(), 800);
}
