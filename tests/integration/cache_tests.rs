use filetime::{set_file_mtime, FileTime};
use rcdb::api::{RcStore, StoreOptions};
use rcdb::cache::{CacheConfig, FileCache, OsFileSystem};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn options(capacity: Option<usize>, recheck_interval: Option<Duration>) -> StoreOptions {
    StoreOptions {
        cache: CacheConfig {
            capacity,
            recheck_interval,
            ..CacheConfig::default()
        },
        ..StoreOptions::default()
    }
}

fn write_rc(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_external_change_is_reloaded() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "blackbox.rc", "a: 1\n");
    set_file_mtime(&rc, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let mut store = RcStore::new(options(None, Some(Duration::ZERO)));
    assert_eq!(store.read(&rc, "a").unwrap(), Some("1"));

    fs::write(&rc, "a: 2\n").unwrap();
    set_file_mtime(&rc, FileTime::from_unix_time(2_000_000, 0)).unwrap();
    assert_eq!(store.read(&rc, "a").unwrap(), Some("2"));
}

#[test]
fn test_no_revalidation_keeps_cached_copy() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "blackbox.rc", "a: 1\n");
    set_file_mtime(&rc, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let mut store = RcStore::new(options(None, None));
    assert_eq!(store.read(&rc, "a").unwrap(), Some("1"));

    fs::write(&rc, "a: 2\n").unwrap();
    set_file_mtime(&rc, FileTime::from_unix_time(2_000_000, 0)).unwrap();
    assert_eq!(store.read(&rc, "a").unwrap(), Some("1"));
}

#[test]
fn test_dirty_file_is_not_reloaded() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "blackbox.rc", "a: 1\nb: 1\n");
    set_file_mtime(&rc, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let mut store = RcStore::new(options(None, Some(Duration::ZERO)));
    store.write(&rc, "b", Some("local")).unwrap();

    fs::write(&rc, "a: 2\n").unwrap();
    set_file_mtime(&rc, FileTime::from_unix_time(2_000_000, 0)).unwrap();
    assert_eq!(store.read(&rc, "a").unwrap(), Some("1"));
    assert_eq!(store.read(&rc, "b").unwrap(), Some("local"));
}

#[test]
fn test_eviction_writes_back_dirty_file() {
    let dir = TempDir::new().unwrap();
    let a = write_rc(&dir, "a.rc", "k: 1\n");
    let b = write_rc(&dir, "b.rc", "k: 1\n");

    let mut store = RcStore::new(options(Some(1), None));
    store.write(&a, "k", Some("2")).unwrap();
    assert_eq!(fs::read_to_string(&a).unwrap(), "k: 1\n");

    store.read(&b, "k").unwrap();
    assert!(!store.cache().contains(&a));
    assert!(store.cache().contains(&b));
    assert_eq!(fs::read_to_string(&a).unwrap(), "k: 2\n");
}

#[test]
fn test_style_files_survive_eviction() {
    let dir = TempDir::new().unwrap();
    let style = write_rc(&dir, "style", "toolbar: raised gradient vertical\n");
    let plain: Vec<PathBuf> = (0..3)
        .map(|i| write_rc(&dir, &format!("p{i}.rc"), "k: v\n"))
        .collect();

    let mut cache = FileCache::new(
        Box::new(OsFileSystem),
        CacheConfig {
            capacity: Some(1),
            ..CacheConfig::default()
        },
    );
    assert!(cache.get(&style).unwrap().is_style());
    for path in &plain {
        cache.get(path).unwrap();
    }

    assert!(cache.contains(&style));
    assert!(cache.contains(&plain[2]));
    assert!(!cache.contains(&plain[0]));
    assert!(!cache.contains(&plain[1]));
}

#[test]
fn test_unbounded_cache_keeps_everything() {
    let dir = TempDir::new().unwrap();
    let mut store = RcStore::new(options(None, None));
    for i in 0..10 {
        let path = write_rc(&dir, &format!("f{i}.rc"), "k: v\n");
        store.read(&path, "k").unwrap();
    }
    assert_eq!(store.cache().len(), 10);
}

#[test]
fn test_flush_failure_keeps_changes() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    let rc = sub.join("plugins.rc");
    fs::write(&rc, "k: 1\n").unwrap();

    let mut store = RcStore::new(options(None, None));
    store.write(&rc, "k", Some("2")).unwrap();

    // Replace the directory by a plain file so the write-back cannot succeed
    fs::remove_dir_all(&sub).unwrap();
    fs::write(&sub, "").unwrap();

    assert!(store.flush().is_err());
    assert!(store.cache().files().any(|f| f.is_dirty()));
    assert!(store.reset_all().is_err());
    assert_eq!(store.cache().len(), 1);
    assert_eq!(store.read(&rc, "k").unwrap(), Some("2"));
}
