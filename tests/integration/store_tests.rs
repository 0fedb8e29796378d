use rcdb::api::{RcStore, Rgb, StoreError, StoreOptions};
use rcdb::cache::{CacheConfig, LineEnding};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_rc(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_edit_preserves_comments_and_order() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(
        &dir,
        "blackbox.rc",
        "! blackbox settings\nsession.screen0.workspaces: 4\n\nsession.menuFile: ~/.menu\n",
    );

    let mut store = RcStore::new(StoreOptions::default());
    store.write(&rc, "session.screen0.workspaces", Some("6")).unwrap();
    store.flush().unwrap();

    assert_eq!(
        fs::read_to_string(&rc).unwrap(),
        "! blackbox settings\nsession.screen0.workspaces: 6\n\nsession.menuFile: ~/.menu\n"
    );
}

#[test]
fn test_new_key_lands_next_to_relatives() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(
        &dir,
        "style.rc",
        "toolbar.label.font: Tahoma\nmenu.font: Verdana\n",
    );

    let mut store = RcStore::new(StoreOptions::default());
    store.write(&rc, "toolbar.label.color", Some("red")).unwrap();
    store.flush().unwrap();

    assert_eq!(
        fs::read_to_string(&rc).unwrap(),
        "toolbar.label.font: Tahoma\ntoolbar.label.color: red\nmenu.font: Verdana\n"
    );
}

#[test]
fn test_missing_file_created_on_flush() {
    let dir = TempDir::new().unwrap();
    let rc = dir.path().join("sub").join("new.rc");

    let mut store = RcStore::new(StoreOptions::default());
    assert_eq!(store.read(&rc, "a").unwrap(), None);
    assert!(!rc.exists());

    store.write(&rc, "a", Some("1")).unwrap();
    store.write(&rc, "b", Some("2")).unwrap();
    store.flush().unwrap();

    assert_eq!(fs::read_to_string(&rc).unwrap(), "a: 1\nb: 2\n");
}

#[test]
fn test_drop_flushes_changes() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "plugins.rc", "x: 1\n");
    {
        let mut store = RcStore::new(StoreOptions::default());
        store.write(&rc, "x", Some("2")).unwrap();
    }
    assert_eq!(fs::read_to_string(&rc).unwrap(), "x: 2\n");
}

#[test]
fn test_write_through() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "plugins.rc", "x: 1\n");
    let mut store = RcStore::new(StoreOptions {
        write_through: true,
        ..StoreOptions::default()
    });
    store.write(&rc, "x", Some("2")).unwrap();
    assert_eq!(fs::read_to_string(&rc).unwrap(), "x: 2\n");
}

#[test]
fn test_crlf_and_tabify_on_write() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "plugins.rc", "a: 1\nlonger.key: 2\n");
    let mut store = RcStore::new(StoreOptions {
        cache: CacheConfig {
            line_ending: LineEnding::Crlf,
            tabify: true,
            ..CacheConfig::default()
        },
        ..StoreOptions::default()
    });
    store.write(&rc, "a", Some("3")).unwrap();
    store.flush().unwrap();

    assert_eq!(
        fs::read_to_string(&rc).unwrap(),
        "a:          3\r\nlonger.key: 2\r\n"
    );
}

#[test]
fn test_delete_pattern_and_clear() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(
        &dir,
        "plugins.rc",
        "# slit\nbbSlit.x: 1\nbbSlit.y: 2\nbbKeys.z: 3\n",
    );
    let mut store = RcStore::new(StoreOptions::default());

    assert!(store.delete(&rc, "bbslit.*").unwrap());
    store.flush().unwrap();
    assert_eq!(fs::read_to_string(&rc).unwrap(), "# slit\nbbKeys.z: 3\n");

    assert!(store.delete(&rc, "*").unwrap());
    store.flush().unwrap();
    assert_eq!(fs::read_to_string(&rc).unwrap(), "");
}

#[test]
fn test_typed_values_on_disk() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "plugins.rc", "");
    let mut store = RcStore::new(StoreOptions::default());

    store.write_int(&rc, "bbSlit.xpos", 120).unwrap();
    store.write_color(&rc, "bbSlit.color", Rgb::new(0xff, 0, 0x80)).unwrap();
    store.write_bool(&rc, "bbSlit.onTop", false).unwrap();
    store.reset_all().unwrap();
    assert!(store.cache().is_empty());

    assert_eq!(store.read_int(&rc, "bbslit.xpos", 0).unwrap(), 120);
    assert_eq!(
        store.read_color(&rc, "bbSlit.color", "#000000").unwrap(),
        Some(Rgb::new(0xff, 0, 0x80))
    );
    assert!(!store.read_bool(&rc, "BBSLIT.ONTOP", true).unwrap());
}

#[test]
fn test_invalid_keys_rejected() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "plugins.rc", "");
    let mut store = RcStore::new(StoreOptions::default());

    assert!(matches!(
        store.write(&rc, "", Some("x")),
        Err(StoreError::InvalidKey(_))
    ));
    let long = "k".repeat(300);
    assert!(matches!(
        store.write(&rc, &long, Some("x")),
        Err(StoreError::InvalidKey(_))
    ));
}

#[test]
fn test_path_case_shares_cache_entry() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "plugins.rc", "a: 1\n");
    let mut store = RcStore::new(StoreOptions::default());

    store.read(&rc, "a").unwrap();
    let upper = dir.path().join("PLUGINS.RC");
    assert!(store.cache().contains(Path::new(&upper)));
    assert_eq!(store.cache().len(), 1);
}

#[test]
fn test_menu_wildcard_example() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "style", "menu.frame: bevel1\n");
    let mut store = RcStore::new(StoreOptions::default());

    store.write(&rc, "menu.*", Some("X")).unwrap();
    assert_eq!(store.read(&rc, "menu.*").unwrap(), Some("X"));
    assert_eq!(store.read(&rc, "menu.title").unwrap(), Some("X"));
    assert_eq!(store.read(&rc, "menu.frame").unwrap(), Some("bevel1"));
}

#[test]
fn test_exact_key_outranks_wildcards() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(
        &dir,
        "style",
        "toolbar.*.color: wild\ntoolbar.color: shallow\ntoolbar.button.color: exact\n",
    );
    let mut store = RcStore::new(StoreOptions::default());
    assert_eq!(store.read(&rc, "toolbar.button.color").unwrap(), Some("exact"));
    assert_eq!(store.read(&rc, "toolbar.label.color").unwrap(), Some("wild"));
}

#[test]
fn test_latin1_style_survives_edit() {
    let dir = TempDir::new().unwrap();
    let rc = dir.path().join("cafe.style");
    fs::write(&rc, b"# (c) caf\xE9 style\nfoo: 1\n").unwrap();
    let mut store = RcStore::new(StoreOptions::default());

    store.write(&rc, "foo", Some("2")).unwrap();
    store.flush().unwrap();

    assert_eq!(fs::read(&rc).unwrap(), b"# (c) caf\xE9 style\nfoo: 2\n".to_vec());
}

#[test]
fn test_rejected_writes_leave_file_alone() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "blackbox.rc", "a: 1\n");
    let mut store = RcStore::new(StoreOptions::default());

    assert!(matches!(
        store.write(&rc, "#hidden", Some("1")),
        Err(StoreError::InvalidKey(_))
    ));
    assert!(matches!(
        store.write(&rc, "a", Some("x\nsession.evil: y")),
        Err(StoreError::InvalidValue { .. })
    ));
    store.reset_all().unwrap();

    assert_eq!(fs::read_to_string(&rc).unwrap(), "a: 1\n");
    assert_eq!(store.read(&rc, "session.evil").unwrap(), None);
}

#[test]
fn test_wildcard_key_rewrite_and_delete() {
    let dir = TempDir::new().unwrap();
    let rc = write_rc(&dir, "style", "*.font: Tahoma\n");
    let mut store = RcStore::new(StoreOptions::default());

    store.write(&rc, "*.font", Some("Tahoma")).unwrap();
    store.write(&rc, "*.font", Some("Tahoma")).unwrap();
    store.flush().unwrap();
    assert_eq!(fs::read_to_string(&rc).unwrap(), "*.font: Tahoma\n");

    store.write(&rc, "*.font", None).unwrap();
    store.flush().unwrap();
    assert_eq!(fs::read_to_string(&rc).unwrap(), "");
}
