use clap::Parser;
use figment::providers::Serialized;
use rcdb::cache::LineEnding;
use rcdb::cli::Cli;
use rcdb::config::Config;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all RCDB_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("RCDB_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_defaults() {
    let figment = figment::Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config = Config::load_from_path(temp_dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
max_cached_files = 8
recheck_interval_ms = 100
line_ending = "crlf"
tabify = true
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path);
    assert_eq!(config.max_cached_files, 8);
    assert_eq!(config.recheck_interval_ms, 100);
    assert_eq!(config.line_ending, LineEnding::Crlf);
    assert!(config.tabify);
    assert!(config.revalidate);

    let cache = config.cache_config();
    assert_eq!(cache.capacity, Some(8));
    assert_eq!(cache.recheck_interval, Some(Duration::from_millis(100)));
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "max_cached_files = 8\n").unwrap();

    std::env::set_var("RCDB_MAX_CACHED_FILES", "2");
    std::env::set_var("RCDB_WRITE_THROUGH", "true");
    let config = Config::load_from_path(&config_path);
    clear_env();

    assert_eq!(config.max_cached_files, 2);
    assert!(config.write_through);
    assert!(config.store_options().write_through);
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "max_cached_files = \"many\"\n").unwrap();

    assert_eq!(Config::load_from_path(&config_path), Config::default());
}

#[test]
fn test_unknown_keys_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "max_cache_files = 9\ntabify = true\n").unwrap();

    let config = Config::load_from_path(&config_path);
    assert_eq!(config.max_cached_files, 4);
    assert!(config.tabify);
}

#[test]
fn test_save_and_reload() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        max_cached_files: 0,
        line_continuation: true,
        translate_legacy_keys: false,
        ..Config::default()
    };
    config.save_to_path(&config_path).unwrap();

    let loaded = Config::load_from_path(&config_path);
    assert_eq!(loaded, config);
    assert_eq!(loaded.cache_config().capacity, None);
}

#[test]
fn test_cli_overrides_config() {
    let cli = Cli::try_parse_from([
        "rcdb",
        "--max-cached-files",
        "1",
        "--line-ending",
        "crlf",
        "--no-translate",
        "--no-revalidate",
        "--continuation",
        "info",
        "a.rc",
    ])
    .unwrap();

    let mut config = Config::default();
    config.merge_cli(&cli);
    assert_eq!(config.max_cached_files, 1);
    assert_eq!(config.line_ending, LineEnding::Crlf);
    assert!(!config.translate_legacy_keys);
    assert!(!config.revalidate);
    assert!(config.line_continuation);
    assert_eq!(config.cache_config().recheck_interval, None);
}
