//! Layered configuration.
//!
//! Settings are merged from, lowest to highest priority:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file, by default `config.toml` in the platform config directory
//! 3. `RCDB_*` environment variables (`RCDB_MAX_CACHED_FILES=8`)
//! 4. Command-line flags ([`Config::merge_cli`])
//!
//! A missing or broken configuration never stops the program: problems are
//! logged and the defaults are used instead.
//!
//! # Example
//!
//! ```toml
//! max_cached_files = 8
//! recheck_interval_ms = 50
//! line_ending = "crlf"
//! tabify = true
//! ```

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::StoreOptions;
use crate::cache::{CacheConfig, LineEnding, DEFAULT_CAPACITY};
use crate::cli::Cli;
use crate::parse::ScanOptions;

/// Prefix of environment variables that override the configuration.
pub const ENV_PREFIX: &str = "RCDB_";

const KNOWN_FIELDS: &[&str] = &[
    "max_cached_files",
    "revalidate",
    "recheck_interval_ms",
    "line_ending",
    "tabify",
    "line_continuation",
    "translate_legacy_keys",
    "write_through",
];

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Non-style files kept in memory; 0 keeps every file.
    pub max_cached_files: usize,
    /// Reload cached files that changed on disk.
    pub revalidate: bool,
    /// Minimum milliseconds between two on-disk checks of a file.
    pub recheck_interval_ms: u64,
    /// Line terminator for written files.
    pub line_ending: LineEnding,
    /// Align values in a column when writing.
    pub tabify: bool,
    /// Join lines ending in a backslash.
    pub line_continuation: bool,
    /// Answer legacy style keys from `*.appearance` styles.
    pub translate_legacy_keys: bool,
    /// Write every change to disk immediately.
    pub write_through: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cached_files: DEFAULT_CAPACITY,
            revalidate: true,
            recheck_interval_ms: 20,
            line_ending: LineEnding::default(),
            tabify: false,
            line_continuation: false,
            translate_legacy_keys: true,
            write_through: false,
        }
    }
}

impl Config {
    /// Load from the default configuration file and the environment.
    #[must_use]
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from_path(path),
            None => {
                log::debug!("No configuration directory, using defaults");
                Self::from_figment(Figment::from(Serialized::defaults(Self::default())))
            }
        }
    }

    /// Load from `path` and the environment.
    ///
    /// A missing file is not an error. Unknown keys are reported with a
    /// suggestion; a file that does not parse is ignored as a whole.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => {
                    warn_unknown_fields(&content, path);
                    figment = figment.merge(Toml::file(path));
                }
                Err(e) => log::warn!("Cannot read config {}: {}", path.display(), e),
            }
        } else {
            log::debug!("Config {} not found, using defaults", path.display());
        }

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Self {
        let figment = figment.merge(Env::prefixed(ENV_PREFIX));
        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Write the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or the file written.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "rcdb", "rcdb").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides.
    pub fn merge_cli(&mut self, cli: &Cli) {
        let args = &cli.store;
        if let Some(max) = args.max_cached_files {
            self.max_cached_files = max;
        }
        if let Some(line_ending) = args.line_ending {
            self.line_ending = line_ending.into();
        }
        if args.tabify {
            self.tabify = true;
        }
        if args.continuation {
            self.line_continuation = true;
        }
        if args.no_translate {
            self.translate_legacy_keys = false;
        }
        if args.no_revalidate {
            self.revalidate = false;
        }
    }

    /// Cache settings derived from this configuration.
    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: (self.max_cached_files > 0).then_some(self.max_cached_files),
            recheck_interval: self
                .revalidate
                .then(|| Duration::from_millis(self.recheck_interval_ms)),
            line_ending: self.line_ending,
            tabify: self.tabify,
            scan: ScanOptions {
                continuation: self.line_continuation,
            },
        }
    }

    /// Store settings derived from this configuration.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            cache: self.cache_config(),
            translate_legacy_keys: self.translate_legacy_keys,
            write_through: self.write_through,
        }
    }
}

/// Log unknown top-level keys, suggesting the closest known one.
fn warn_unknown_fields(content: &str, path: &Path) {
    let Ok(table) = toml::from_str::<toml::Table>(content) else {
        return;
    };
    for key in table.keys() {
        if KNOWN_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match suggest_field(key) {
            Some(known) => log::warn!(
                "Unknown config key '{}' in {} (did you mean '{}'?)",
                key,
                path.display(),
                known
            ),
            None => log::warn!("Unknown config key '{}' in {}", key, path.display()),
        }
    }
}

/// Closest known field name, if any is reasonably close.
#[must_use]
pub fn suggest_field(key: &str) -> Option<&'static str> {
    KNOWN_FIELDS
        .iter()
        .map(|known| (strsim::jaro_winkler(key, known), *known))
        .filter(|(score, _)| *score > 0.8)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, known)| known)
}
