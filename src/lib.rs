//! rcdb - Cached Resource-File Database
//!
//! Reads and edits `key: value` resource files (window-manager settings,
//! plugin settings, styles) through an in-memory cache. Lookups are
//! case-insensitive and fall back to Xrm-style wildcard entries; edits keep
//! the file's comments, order and letter case.
//!
//! # Architecture
//!
//! * [`parse`]: Line scanning and key hashing.
//! * [`matcher`]: Wildcard scoring and key similarity.
//! * [`store`]: One file's entries with hash and wildcard indexes.
//! * [`cache`]: Loaded files, revalidation, eviction and write-back.
//! * [`api`]: [`api::RcStore`] and its typed, style and legacy-key layers.
//! * [`config`], [`logging`], [`cli`], [`commands`], [`error`]: The
//!   command-line front end.

pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod parse;
pub mod store;

use anyhow::Result;
use std::io;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;

/// Run the command-line application.
///
/// # Errors
///
/// Returns an error when the command fails; the caller maps it to an exit
/// code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::execute(&cli.command, &config, cli.config.as_deref(), &mut out)
}
