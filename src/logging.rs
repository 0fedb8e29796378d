//! `env_logger` backend for the `rcdb` binary.
//!
//! Library code logs through the `log` facade only. Loads, reloads,
//! evictions and write-backs go to `debug`; single lookups to `trace`;
//! changes dropped at shutdown to `warn`.
//!
//! `RUST_LOG`, when set, replaces the level picked from `-v`/`-q`.
//!
//! ```rust,no_run
//! rcdb::logging::init_logging(1, false);
//! log::debug!("cache activity is now visible");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Install the logger for `-v` count `verbose` and `-q` flag `quiet`.
///
/// Only the first call in a process has an effect.
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").ok();
    let level = determine_level(verbose, quiet);

    let mut builder = Builder::new();
    match &from_env {
        Some(_) => builder.parse_default_env(),
        None => builder.filter_level(level),
    };
    configure_format(&mut builder, verbose >= 1);

    if builder.try_init().is_ok() {
        match from_env {
            Some(spec) => log::debug!("log filter from RUST_LOG: {}", spec),
            None => log::debug!("log level {}", level),
        }
    }
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// `LEVEL [module] message`; the module only when `with_module` is set, and
/// debug builds prefix a timestamp.
fn configure_format(builder: &mut Builder, with_module: bool) {
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if cfg!(debug_assertions) {
            let timestamp = buf.timestamp_seconds();
            write!(buf, "{timestamp} ")?;
        }
        write!(buf, "{style}{:<5}{style:#} ", record.level())?;
        if with_module {
            write!(buf, "[{}] ", record.module_path().unwrap_or("?"))?;
        }
        writeln!(buf, "{}", record.args())
    });
}

/// Name of the currently active maximum level.
#[must_use]
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
