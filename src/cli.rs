//! Command-line interface definitions for rcdb.
//!
//! Global options control verbosity, color, error format and the cache
//! policy; subcommands read and edit one resource file each.
//!
//! # Example
//!
//! ```bash
//! # Read a value, falling back to wildcard entries
//! rcdb get ~/.blackboxrc session.screen0.toolbar.onTop
//!
//! # Every value of a repeated key, in file order
//! rcdb get plugins.rc bbKeys.key --all
//!
//! # Change a value, keeping the file's layout
//! rcdb set ~/.blackboxrc session.screen0.workspaces 4
//!
//! # Remove every entry matching a pattern
//! rcdb delete plugins.rc 'bbSlit.*'
//!
//! # Show the parsed texture of a style item
//! rcdb style styles/Flat toolbar.appearance
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cache::LineEnding;

/// Cached resource-file database with wildcard lookup.
///
/// rcdb reads and edits `key: value` resource files such as window-manager
/// settings and styles, keeping comments, order and letter case intact.
#[derive(Debug, Parser)]
#[command(name = "rcdb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cache and format overrides
    #[command(flatten)]
    pub store: StoreArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the cache policy and file format.
#[derive(Debug, Clone, Default, Args)]
pub struct StoreArgs {
    /// Number of non-style files kept in memory (0 for no limit)
    #[arg(long, global = true, value_name = "N")]
    pub max_cached_files: Option<usize>,

    /// Line terminator used when writing files
    #[arg(long, global = true, value_enum)]
    pub line_ending: Option<LineEndingArg>,

    /// Align values in a column when writing files
    #[arg(long, global = true)]
    pub tabify: bool,

    /// Join lines that end in a backslash
    #[arg(long, global = true)]
    pub continuation: bool,

    /// Do not answer legacy style keys from `*.appearance` styles
    #[arg(long, global = true)]
    pub no_translate: bool,

    /// Do not reload files changed by other programs
    #[arg(long, global = true)]
    pub no_revalidate: bool,
}

/// Line terminator choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LineEndingArg {
    /// Unix line endings (\n)
    Lf,
    /// DOS line endings (\r\n)
    Crlf,
}

impl From<LineEndingArg> for LineEnding {
    fn from(arg: LineEndingArg) -> Self {
        match arg {
            LineEndingArg::Lf => LineEnding::Lf,
            LineEndingArg::Crlf => LineEnding::Crlf,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the value of a key
    Get(GetArgs),
    /// Set the value of a key
    Set(SetArgs),
    /// Rename every key matching a key name
    Rename(RenameArgs),
    /// Remove every entry matching a pattern
    Delete(DeleteArgs),
    /// Print the entries of a file
    Dump(DumpArgs),
    /// Describe a file
    Info(InfoArgs),
    /// Show the parsed texture of a style item
    Style(StyleArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the get subcommand.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Resource file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key to look up (any letter case)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Print every exact match in file order instead of the best match
    #[arg(long)]
    pub all: bool,

    /// Value printed when the key is absent
    #[arg(long, value_name = "VALUE")]
    pub default: Option<String>,
}

/// Arguments for the set subcommand.
#[derive(Debug, Args)]
pub struct SetArgs {
    /// Resource file, created if missing
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key to set
    #[arg(value_name = "KEY")]
    pub key: String,

    /// New value
    #[arg(value_name = "VALUE")]
    pub value: String,
}

/// Arguments for the rename subcommand.
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Resource file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Current key name
    #[arg(value_name = "KEY")]
    pub key: String,

    /// New key name
    #[arg(value_name = "NEW_KEY")]
    pub new_key: String,
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Resource file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key pattern (`*` and `?` allowed; a lone `*` clears the file)
    #[arg(value_name = "PATTERN")]
    pub pattern: String,
}

/// Arguments for the dump subcommand.
#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Resource file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Leave out comments and blank lines
    #[arg(long)]
    pub keys_only: bool,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the info subcommand.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Resource file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the description as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the style subcommand.
#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Style file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Item key, e.g. `toolbar.appearance` or legacy `toolbar`
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Print the item as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the configuration file
    #[arg(long)]
    pub save: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_help() {
        let result = Cli::try_parse_from(["rcdb", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_get() {
        let cli = Cli::try_parse_from(["rcdb", "get", "blackbox.rc", "menu.font"]).unwrap();
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.file, PathBuf::from("blackbox.rc"));
                assert_eq!(args.key, "menu.font");
                assert!(!args.all);
                assert!(args.default.is_none());
            }
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_cli_parse_get_all_with_default() {
        let cli = Cli::try_parse_from([
            "rcdb",
            "get",
            "plugins.rc",
            "bbKeys.key",
            "--all",
            "--default",
            "none",
        ])
        .unwrap();
        match cli.command {
            Commands::Get(args) => {
                assert!(args.all);
                assert_eq!(args.default.as_deref(), Some("none"));
            }
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_cli_parse_set() {
        let cli = Cli::try_parse_from(["rcdb", "set", "a.rc", "x.y", "two words"]).unwrap();
        match cli.command {
            Commands::Set(args) => {
                assert_eq!(args.key, "x.y");
                assert_eq!(args.value, "two words");
            }
            _ => panic!("Expected Set command"),
        }
    }

    #[test]
    fn test_cli_set_requires_value() {
        assert!(Cli::try_parse_from(["rcdb", "set", "a.rc", "x.y"]).is_err());
    }

    #[test]
    fn test_cli_global_store_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rcdb",
            "set",
            "a.rc",
            "k",
            "v",
            "--line-ending",
            "crlf",
            "--tabify",
            "--max-cached-files",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.store.line_ending, Some(LineEndingArg::Crlf));
        assert!(cli.store.tabify);
        assert_eq!(cli.store.max_cached_files, Some(0));
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["rcdb", "-v", "-q", "info", "a.rc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_count() {
        let cli = Cli::try_parse_from(["rcdb", "-vv", "dump", "a.rc"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_parse_delete_and_rename() {
        let cli = Cli::try_parse_from(["rcdb", "delete", "a.rc", "bbSlit.*"]).unwrap();
        assert!(matches!(cli.command, Commands::Delete(ref a) if a.pattern == "bbSlit.*"));

        let cli = Cli::try_parse_from(["rcdb", "rename", "a.rc", "old", "new"]).unwrap();
        assert!(matches!(cli.command, Commands::Rename(ref a) if a.new_key == "new"));
    }

    #[test]
    fn test_line_ending_arg_conversion() {
        assert_eq!(LineEnding::from(LineEndingArg::Lf), LineEnding::Lf);
        assert_eq!(LineEnding::from(LineEndingArg::Crlf), LineEnding::Crlf);
    }
}
