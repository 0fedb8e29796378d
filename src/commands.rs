//! Subcommand handlers.
//!
//! Each handler opens its own [`RcStore`], performs one operation and
//! flushes before returning, so a failed write surfaces as an error instead
//! of a warning at drop time. Results go to the given writer; hints about
//! missing keys go to stderr.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use yansi::Paint;

use crate::api::{RcStore, StyleItem};
use crate::cache::SchemaVariant;
use crate::cli::{
    Commands, ConfigArgs, DeleteArgs, DumpArgs, GetArgs, InfoArgs, RenameArgs, SetArgs, StyleArgs,
};
use crate::config::Config;
use crate::error::ExitCode;

/// Number of similar keys offered when a lookup misses.
const SUGGESTION_LIMIT: usize = 3;

/// Run one subcommand.
///
/// # Arguments
///
/// * `command` - Parsed subcommand
/// * `config` - Effective configuration, CLI overrides applied
/// * `config_file` - Explicit configuration file, if one was given
/// * `out` - Destination for results
///
/// # Errors
///
/// Returns an error when a file cannot be read or written, or a key is
/// invalid.
pub fn execute(
    command: &Commands,
    config: &Config,
    config_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    if let Commands::Config(args) = command {
        return show_config(args, config, config_file, out);
    }

    let mut store = RcStore::new(config.store_options());
    let code = match command {
        Commands::Get(args) => get(&mut store, args, out)?,
        Commands::Set(args) => set(&mut store, args)?,
        Commands::Rename(args) => rename(&mut store, args)?,
        Commands::Delete(args) => delete(&mut store, args)?,
        Commands::Dump(args) => dump(&mut store, args, out)?,
        Commands::Info(args) => info(&mut store, args, out)?,
        Commands::Style(args) => style(&mut store, args, out)?,
        Commands::Config(_) => ExitCode::Success,
    };
    store.flush().context("Failed to save changes")?;
    Ok(code)
}

fn get(store: &mut RcStore, args: &GetArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let values: Vec<String> = if args.all {
        let mut values = Vec::new();
        let mut position = 0;
        while let Some(value) = store.read_value(&args.file, &args.key, Some(&mut position))? {
            values.push(value.to_string());
        }
        values
    } else {
        store
            .read(&args.file, &args.key)?
            .map(str::to_string)
            .into_iter()
            .collect()
    };

    if !values.is_empty() {
        for value in &values {
            writeln!(out, "{value}")?;
        }
        return Ok(ExitCode::Success);
    }
    if let Some(default) = &args.default {
        writeln!(out, "{default}")?;
        return Ok(ExitCode::Success);
    }

    eprintln!("Key not found: {}", args.key.bold());
    let suggestions = store.suggest_keys(&args.file, &args.key, SUGGESTION_LIMIT)?;
    if !suggestions.is_empty() {
        eprintln!("Did you mean:");
        for key in suggestions {
            eprintln!("  {}", key.cyan());
        }
    }
    Ok(ExitCode::NotFound)
}

fn set(store: &mut RcStore, args: &SetArgs) -> Result<ExitCode> {
    store
        .write(&args.file, &args.key, Some(&args.value))
        .with_context(|| format!("Failed to set '{}' in {}", args.key, args.file.display()))?;
    Ok(ExitCode::Success)
}

fn rename(store: &mut RcStore, args: &RenameArgs) -> Result<ExitCode> {
    let changed = store
        .rename(&args.file, &args.key, Some(&args.new_key))
        .with_context(|| format!("Failed to rename '{}' in {}", args.key, args.file.display()))?;
    Ok(changed_code(changed))
}

fn delete(store: &mut RcStore, args: &DeleteArgs) -> Result<ExitCode> {
    let changed = store
        .delete(&args.file, &args.pattern)
        .with_context(|| format!("Failed to delete '{}' in {}", args.pattern, args.file.display()))?;
    Ok(changed_code(changed))
}

fn changed_code(changed: bool) -> ExitCode {
    if changed {
        ExitCode::Success
    } else {
        ExitCode::NotFound
    }
}

/// One line of `dump --json` output.
#[derive(Debug, Serialize)]
struct DumpEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<&'a str>,
    value: &'a str,
}

fn dump(store: &mut RcStore, args: &DumpArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let file = store.file(&args.file)?;
    let entries = file
        .store()
        .iter()
        .filter(|e| !(args.keys_only && e.is_comment()));

    if args.json {
        let lines: Vec<DumpEntry<'_>> = entries
            .map(|e| DumpEntry {
                key: (!e.is_comment()).then(|| e.raw_key()),
                value: e.value(),
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&lines)?)?;
        return Ok(ExitCode::Success);
    }

    for entry in entries {
        if entry.is_comment() {
            writeln!(out, "{}", entry.value().dim())?;
        } else if entry.is_wildcard() {
            writeln!(out, "{}: {}", entry.raw_key().yellow(), entry.value())?;
        } else {
            writeln!(out, "{}: {}", entry.raw_key().cyan(), entry.value())?;
        }
    }
    Ok(ExitCode::Success)
}

/// Description printed by `info`.
#[derive(Debug, Serialize)]
struct FileInfo {
    path: PathBuf,
    exists: bool,
    schema: SchemaVariant,
    looks_like_style: bool,
    lines: usize,
    keys: usize,
    wildcards: usize,
}

fn info(store: &mut RcStore, args: &InfoArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let looks_like_style = store.looks_like_style_file(&args.file)?;
    let file = store.file(&args.file)?;
    let lines = file.store().len();
    let keys = file.store().iter().filter(|e| !e.is_comment()).count();
    let info = FileInfo {
        path: file.path().to_path_buf(),
        exists: !file.is_new_file(),
        schema: file.schema(),
        looks_like_style,
        lines,
        keys,
        wildcards: file.store().wildcard_ids().len(),
    };

    let code = if info.exists {
        ExitCode::Success
    } else {
        ExitCode::NotFound
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
        return Ok(code);
    }

    writeln!(out, "{}", info.path.display().bold())?;
    writeln!(out, "  exists:    {}", info.exists)?;
    writeln!(out, "  schema:    {}", schema_name(info.schema))?;
    writeln!(out, "  style:     {}", info.looks_like_style)?;
    writeln!(out, "  lines:     {}", info.lines)?;
    writeln!(out, "  keys:      {}", info.keys)?;
    writeln!(out, "  wildcards: {}", info.wildcards)?;
    Ok(code)
}

fn schema_name(schema: SchemaVariant) -> &'static str {
    match schema {
        SchemaVariant::Settings => "settings",
        SchemaVariant::LegacyStyle => "legacy style",
        SchemaVariant::Style => "style",
    }
}

fn style(store: &mut RcStore, args: &StyleArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let Some(description) = store.read(&args.file, &args.key)? else {
        eprintln!("Key not found: {}", args.key.bold());
        return Ok(ExitCode::NotFound);
    };
    let item = StyleItem::parse(description);

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&item)?)?;
        return Ok(ExitCode::Success);
    }
    writeln!(out, "texture:         {:?}", item.texture)?;
    writeln!(out, "bevel style:     {:?}", item.bevel_style)?;
    writeln!(out, "bevel position:  {:?}", item.bevel_position)?;
    writeln!(out, "interlaced:      {}", item.interlaced)?;
    writeln!(out, "parent relative: {}", item.parent_relative)?;
    Ok(ExitCode::Success)
}

fn show_config(
    args: &ConfigArgs,
    config: &Config,
    config_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    write!(out, "{}", toml::to_string_pretty(config)?)?;
    if args.save {
        let path = config_file
            .map(Path::to_path_buf)
            .or_else(Config::config_path)
            .context("No configuration directory available")?;
        config.save_to_path(&path)?;
        log::info!("Configuration saved to {}", path.display());
    }
    Ok(ExitCode::Success)
}
