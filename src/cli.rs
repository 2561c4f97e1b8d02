//! CLI front door.
//!
//! Provides the command-line helpers behind the `astobf` binary:
//! - `run` - Obfuscate one syntax tree and report the name map
//! - `reserved` - List the names a run never renames
//!
//! ## Configuration Layering
//!
//! Options are resolved from built-in defaults, then an `astobf.toml` file
//! (explicit `--config`, or the one in the working directory), then flags.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, ObfuscateError>`. The error carries a
//! stable code used both in the JSON error response and as the exit code.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use astobf_ast::{dump_module, load_module, load_module_from_reader, LoadError, Module};
use astobf_core::config::Config;
use astobf_core::output::{ObfuscateResponse, ReservedResponse};
use astobf_core::{obfuscate_module, ObfuscateError, ObfuscateOptions, ReservedNames};
use tracing::{debug, info};

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

/// Flag values that override the configuration file.
///
/// `None` leaves the configured value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub seed: Option<u64>,
    pub rename_members: Option<bool>,
    pub rename_definitions: Option<bool>,
    pub pin_shared_names: Option<bool>,
    /// Appended to the configured `preserve` list.
    pub preserve: Vec<String>,
}

/// Where a run writes its results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutputs {
    /// File for the rewritten tree. Without it the tree goes to stdout.
    pub tree: Option<PathBuf>,
    /// File for the name map.
    pub map: Option<PathBuf>,
}

/// Resolve options from defaults, a config file and flag overrides.
///
/// With `config_path` set the file must exist; otherwise `astobf.toml` in
/// `dir` is used when present.
pub fn resolve_options(
    config_path: Option<&Path>,
    dir: &Path,
    overrides: &CliOverrides,
) -> Result<ObfuscateOptions, ObfuscateError> {
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(dir)?,
    };
    let mut options = config.obfuscate;

    if let Some(seed) = overrides.seed {
        options.seed = Some(seed);
    }
    if let Some(rename_members) = overrides.rename_members {
        options.rename_members = rename_members;
    }
    if let Some(rename_definitions) = overrides.rename_definitions {
        options.rename_definitions = rename_definitions;
    }
    if let Some(pin_shared_names) = overrides.pin_shared_names {
        options.pin_shared_names = pin_shared_names;
    }
    options.preserve.extend(overrides.preserve.iter().cloned());

    options.validate()?;
    debug!(?options, "resolved options");
    Ok(options)
}

/// Read a tree from `input`, or from stdin when it is `-`.
pub fn read_module(input: &Path) -> Result<Module, ObfuscateError> {
    if input == Path::new(STDIN_PATH) {
        return Ok(load_module_from_reader(io::stdin().lock())?);
    }
    let json = fs::read_to_string(input).map_err(|e| ObfuscateError::io(input, e))?;
    Ok(load_module(&json)?)
}

/// Obfuscate the tree at `input`.
///
/// # Returns
///
/// The text for stdout: the rewritten tree when `outputs.tree` is unset,
/// otherwise the JSON response describing the run.
pub fn run_obfuscate(
    input: &Path,
    outputs: &RunOutputs,
    options: &ObfuscateOptions,
) -> Result<String, ObfuscateError> {
    let mut module = read_module(input)?;
    info!(input = %input.display(), statements = module.body.len(), "loaded tree");

    let report = obfuscate_module(&mut module, options)?;
    let tree = dump_module(&module)?;
    let map = serde_json::to_string_pretty(&report.name_map).map_err(LoadError::from)?;
    let entries = report.name_map.len();

    // Everything is serialized before the first write.
    let stdout = match &outputs.tree {
        Some(tree_path) => {
            let response =
                ObfuscateResponse::new(report, Some(tree_path.display().to_string()));
            serde_json::to_string_pretty(&response).map_err(LoadError::from)?
        }
        None => tree.clone(),
    };

    if let Some(tree_path) = &outputs.tree {
        write_file(tree_path, &tree)?;
    }
    if let Some(map_path) = &outputs.map {
        if let Err(err) = write_file(map_path, &map) {
            if let Some(tree_path) = &outputs.tree {
                let _ = fs::remove_file(tree_path);
            }
            return Err(err);
        }
        info!(path = %map_path.display(), entries, "wrote name map");
    }
    Ok(stdout)
}

/// List every explicitly reserved name, plus `extra`.
pub fn run_reserved(extra: &[String]) -> ReservedResponse {
    let reserved = ReservedNames::with_extra(extra.iter().cloned());
    ReservedResponse::new(reserved.sorted().into_iter().map(str::to_string).collect())
}

fn write_file(path: &Path, contents: &str) -> Result<(), ObfuscateError> {
    let mut text = contents.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    fs::write(path, text).map_err(|e| ObfuscateError::io(path, e))
}
