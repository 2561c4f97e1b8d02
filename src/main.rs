//! Binary entry point for the astobf CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Obfuscate a tree, writing the result to stdout
//! astobf run tree.json > obfuscated.json
//!
//! # Write the tree and the name map to files, report on stdout
//! astobf run tree.json -o obfuscated.json --map names.json --seed 42
//!
//! # Read the tree from stdin
//! python -c '...dump...' | astobf run -
//!
//! # List the names that are never renamed
//! astobf reserved
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use astobf::cli::{resolve_options, run_obfuscate, run_reserved, CliOverrides, RunOutputs};
use astobf::error::ObfuscateError;
use astobf::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Python syntax-tree identifier obfuscator.
///
/// Renames identifiers in a JSON-encoded Python syntax tree to generated
/// names built from confusable characters. All reports are JSON.
#[derive(Parser, Debug)]
#[command(name = "astobf", version, about = "Python syntax-tree identifier obfuscator")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (default: astobf.toml in the current directory, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Obfuscate the identifiers of one syntax tree.
    Run {
        /// Tree to read (JSON), or `-` for stdin.
        input: PathBuf,

        /// Write the rewritten tree here; a JSON report then goes to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the name map (JSON object, first-seen order) here.
        #[arg(long)]
        map: Option<PathBuf>,

        /// Seed for the name generator, for reproducible output.
        #[arg(long)]
        seed: Option<u64>,

        /// Also rename member names (`obj.attr`).
        #[arg(long)]
        rename_members: bool,

        /// Leave definition sites (def/class names, parameters, ...) untouched.
        #[arg(long)]
        keep_definitions: bool,

        /// Also rename names shared with class members or keyword arguments.
        #[arg(long)]
        rename_shared: bool,

        /// Names to leave untouched (repeatable).
        #[arg(long)]
        preserve: Vec<String>,
    },

    /// List the names that are never renamed.
    Reserved {
        /// Extra names to include in the listing (repeatable).
        #[arg(long)]
        preserve: Vec<String>,
    },
}

impl Command {
    fn overrides(&self) -> CliOverrides {
        match self {
            Command::Run {
                seed,
                rename_members,
                keep_definitions,
                rename_shared,
                preserve,
                ..
            } => CliOverrides {
                seed: *seed,
                rename_members: rename_members.then_some(true),
                rename_definitions: keep_definitions.then_some(false),
                pin_shared_names: rename_shared.then_some(false),
                preserve: preserve.clone(),
            },
            Command::Reserved { .. } => CliOverrides::default(),
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = err.error_code();
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), ObfuscateError> {
    match &cli.command {
        Command::Run {
            input, output, map, ..
        } => {
            let cwd = std::env::current_dir().map_err(|e| ObfuscateError::io(".", e))?;
            let overrides = cli.command.overrides();
            let options = resolve_options(cli.global.config.as_deref(), &cwd, &overrides)?;
            let outputs = RunOutputs {
                tree: output.clone(),
                map: map.clone(),
            };
            let text = run_obfuscate(input, &outputs, &options)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text).map_err(|e| ObfuscateError::io("<stdout>", e))?;
            stdout.flush().map_err(|e| ObfuscateError::io("<stdout>", e))
        }
        Command::Reserved { preserve } => {
            emit_response(&run_reserved(preserve), &mut io::stdout())
                .map_err(|e| ObfuscateError::io("<stdout>", e))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
