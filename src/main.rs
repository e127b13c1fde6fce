//! rcl-logging CLI
//!
//! Drives the logging backends from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Print the resolved log directory
//! rcl-logging dir
//!
//! # Log two messages through the file backend
//! rcl-logging emit --prefix talker "hello" "world"
//!
//! # Hierarchy backend with a config file, logging stdin lines as WARN
//! tail -f events | rcl-logging emit --backend hierarchy --config logging.toml \
//!     --name robot.arm --severity warn
//!
//! # Forward to tracing, letting DEBUG through for the root logger
//! rcl-logging -v emit --backend tracing --level debug "calibrated"
//! ```
//!
//! The process exits with the numeric status code of the first failing step
//! (for example 2 for ERROR, 21 when the config file does not exist).

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use rcl_logging_file::FileBackend;
use rcl_logging_hierarchy::HierarchyBackend;
use rcl_logging_interface::{
    logging_directory, InitStatus, Level, LoggingBackend, RetCode, Severity,
};
use rcl_logging_tracing::{TracingBackend, EVENT_TARGET};

/// Pluggable logging backends for the robot client library
#[derive(Parser)]
#[command(name = "rcl-logging")]
#[command(version = "0.1.0")]
#[command(about = "Pluggable logging backends for the robot client library")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved log directory
    Dir,

    /// Initialize a backend and log messages through it
    Emit(EmitArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendKind {
    /// Per-process log file, optionally rotated
    File,
    /// Named loggers configured from a TOML file
    Hierarchy,
    /// Forward to the tracing subscriber on stderr
    Tracing,
}

#[derive(Args)]
struct EmitArgs {
    /// Backend to log through
    #[arg(short, long, value_enum, default_value_t = BackendKind::File)]
    backend: BackendKind,

    /// Backend configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log file name prefix (default: executable name)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Logger name (default: root)
    #[arg(short, long)]
    name: Option<String>,

    /// Threshold to set on the logger before logging (name or integer)
    #[arg(short, long, value_parser = parse_severity)]
    level: Option<i32>,

    /// Severity of the messages (name or integer)
    #[arg(short, long, value_parser = parse_severity, default_value = "info")]
    severity: i32,

    /// Messages to log; read from stdin, one per line, when omitted
    messages: Vec<String>,
}

/// Accept a level name or a raw integer; names map to their severity value.
fn parse_severity(s: &str) -> Result<i32, String> {
    if let Ok(raw) = s.trim().parse::<i32>() {
        return Ok(raw);
    }
    if s.trim().eq_ignore_ascii_case("unset") {
        return Ok(Severity::Unset.as_raw());
    }
    Level::parse(s)
        .map(|level| level.severity().as_raw())
        .ok_or_else(|| format!("unknown severity '{}'", s))
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Forwarded messages are already filtered by the backend's own thresholds.
    let filter = format!("{},{}=trace", filter, EVENT_TARGET);

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn print_directory() -> RetCode {
    match logging_directory() {
        Ok(dir) => {
            println!("{}", dir.display());
            RetCode::Ok
        }
        Err(e) => {
            eprintln!("error: {}", e);
            e.code()
        }
    }
}

fn read_messages(args: &EmitArgs) -> Result<Vec<String>> {
    if !args.messages.is_empty() {
        return Ok(args.messages.clone());
    }
    io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read messages from stdin")
}

/// Run one initialize / log / shutdown cycle against `backend`.
fn emit<B: LoggingBackend>(backend: &B, args: &EmitArgs) -> Result<RetCode> {
    let messages = read_messages(args)?;
    let name = args.name.as_deref();

    let status = match backend.initialize(args.config.as_deref(), args.prefix.as_deref()) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("error: {} backend: {}", backend.name(), e);
            return Ok(e.code());
        }
    };
    if let InitStatus::Defaulted { code, reason } = &status {
        eprintln!("warning: {} ({}); using defaults", reason, code);
    }

    if let Some(level) = args.level {
        backend.set_logger_level(name, level)?;
    }
    for msg in &messages {
        backend.log(args.severity, name, msg);
    }
    debug!(backend = backend.name(), count = messages.len(), "Messages logged");

    if let Err(e) = backend.shutdown() {
        eprintln!("error: {} backend: {}", backend.name(), e);
        return Ok(e.code());
    }
    Ok(status.code())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let code = match cli.command {
        Commands::Dir => print_directory(),
        Commands::Emit(args) => match args.backend {
            BackendKind::File => emit(&FileBackend::default(), &args)?,
            BackendKind::Hierarchy => emit(&HierarchyBackend::default(), &args)?,
            BackendKind::Tracing => emit(&TracingBackend::new(), &args)?,
        },
    };

    if code != RetCode::Ok {
        std::process::exit(code.as_raw());
    }
    Ok(())
}
