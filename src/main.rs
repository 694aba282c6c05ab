//! `meanprop` command-line front end.
//!
//! Logs go to stderr; stdout carries only the report, written in one piece
//! after every stage has succeeded.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use meanprop::compare::{self, DEFAULT_TOLERANCE};
use meanprop::{export, Engine, EngineConfig, Error, Result};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Propagate a graph file and print node, graph and edge scores
    Run(RunArgs),
    /// Compare two captured reports within an absolute tolerance
    Compare(CompareArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Graph description file
    graph: PathBuf,

    /// Output feature dimension (read from stdin when not given anywhere)
    #[arg(long, env = "MEANPROP_OUT_DIM")]
    out_dim: Option<usize>,

    /// Threshold for binary labels
    #[arg(long, env = "MEANPROP_THRESHOLD")]
    threshold: Option<f64>,

    /// Fractional digits in the text report
    #[arg(long)]
    precision: Option<usize>,

    /// JSON configuration file
    #[arg(long, env = "MEANPROP_CONFIG")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(clap::Args, Debug)]
struct CompareArgs {
    left: PathBuf,
    right: PathBuf,

    /// Absolute tolerance for every compared value
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Install the global subscriber. `MEANPROP_LOG_FORMAT=json` switches to
/// JSON lines; the level comes from `RUST_LOG` (default warn).
fn init_tracing() {
    let use_json = std::env::var("MEANPROP_LOG_FORMAT").is_ok_and(|v| v == "json");
    let filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().flatten_event(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

/// The reference programs prompt for the output dimension.
fn read_out_dim(input: &mut dyn BufRead) -> Result<usize> {
    eprint!("Enter output feature dimension: ");
    let mut line = String::new();
    input.read_line(&mut line)?;
    let trimmed = line.trim();
    trimmed
        .parse()
        .map_err(|_| Error::Config(format!("invalid output dimension '{trimmed}'")))
}

fn run_graph(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if args.out_dim.is_some() {
        config.out_dim = args.out_dim;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    if config.resolved_out_dim().is_none() {
        config.out_dim = Some(read_out_dim(&mut std::io::stdin().lock())?);
    }

    let engine = Engine::new(config)?;
    let output = engine.run_file(&args.graph)?;

    let rendered = match args.format {
        OutputFormat::Text => engine.render(&output)?,
        OutputFormat::Json => {
            let mut buf = Vec::new();
            export::write_json(&output, &mut buf)?;
            String::from_utf8_lossy(&buf).into_owned()
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<()> {
    let left = std::fs::read_to_string(&args.left)?;
    let right = std::fs::read_to_string(&args.right)?;
    compare::compare_text(&left, &right, args.tolerance)?;
    info!(left = %args.left.display(), right = %args.right.display(), "reports agree");
    println!("Outputs are consistent.");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => run_graph(args),
        Command::Compare(args) => run_compare(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ Error::Mismatch(_)) => {
            error!(%err, "comparison failed");
            eprintln!("Outputs are DIFFERENT: {err}");
            ExitCode::from(1)
        }
        Err(err) => {
            error!(%err, "run failed");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}
