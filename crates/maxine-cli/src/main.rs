//! `maxine`: inspect and edit raw f32 tensor dumps.
//!
//! With no `--exec` lines the editor runs interactively. With `--exec`
//! each line is run headless in order and results go to stdout.

#![forbid(unsafe_code)]

mod batch;
mod error;
mod logging;
mod render;
mod terminal;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use maxine_arena::ArenaConfig;
use maxine_editor::{catalog, EditorConfig, Session};
use maxine_tensor::Shape;
use tracing::debug;

use crate::error::{CliError, Result};

/// Maxine tensor editor.
#[derive(Parser, Debug)]
#[command(name = "maxine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raw native-endian f32 dump to open. Its size must match --shape.
    dump: Option<PathBuf>,

    /// Tensor shape as up to three dimensions (depth, rows, cols).
    #[arg(long, num_args = 1..=3, value_names = ["D", "H", "W"], default_values_t = [3usize, 8, 8])]
    shape: Vec<usize>,

    /// Arena size in megabytes.
    #[arg(long, default_value_t = 10)]
    arena_mb: usize,

    /// Run a command headless (repeatable), e.g. --exec "stats".
    #[arg(short = 'x', long = "exec", value_name = "COMMAND")]
    exec: Vec<String>,

    /// Print the command catalog as JSON and exit.
    #[arg(long)]
    agent_capabilities: bool,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init_tracing(cli.verbose)?;
    debug!(?cli, "arguments");

    if cli.agent_capabilities {
        println!("{}", catalog().capabilities().to_json()?);
        return Ok(());
    }

    let shape = Shape::from_dims(&cli.shape)?;
    let config = EditorConfig {
        arena: ArenaConfig::with_megabytes(cli.arena_mb),
        ..EditorConfig::default()
    };
    let mut session = match &cli.dump {
        Some(path) => Session::open(config, path, shape)?,
        None => Session::new(config, shape)?,
    };

    if cli.exec.is_empty() {
        return terminal::run(&mut session);
    }

    let summary = batch::run_batch(
        &mut session,
        &cli.exec,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;
    if summary.failed > 0 {
        return Err(CliError::BatchFailed {
            failed: summary.failed,
            total: summary.total,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["maxine"]).unwrap();
        assert_eq!(cli.shape, vec![3, 8, 8]);
        assert_eq!(cli.arena_mb, 10);
        assert!(cli.dump.is_none());
        assert!(cli.exec.is_empty());
    }

    #[test]
    fn shape_and_exec() {
        let cli = Cli::try_parse_from([
            "maxine", "w.bin", "--shape", "1", "128", "128", "-x", "stats", "--exec", "hist",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.dump, Some(PathBuf::from("w.bin")));
        assert_eq!(cli.shape, vec![1, 128, 128]);
        assert_eq!(cli.exec, vec!["stats", "hist"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn shape_takes_at_most_three() {
        assert!(Cli::try_parse_from(["maxine", "--shape", "1", "2", "3", "4"]).is_err());
    }
}
