use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::generator::project::{print_report, run_generation, RunOptions};
use crate::settings::discover_settings;

/// Command-line interface for modgen
///
/// Expands `.config` module descriptions and partial `._hpp`/`._cpp`
/// templates into complete C++ modules.
#[derive(Parser, Debug)]
#[command(name = "modgen")]
#[command(about = "Declarative C++ module code generator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Source tree and output options shared by every command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RunInputs {
    /// Generate in place: source and destination are both this directory
    #[arg(long, conflicts_with_all = ["source", "destination"], required_unless_present = "source")]
    pub dir: Option<PathBuf>,

    /// Root of the module source tree
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Root of the output tree (defaults to the source root)
    #[arg(long)]
    pub destination: Option<PathBuf>,

    /// Generator settings file (defaults to <source>/modgen.toml when present)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Template for the aggregate variable header
    /// (defaults to <source>/variable/variable._hpp when present)
    #[arg(long)]
    pub variable_template: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl RunInputs {
    /// `(source, destination)` after applying `--dir` and the defaults.
    pub fn roots(&self) -> anyhow::Result<(PathBuf, PathBuf)> {
        if let Some(dir) = &self.dir {
            return Ok((dir.clone(), dir.clone()));
        }
        let source = self
            .source
            .clone()
            .context("either --dir or --source is required")?;
        let destination = self.destination.clone().unwrap_or_else(|| source.clone());
        Ok((source, destination))
    }

    fn to_options(&self, dry_run: bool) -> anyhow::Result<RunOptions> {
        let (source, destination) = self.roots()?;
        let settings = discover_settings(&source, self.settings.as_deref())?;
        Ok(RunOptions {
            source,
            destination,
            dry_run,
            jobs: self.jobs,
            variable_template: self.variable_template.clone(),
            settings,
        })
    }
}

/// Available modgen commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate every module under the source tree
    Generate {
        #[command(flatten)]
        inputs: RunInputs,
    },
    /// Validate configs and templates and render everything without writing
    Check {
        #[command(flatten)]
        inputs: RunInputs,
    },
}

/// Execute a parsed command line.
///
/// Per-module failures are reported and turned into the exit code; only a
/// run that cannot start (bad settings, missing source tree) is an `Err`.
pub fn run_cli(cli: Cli) -> anyhow::Result<ExitCode> {
    let (inputs, dry_run) = match &cli.command {
        Commands::Generate { inputs } => (inputs, false),
        Commands::Check { inputs } => (inputs, true),
    };
    let options = inputs.to_options(dry_run)?;
    info!(
        source = %options.source.display(),
        dry_run,
        "running modgen"
    );

    let report = run_generation(&options)?;
    print_report(&report);
    Ok(ExitCode::from(report.exit_code()))
}
