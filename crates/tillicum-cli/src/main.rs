//! Tillicum CLI application
//!
//! Smoke tests for cluster job-array elements: report the runtime, detect
//! accelerators, run a bounded matmul and write a per-task result file.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use console::style;
use std::io;
use std::path::PathBuf;
use tillicum_common::{ConfigBuilder, LogFormat, TillicumConfig};
use tracing::{debug, error};

use tillicum_cli::commands::{ConfigAction, DemoCommand, InfoCommand, RunCommand};
use tillicum_cli::exit::{exit_code_for, EXIT_SUCCESS};
use tillicum_cli::logging::setup_logging;

/// Tillicum - cluster job-array smoke tests
#[derive(Parser)]
#[command(name = "tillicum")]
#[command(about = "Smoke tests for GPU cluster job arrays")]
#[command(long_about = r#"
Tillicum checks that a cluster allocation is usable: it reports the runtime,
detects attached GPUs, runs a bounded matrix product selected by the job-array
index and writes the timing to a per-task result file.

Examples:
  # One element of a Slurm job array
  tillicum run

  # Force a task index and a small matrix
  tillicum run --task-id 3 --matrix-size 512 --results-dir ./logs

  # Quick onboarding check
  tillicum demo --sleep-secs 0

  # Inspect the node
  tillicum info --json
"#)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format (pretty, compact, json)
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the matmul smoke test for one job-array element
    Run(RunCommand),

    /// Report the runtime and detected GPUs, then sleep briefly
    Demo(DemoCommand),

    /// Show system information
    Info(InfoCommand),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate_completions(shell);
        return;
    }

    let code = match run(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            report_error(&e);
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let config = load_configuration(&cli)?;
    setup_logging(&config.logging)?;
    debug!(?config, "effective configuration");

    match cli.command {
        Some(Commands::Run(cmd)) => cmd.execute(&config),
        Some(Commands::Demo(cmd)) => cmd.execute(),
        Some(Commands::Info(cmd)) => cmd.execute(&config),
        Some(Commands::Config { action }) => action.execute(&config, cli.config.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Defaults, then the config file, then the environment, then flags.
fn load_configuration(cli: &Cli) -> Result<TillicumConfig> {
    let mut builder = ConfigBuilder::load(cli.config.as_deref())?
        .with_env()?
        .log_level(cli.log_level.clone())
        .log_format(cli.log_format);

    if let Some(Commands::Run(cmd)) = &cli.command {
        builder = cmd.apply(builder);
    }

    Ok(builder.build()?)
}

/// Log the error and its causes.
///
/// Configuration errors can occur before the subscriber is installed; those
/// are written to stderr directly.
fn report_error(err: &anyhow::Error) {
    if tracing::dispatcher::has_been_set() {
        error!("Command failed: {}", err);
        for cause in err.chain().skip(1) {
            error!("  Caused by: {}", cause);
        }
    } else {
        eprintln!("{} {}", style("error:").red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("  Caused by: {cause}");
        }
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
