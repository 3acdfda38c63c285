use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use debris_runtime::EngineConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{HarnessError, Result};
use crate::scenario::{self, RunOptions, Scenario};

#[derive(Debug, Parser)]
#[command(
    name = "debris-harness",
    about = "Replay scripted scroll scenarios against the debris handoff engine",
    version
)]
pub struct Cli {
    /// Emit logs as JSON on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print built-in scenario names.
    List,

    /// Run one scenario and print its report.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Scenario name (see `list`).
    pub scenario: String,

    /// Engine config file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Virtual frame interval in milliseconds.
    #[arg(long, default_value_t = 16)]
    pub step_ms: u64,

    /// Print one JSON object per line instead of a single document.
    #[arg(long)]
    pub jsonl: bool,
}

impl RunArgs {
    pub fn options(&self) -> Result<RunOptions> {
        if self.step_ms == 0 {
            return Err(HarnessError::invalid("--step-ms must be at least 1"));
        }
        let config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        Ok(RunOptions {
            config,
            step: Duration::from_millis(self.step_ms),
        })
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List => {
            let mut out = std::io::stdout().lock();
            for scenario in Scenario::ALL {
                writeln!(out, "{:<18} {}", scenario.name(), scenario.description())?;
            }
            Ok(())
        }
        Commands::Run(args) => run_scenario(&args),
    }
}

/// Run, print the report, then fail if the scenario missed its expectations.
pub fn run_scenario(args: &RunArgs) -> Result<()> {
    let scenario: Scenario = args.scenario.parse()?;
    let options = args.options()?;
    let report = scenario::run(scenario, &options)?;
    let text = if args.jsonl {
        report.to_jsonl()?
    } else {
        report.to_json()? + "\n"
    };
    std::io::stdout().lock().write_all(text.as_bytes())?;

    let failures = scenario
        .expectations(&options.config)
        .check(&report, &options.config);
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::Expectation {
            scenario: scenario.name().to_owned(),
            failures,
        })
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the `debris=info`
/// default; a second call is a no-op.
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debris=info"));
    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}
