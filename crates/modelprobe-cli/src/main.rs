mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use modelprobe_backend_tf::TfBackend;
use modelprobe_core::ModelArtifact;
use modelprobe_runner::{default_plan, Outcome, PipelineError, Reporter, Runner, RunnerOptions};
use tracing_subscriber::EnvFilter;

/// Load failed; nothing was run.
const EXIT_LOAD_FAILED: u8 = 2;
/// The requested signature does not exist in the package.
const EXIT_NO_SIGNATURE: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let artifact = ModelArtifact::serving(&cli.model_dir).with_tags(cli.tags);
    let options = RunnerOptions {
        signature: cli.signature,
        plan: default_plan(),
        feeds: cli.feeds,
        fetches: cli.fetches,
    };
    let runner = Runner::new(TfBackend::new(), options);
    let mut reporter = Reporter::stdio();

    let status = exit_status(runner.execute(&artifact, &mut reporter))
        .context("failed to write report")?;
    Ok(ExitCode::from(status))
}

/// Process status for a finished pass. Only I/O failures are returned as
/// errors.
fn exit_status(result: Result<Outcome, PipelineError>) -> Result<u8, PipelineError> {
    match result {
        Ok(Outcome::Passed { .. }) => Ok(0),
        // A failed run is still a completed probe; the report says why.
        Ok(Outcome::RunFailed { .. }) => Ok(0),
        Err(PipelineError::Load(_)) => Ok(EXIT_LOAD_FAILED),
        Err(PipelineError::Signature(_)) => Ok(EXIT_NO_SIGNATURE),
        Err(err @ PipelineError::Io(_)) => Err(err),
    }
}
