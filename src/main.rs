mod cli_logger;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use cli_logger::CliLogger;
use testprof::{
    DEFAULT_CONFIG_FILE, Profiler, ProfilerOptions, RunOutcome, SummaryStyle, load_snapshot,
    replay,
};
use tracing_subscriber::EnvFilter;

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "testprof", version, about = "Per-test wall-clock profiler")]
struct Cli {
    /// Print a machine-readable digest instead of the console summary.
    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a runner event log (JSON lines) and write reports.
    Run {
        /// Event log path, or `-` for stdin.
        #[arg(long, value_name = "PATH")]
        events: PathBuf,
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        #[command(flatten)]
        overrides: OptionOverrides,
        /// Do not write the structured report.
        #[arg(long, conflicts_with = "output")]
        no_output: bool,
    },
    /// Summarize a saved structured report, optionally against an older one.
    Show {
        snapshot: PathBuf,
        #[arg(long)]
        compare_with: Option<PathBuf>,
        #[arg(long)]
        html_output: Option<PathBuf>,
        #[arg(long)]
        threshold: Option<f64>,
    },
}

#[derive(Debug, clap::Args)]
struct OptionOverrides {
    /// Structured report destination.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Formatted report destination.
    #[arg(long)]
    html_output: Option<PathBuf>,
    /// Slow-test threshold in seconds.
    #[arg(long)]
    threshold: Option<f64>,
    /// Previous structured report to compare against.
    #[arg(long)]
    compare_with: Option<PathBuf>,
}

impl OptionOverrides {
    fn apply(&self, mut opts: ProfilerOptions) -> ProfilerOptions {
        if let Some(path) = &self.output {
            opts.output_path = Some(path.clone());
        }
        if let Some(path) = &self.html_output {
            opts.html_output = Some(path.clone());
        }
        if let Some(threshold) = self.threshold {
            opts.threshold = threshold;
        }
        if let Some(path) = &self.compare_with {
            opts.compare_with = Some(path.clone());
        }
        opts
    }
}

/// Config file values, then command-line overrides on top.
fn run_options(config: &Path, overrides: &OptionOverrides, no_output: bool) -> ProfilerOptions {
    let mut opts = overrides.apply(ProfilerOptions::load_optional(config));
    if no_output {
        opts.output_path = None;
    }
    opts
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let logger = CliLogger::new(cli.json, cli.no_color);
    match run(&cli, &logger) {
        Ok(outcome) if outcome.failures.is_empty() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            logger.print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, logger: &CliLogger) -> Result<RunOutcome> {
    let style = SummaryStyle {
        no_color: logger.no_color(),
    };
    match &cli.command {
        Command::Run {
            events,
            config,
            overrides,
            no_output,
        } => {
            let opts = run_options(config, overrides, *no_output);
            opts.validate()?;
            let threshold = opts.threshold;
            let mut profiler = Profiler::new(opts).with_style(style);
            let outcome = replay_events(events, &mut profiler)?;
            logger.print_outcome(&outcome, threshold)?;
            Ok(outcome)
        }

        Command::Show {
            snapshot,
            compare_with,
            html_output,
            threshold,
        } => {
            let opts = ProfilerOptions {
                output_path: None,
                html_output: html_output.clone(),
                threshold: threshold.unwrap_or(testprof::DEFAULT_THRESHOLD),
                compare_with: compare_with.clone(),
            };
            opts.validate()?;
            let data = load_snapshot(snapshot)?;
            let profiler = Profiler::new(opts.clone()).with_style(style);
            let data = match profiler.baseline() {
                Some(baseline) => data.compared_with(baseline),
                None => data,
            };
            let outcome = profiler.finish_with(data);
            logger.print_outcome(&outcome, opts.threshold)?;
            Ok(outcome)
        }
    }
}

fn replay_events(events: &Path, profiler: &mut Profiler) -> Result<RunOutcome> {
    if events == Path::new("-") {
        let stdin = std::io::stdin();
        return Ok(replay(stdin.lock(), events, profiler)?);
    }
    let file = std::fs::File::open(events)
        .with_context(|| format!("cannot open event log {}", events.display()))?;
    Ok(replay(BufReader::new(file), events, profiler)?)
}
