//! Timetable checker command-line front-end.
//!
//! # Usage
//!
//! ```bash
//! # Check a workbook with the default parameters
//! timetable-check check timetable.xlsx
//!
//! # Override analysis parameters and write both outputs to files
//! timetable-check check timetable.xlsx --min-days 2 --target-periods 1,7 \
//!   --output report.txt --json-output summary.json
//!
//! # Run the built-in sample timetable
//! timetable-check self-test
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info, or debug with `--verbose`)

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use timetable_checker::config::CheckerConfig;
use timetable_checker::error::TimetableError;
use timetable_checker::preprocessing::TimetableChecker;
use timetable_checker::services::{
    format_report, run_self_test, write_json_output, write_text_output,
};

/// Flags teacher timetables that match structural load patterns
#[derive(Parser, Debug)]
#[command(name = "timetable-check", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a timetable workbook (.xlsx / .xlsm)
    Check(CheckArgs),

    /// Run the built-in sample timetable through the pipeline
    SelfTest,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Workbook to check
    file: PathBuf,

    /// TOML configuration file (default: timetable.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum number of days for the breadth patterns
    #[arg(long)]
    min_days: Option<usize>,

    /// Length of the identical-class run to look for
    #[arg(long)]
    consecutive: Option<usize>,

    /// Periods that must all be taught on a day (comma-separated)
    #[arg(long, value_delimiter = ',')]
    target_periods: Option<Vec<u8>>,

    /// Skip the period-7 pattern
    #[arg(long)]
    no_period7: bool,

    /// Print the JSON summary instead of the text report
    #[arg(long)]
    json: bool,

    /// Write the text report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the JSON summary to this file
    #[arg(long)]
    json_output: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default_level),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &CheckArgs) -> Result<CheckerConfig> {
    let mut config = match &args.config {
        Some(path) => CheckerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CheckerConfig::from_default_location()?.unwrap_or_default(),
    };

    let analysis = &mut config.analysis;
    if let Some(min_days) = args.min_days {
        analysis.min_days = min_days;
    }
    if let Some(length) = args.consecutive {
        analysis.consecutive_length = length;
    }
    if let Some(periods) = &args.target_periods {
        analysis.target_periods = periods.clone();
    }
    if args.no_period7 {
        analysis.check_period7 = false;
    }

    Ok(config)
}

fn run_check(args: &CheckArgs) -> Result<()> {
    let config = load_config(args)?;
    let outcome = TimetableChecker::with_config(config).check_file(&args.file)?;

    let json_to_stdout = args.json && args.json_output.is_none();
    if !json_to_stdout || args.output.is_some() {
        let report = format_report(&outcome.messages());
        write_text_output(&report, args.output.as_deref())?;
    }
    if args.json || args.json_output.is_some() {
        write_json_output(outcome.summaries(), args.json_output.as_deref())?;
    }
    Ok(())
}

fn run_self_check() -> Result<()> {
    let outcome = run_self_test().context("Self-test failed")?;
    write_text_output(&format_report(&outcome.messages()), None::<&Path>)?;
    write_text_output("자체 테스트가 통과했습니다.", None::<&Path>)?;
    info!("Self-test OK");
    Ok(())
}

/// Extra line for errors caused by the sheet layout or the parameters.
fn structural_hint(e: &anyhow::Error) -> Option<&'static str> {
    let err = e.chain().find_map(|c| c.downcast_ref::<TimetableError>())?;
    if !err.is_structural() {
        return None;
    }
    Some(match err {
        TimetableError::LayoutError(_) => {
            "Check that the weekday labels sit in the [layout] header_row of the sheet."
        }
        _ => "Check the [analysis] values in the config file and the command-line overrides.",
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Check(args) => run_check(args),
        Command::SelfTest => run_self_check(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = structural_hint(&e) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_check_flags() {
        let cli = Cli::try_parse_from([
            "timetable-check",
            "check",
            "t.xlsx",
            "--min-days",
            "2",
            "--target-periods",
            "1,7",
            "--no-period7",
            "--json",
        ])
        .unwrap();

        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.file, PathBuf::from("t.xlsx"));
        assert_eq!(args.min_days, Some(2));
        assert_eq!(args.target_periods, Some(vec![1, 7]));
        assert!(args.no_period7);
        assert!(args.json);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("timetable.toml");
        std::fs::write(&path, "[analysis]\nmin_days = 4\nconsecutive_length = 3\n").unwrap();

        let cli = Cli::try_parse_from([
            "timetable-check",
            "check",
            "t.xlsx",
            "--config",
            path.to_str().unwrap(),
            "--min-days",
            "2",
        ])
        .unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };

        let config = load_config(&args).unwrap();
        assert_eq!(config.analysis.min_days, 2);
        assert_eq!(config.analysis.consecutive_length, 3);
        assert!(config.analysis.check_period7);
    }

    #[test]
    fn test_self_test_subcommand() {
        let cli = Cli::try_parse_from(["timetable-check", "--verbose", "self-test"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::SelfTest));
    }

    #[test]
    fn test_structural_errors_get_a_hint() {
        let layout = anyhow::Error::from(TimetableError::LayoutError("no weekday headers".into()))
            .context("Failed to check t.xlsx");
        assert!(structural_hint(&layout).unwrap().contains("header_row"));

        let config = anyhow::Error::from(TimetableError::ConfigurationError("min_days".into()));
        assert!(structural_hint(&config).unwrap().contains("[analysis]"));

        let io = anyhow::Error::from(TimetableError::WorkbookError("bad zip".into()))
            .context("Failed to read workbook t.xlsx");
        assert!(structural_hint(&io).is_none());
        assert!(structural_hint(&anyhow::anyhow!("plain")).is_none());
    }
}
