//! Selftest CLI
//!
//! Builds a suite from inline cases, case files and auto discovery, runs it
//! through the engine, and prints the engine's result as JSON.

use anyhow::{Context, bail};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use selftest_case::Suite;
use selftest_runner::{DEFAULT_CACHE_DIR, EngineCommand, RunOptions, RunReport, Runner};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout carries only the result JSON
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let matches = cli().get_matches();

    match execute(&matches) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("selftest: {e:#}");
            process::exit(1);
        }
    }
}

fn cli() -> Command {
    Command::new("selftest")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run script test cases through an external engine")
        .arg(
            Arg::new("dev")
                .long("dev")
                .action(ArgAction::SetTrue)
                .help("Run the engine in development mode"),
        )
        .arg(
            Arg::new("keep-cache")
                .long("keep-cache")
                .action(ArgAction::SetTrue)
                .help("Keep request and result files in the cache directory"),
        )
        .arg(
            Arg::new("auto-dir")
                .long("auto-dir")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Discover cases from a script file or directory"),
        )
        .arg(
            Arg::new("cases")
                .long("cases")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Append)
                .help("Load cases from a JSON file of {name, code} records"),
        )
        .arg(
            Arg::new("case")
                .long("case")
                .value_name("NAME=CODE")
                .action(ArgAction::Append)
                .help("Register an inline case"),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(DEFAULT_CACHE_DIR)
                .help("Directory for request and result files"),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .value_name("PROGRAM")
                .default_value("node")
                .help("Engine executable"),
        )
        .arg(
            Arg::new("engine-arg")
                .long("engine-arg")
                .value_name("ARG")
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .help("Argument passed to the engine before the request file (core.cjs when no engine is given)"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Print a one-line summary to stderr"),
        )
}

fn execute(matches: &ArgMatches) -> Result<i32, anyhow::Error> {
    let suite = build_suite(matches)?;
    let options = run_options(matches);

    let result = Runner::new(options)
        .run(&suite)
        .context("test run failed")?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    // Results that don't follow the report layout are passed through as-is
    let Ok(report) = RunReport::from_value(result) else {
        return Ok(0);
    };

    if matches.get_flag("summary") {
        let summary = report.summary;
        eprintln!(
            "{} total, {} passed, {} failed ({} ms)",
            summary.total, summary.passed, summary.failed, summary.duration_ms
        );
    }

    Ok(if report.all_passed() { 0 } else { 1 })
}

fn build_suite(matches: &ArgMatches) -> Result<Suite, anyhow::Error> {
    let mut suite = Suite::new();

    for entry in matches.get_many::<String>("case").into_iter().flatten() {
        let (name, code) = parse_inline_case(entry)?;
        suite.register(name, code);
    }

    for file in matches.get_many::<PathBuf>("cases").into_iter().flatten() {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("cannot read {}", file.display()))?;
        let loaded = Suite::from_json(&content)
            .with_context(|| format!("cannot load cases from {}", file.display()))?;
        suite.extend(loaded);
    }

    if let Some(dir) = matches.get_one::<PathBuf>("auto-dir") {
        let discovered = selftest_discovery::discover(dir)?;
        tracing::info!(count = discovered.len(), "discovered cases");
        suite.extend(discovered);
    }

    Ok(suite)
}

fn run_options(matches: &ArgMatches) -> RunOptions {
    let mut options = RunOptions::new()
        .dev(matches.get_flag("dev"))
        .keep_artifacts(matches.get_flag("keep-cache"))
        .engine(engine_command(matches));
    if let Some(dir) = matches.get_one::<PathBuf>("cache-dir") {
        options = options.cache_dir(dir);
    }
    options
}

/// `core.cjs` is only implied when neither the engine nor its arguments were given
fn engine_command(matches: &ArgMatches) -> EngineCommand {
    let explicit_engine = matches.value_source("engine") == Some(ValueSource::CommandLine);
    let leading: Vec<&String> = matches
        .get_many::<String>("engine-arg")
        .into_iter()
        .flatten()
        .collect();

    if !explicit_engine && leading.is_empty() {
        return EngineCommand::default();
    }

    let program = matches
        .get_one::<String>("engine")
        .map_or("node", String::as_str);
    leading
        .into_iter()
        .fold(EngineCommand::new(program), |engine, arg| engine.arg(arg))
}

/// `NAME=CODE`, split at the first `=`
fn parse_inline_case(entry: &str) -> Result<(&str, &str), anyhow::Error> {
    let Some((name, code)) = entry.split_once('=') else {
        bail!("invalid case {entry:?}: expected NAME=CODE");
    };
    Ok((name, code))
}
