use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::{env, fs};
use txn_report::config::Config;
use txn_report::engine::TransactionProcessor;
use txn_report::input::read_transactions;
use txn_report::report::write_reports;

fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()?;

    log::debug!("Application started");

    let (input, output_dir) = get_args()?;
    log::debug!("Extracted paths from args: input={input:?} output_dir={output_dir:?}");

    let config = Config::from_env().context("invalid configuration")?;

    log::debug!("Reading transactions: Starting");
    let transactions = read_transactions(&input)
        .with_context(|| format!("failed to read transactions from {}", input.display()))?;
    log::debug!("Reading transactions: Done ({} valid)", transactions.len());

    log::debug!("Transactions processing: Starting");
    let mut processor = TransactionProcessor::with_log_sink(config.suspicion);
    let result = processor.process(&transactions)?;
    log::debug!("Transactions processing: Done");

    log::debug!("Writing reports to {output_dir:?}: Starting");
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    write_reports(&result, &output_dir)?;
    log::debug!("Writing reports: Done");

    log::debug!("Application finished");

    Ok(())
}

/// `<input.csv|input.json> [output_dir]`, the output directory defaulting to `.`
fn get_args() -> Result<(PathBuf, PathBuf)> {
    let mut args = env::args_os().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("expected input file argument, but got none"))?;
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    Ok((input, output_dir))
}
