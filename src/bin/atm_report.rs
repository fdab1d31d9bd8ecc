//! ATM Options report
//!
//! Command-line report: fetches a snapshot, analyses the ATM call and/or put
//! and prints market vs. model.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use atm_options::logging::init_logging;
use atm_options::prelude::*;
use atm_options::report::{error_message, JsonReport, TextReport};

/// Black-Scholes-Merton analysis of the at-the-money option for a ticker.
#[derive(Parser)]
#[command(name = "atm-report")]
#[command(version)]
#[command(about = "Price the ATM option of a ticker and compare it with the market")]
struct Cli {
    /// Ticker symbol
    #[arg(default_value = "AAPL")]
    ticker: String,

    /// Expiry date (YYYY-MM-DD); defaults to the nearest listed expiry
    #[arg(short, long)]
    expiry: Option<NaiveDate>,

    /// Which side to analyse
    #[arg(short, long, value_enum, default_value = "both")]
    side: SideArg,

    /// Risk-free rate override (0.04 = 4%)
    #[arg(long)]
    rate: Option<f64>,

    /// Dividend yield override (0.01 = 1%)
    #[arg(long)]
    dividend: Option<f64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Call,
    Put,
    Both,
}

impl SideArg {
    fn sides(self) -> Vec<OptionType> {
        match self {
            SideArg::Call => vec![OptionType::Call],
            SideArg::Put => vec![OptionType::Put],
            SideArg::Both => OptionType::both().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    }
    .with_overrides(cli.rate, cli.dividend)?;

    let ticker = cli.ticker.trim().to_uppercase();
    let client = YahooClient::new(&config.data)?;
    let snapshot = client.snapshot(&ticker, cli.expiry)?;

    let now = chrono::Local::now().naive_local();
    let results: Vec<AnalysisResult<Analysis>> = cli
        .side
        .sides()
        .into_iter()
        .map(|side| analyze(&snapshot, side, &config.market, now))
        .collect();

    match cli.format {
        OutputFormat::Text => println!("{}", TextReport::new(&snapshot, &results)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&JsonReport::new(&snapshot, &results))?
        ),
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AnalysisError>() {
                Some(err) => {
                    tracing::error!(kind = err.kind(), "{}", err);
                    eprintln!("Error: {}", error_message(err));
                    eprintln!("Please check the ticker symbol and try again.");
                }
                None => eprintln!("Error: {}", e),
            }
            ExitCode::FAILURE
        }
    }
}
