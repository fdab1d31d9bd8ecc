//! Report formatting
//!
//! Plain-text and JSON renderings of analysis results, plus the user-facing
//! message for each error kind. Formatting only; no numbers are computed here.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::Analysis;
use crate::core::{AnalysisError, AnalysisResult, TickerSnapshot};

const RULE: &str = "==================================================";

/// Message shown to the user for an error
pub fn error_message(err: &AnalysisError) -> String {
    match err {
        AnalysisError::InvalidVolatility(_) => {
            "Invalid implied volatility. Cannot calculate BSM price.".to_string()
        }
        AnalysisError::InvalidInput(detail) | AnalysisError::Numerical(detail) => format!(
            "Could not calculate Black-Scholes price ({}). Please check input parameters.",
            detail
        ),
        AnalysisError::DivisionUndefined(_) => {
            "Model price is zero, mispricing is undefined.".to_string()
        }
        AnalysisError::EmptyInput(_) => {
            "No strikes available to select an ATM contract.".to_string()
        }
        AnalysisError::NoDataAvailable(detail) => format!("No data available: {}", detail),
        AnalysisError::Network(detail) => {
            format!("Could not reach the market data source: {}", detail)
        }
        AnalysisError::Data(detail) => format!("Unexpected market data: {}", detail),
        AnalysisError::Config(detail) => format!("Configuration error: {}", detail),
    }
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Text report for one snapshot, one section per analysed side
pub struct TextReport<'a> {
    pub snapshot: &'a TickerSnapshot,
    pub results: &'a [AnalysisResult<Analysis>],
}

impl<'a> TextReport<'a> {
    pub fn new(snapshot: &'a TickerSnapshot, results: &'a [AnalysisResult<Analysis>]) -> Self {
        Self { snapshot, results }
    }

    fn write_side(f: &mut fmt::Formatter<'_>, a: &Analysis) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "{} OPTION ANALYSIS", a.option_type.label().to_uppercase())?;
        writeln!(f, "{}", RULE)?;

        let q = &a.quote;
        writeln!(f, "Market Price: ${:.2}", q.last_price)?;
        writeln!(f, "Bid: ${:.2}", q.bid)?;
        writeln!(f, "Ask: ${:.2}", q.ask)?;
        writeln!(f, "Volume: {}", format_thousands(q.volume))?;
        match q.implied_volatility {
            Some(iv) => writeln!(f, "Implied Volatility: {:.2}%", iv * 100.0)?,
            None => writeln!(f, "Implied Volatility: n/a")?,
        }

        let valuation = match &a.valuation {
            Ok(v) => v,
            Err(e) => return writeln!(f, "Error: {}", error_message(e)),
        };

        writeln!(f)?;
        writeln!(f, "BSM Model Price: ${:.2}", valuation.greeks.price)?;
        match &valuation.mispricing {
            Ok(m) => writeln!(f, "Mispricing: {:.2}%", m.mispricing_percent)?,
            Err(e) => writeln!(f, "Mispricing: {}", error_message(e))?,
        }

        writeln!(f)?;
        writeln!(f, "--- GREEKS ---")?;
        for (name, value) in valuation.greeks.named() {
            writeln!(f, "{}: {:.4}", name, value)?;
        }
        Ok(())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticker: {}", self.snapshot.ticker)?;
        writeln!(f, "Live Spot Price: ${:.2}", self.snapshot.spot)?;
        writeln!(f, "Selected Expiry: {}", self.snapshot.expiry())?;

        if let Some(first) = self.results.iter().find_map(|r| r.as_ref().ok()) {
            writeln!(f, "ATM Strike: ${:?}", first.atm_strike)?;
            if first.expiry_clamped {
                writeln!(
                    f,
                    "Warning: option is expiring today or has expired. Using minimum time value."
                )?;
            }
            writeln!(f, "Days to Expiry: {}", first.days_to_expiry)?;
            writeln!(f, "Time to Expiry (T): {:.4}", first.time_to_expiry)?;
            writeln!(
                f,
                "Risk-free Rate: {:.2}%  Dividend Yield: {:.2}%",
                first.params.risk_free_rate * 100.0,
                first.params.dividend_yield * 100.0
            )?;
        }

        for result in self.results {
            match result {
                Ok(a) => Self::write_side(f, a)?,
                Err(e) => {
                    writeln!(f)?;
                    writeln!(f, "Error: {}", error_message(e))?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "ANALYSIS COMPLETE")?;
        write!(f, "{}", RULE)
    }
}

/// JSON document emitted by the report binary
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub ticker: &'a str,
    pub spot: f64,
    pub expiry: NaiveDate,
    pub expiries: &'a [NaiveDate],
    pub analyses: &'a [AnalysisResult<Analysis>],
}

impl<'a> JsonReport<'a> {
    pub fn new(snapshot: &'a TickerSnapshot, results: &'a [AnalysisResult<Analysis>]) -> Self {
        Self {
            ticker: &snapshot.ticker,
            spot: snapshot.spot,
            expiry: snapshot.expiry(),
            expiries: &snapshot.expiries,
            analyses: results,
        }
    }
}
