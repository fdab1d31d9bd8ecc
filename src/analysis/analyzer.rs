//! ATM analysis flow
//!
//! Shared by the command-line report and the dashboard: select the ATM
//! contract, normalize its expiry, gate the quoted implied volatility, price
//! it and compare with the last traded price.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::atm::select_atm;
use super::expiry::normalize;
use super::mispricing::{check_implied_volatility, MispricingReport};
use crate::config::MarketParams;
use crate::core::{
    AnalysisError, AnalysisResult, GreeksResult, OptionQuote, OptionType, TickerSnapshot,
};
use crate::models::{self, PricingInputs};

/// Model output for the ATM contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub greeks: GreeksResult,
    pub mispricing: Result<MispricingReport, AnalysisError>,
}

/// Result of analysing one side of the ATM contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub ticker: String,
    pub option_type: OptionType,
    pub spot: f64,
    pub atm_strike: f64,
    pub expiry: NaiveDate,
    pub days_to_expiry: i64,
    pub time_to_expiry: f64,
    /// Expiry was today or past and the one-day floor was used
    pub expiry_clamped: bool,
    pub params: MarketParams,
    /// Raw market quote, always available for display
    pub quote: OptionQuote,
    /// Absent (with the reason) when the model could not be run
    pub valuation: Result<Valuation, AnalysisError>,
}

impl Analysis {
    pub fn greeks(&self) -> Option<&GreeksResult> {
        self.valuation.as_ref().ok().map(|v| &v.greeks)
    }

    pub fn mispricing(&self) -> Option<&MispricingReport> {
        self.valuation
            .as_ref()
            .ok()
            .and_then(|v| v.mispricing.as_ref().ok())
    }
}

/// Analyse the ATM contract of `snapshot` for one side.
///
/// Missing market data aborts the analysis. Problems with the model inputs
/// are recorded in [`Analysis::valuation`] so the quote can still be shown.
pub fn analyze(
    snapshot: &TickerSnapshot,
    option_type: OptionType,
    params: &MarketParams,
    now: NaiveDateTime,
) -> AnalysisResult<Analysis> {
    let spot = snapshot.spot;
    if !spot.is_finite() || spot <= 0.0 {
        return Err(AnalysisError::invalid_input(format!(
            "spot price must be positive, got {}",
            spot
        )));
    }

    let chain = &snapshot.chain;
    if chain.calls.is_empty() || chain.puts.is_empty() {
        return Err(AnalysisError::no_data(format!(
            "no option chain data for {} expiring {}",
            snapshot.ticker, chain.expiry
        )));
    }

    let atm_strike = select_atm(&chain.strikes(), spot)?;
    let quote = chain
        .quote_at(atm_strike, option_type)
        .cloned()
        .ok_or_else(|| {
            AnalysisError::no_data(format!(
                "no {} quote at ATM strike {}",
                option_type, atm_strike
            ))
        })?;

    let expiry = normalize(chain.expiry, now);

    let valuation = value_quote(&quote, spot, expiry.time_to_expiry, params);
    if let Err(e) = &valuation {
        tracing::warn!(ticker = %snapshot.ticker, side = %option_type, error = %e, "no model valuation");
    }

    Ok(Analysis {
        ticker: snapshot.ticker.clone(),
        option_type,
        spot,
        atm_strike,
        expiry: chain.expiry,
        days_to_expiry: expiry.days_to_expiry,
        time_to_expiry: expiry.time_to_expiry,
        expiry_clamped: expiry.clamped,
        params: *params,
        quote,
        valuation,
    })
}

/// Analyse call then put for the same snapshot
pub fn analyze_both(
    snapshot: &TickerSnapshot,
    params: &MarketParams,
    now: NaiveDateTime,
) -> Vec<AnalysisResult<Analysis>> {
    OptionType::both()
        .into_iter()
        .map(|side| analyze(snapshot, side, params, now))
        .collect()
}

fn value_quote(
    quote: &OptionQuote,
    spot: f64,
    time_to_expiry: f64,
    params: &MarketParams,
) -> AnalysisResult<Valuation> {
    let vol = check_implied_volatility(quote.implied_volatility)?;

    let inputs = PricingInputs::new(
        spot,
        quote.strike,
        params.risk_free_rate,
        time_to_expiry,
        params.dividend_yield,
        vol,
    );
    let greeks = models::price(&inputs, quote.option_type)?;
    let mispricing = MispricingReport::new(greeks.price, quote.last_price);

    Ok(Valuation { greeks, mispricing })
}
