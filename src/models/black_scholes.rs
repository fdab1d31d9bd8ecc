//! Black-Scholes-Merton Model
//!
//! Provides:
//! - Standard normal CDF/PDF
//! - European option price and Greeks with continuous dividend yield
//!
//! Inputs are gated first (non-positive or NaN values are rejected) and then
//! floored: time to expiry to one day and volatility to 0.1%. The order
//! matters: tiny but positive inputs are rescued, nonsensical ones are not.

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::core::{AnalysisError, AnalysisResult, GreeksResult, OptionType};

/// Minimum time to expiry in years (one calendar day)
pub const MIN_TIME_TO_EXPIRY: f64 = 1.0 / 365.0;

/// Minimum volatility (0.1%)
pub const MIN_VOLATILITY: f64 = 0.001;

/// Days per year for theta and year fractions
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Inputs to the pricing engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInputs {
    pub spot: f64,
    pub strike: f64,
    pub risk_free_rate: f64,
    /// Years
    pub time_to_expiry: f64,
    pub dividend_yield: f64,
    /// Decimal (0.20 = 20%)
    pub volatility: f64,
}

impl PricingInputs {
    pub fn new(
        spot: f64,
        strike: f64,
        risk_free_rate: f64,
        time_to_expiry: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Self {
        Self {
            spot,
            strike,
            risk_free_rate,
            time_to_expiry,
            dividend_yield,
            volatility,
        }
    }

    /// Reject invalid inputs, then apply the time and volatility floors
    pub fn validated(&self) -> AnalysisResult<PricingInputs> {
        let fields = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("risk-free rate", self.risk_free_rate),
            ("time to expiry", self.time_to_expiry),
            ("dividend yield", self.dividend_yield),
            ("volatility", self.volatility),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.is_nan()) {
            return Err(AnalysisError::invalid_input(format!("{} is NaN", name)));
        }

        if self.spot <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "spot must be positive, got {}",
                self.spot
            )));
        }
        if self.strike <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "strike must be positive, got {}",
                self.strike
            )));
        }
        if self.time_to_expiry <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "time to expiry must be positive, got {}",
                self.time_to_expiry
            )));
        }
        if self.volatility <= 0.0 {
            return Err(AnalysisError::invalid_input(format!(
                "volatility must be positive, got {}",
                self.volatility
            )));
        }

        Ok(PricingInputs {
            time_to_expiry: self.time_to_expiry.max(MIN_TIME_TO_EXPIRY),
            volatility: self.volatility.max(MIN_VOLATILITY),
            ..*self
        })
    }
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes-Merton price and Greeks for one side
///
/// Vega and rho are per 1% move, theta is per calendar day. Any non-finite
/// output rejects the whole result.
pub fn price(inputs: &PricingInputs, option_type: OptionType) -> AnalysisResult<GreeksResult> {
    let PricingInputs {
        spot,
        strike,
        risk_free_rate: rate,
        time_to_expiry: time,
        dividend_yield: div,
        volatility: vol,
    } = inputs.validated()?;

    let sqrt_t = time.sqrt();
    let vol_sqrt_t = vol * sqrt_t;
    let d1 = d1(spot, strike, rate, div, vol, time);
    let d2 = d1 - vol_sqrt_t;

    // Saturated intermediates would pass through the CDF as a finite but wrong price
    if !(vol_sqrt_t.is_finite() && d1.is_finite() && d2.is_finite()) {
        return Err(AnalysisError::numerical(format!(
            "non-finite d1/d2 for S={} K={} T={} vol={}",
            spot, strike, time, vol
        )));
    }
    let df = (-rate * time).exp();
    let div_factor = (-div * time).exp();
    let pdf_d1 = norm_pdf(d1);

    // Gamma and vega are the same for call and put
    let gamma = pdf_d1 * div_factor / (spot * vol * sqrt_t);
    let vega = spot * pdf_d1 * sqrt_t * div_factor / 100.0;

    let decay = -(spot * pdf_d1 * vol * div_factor) / (2.0 * sqrt_t);

    let (value, delta, theta, rho) = match option_type {
        OptionType::Call => {
            let nd1 = norm_cdf(d1);
            let nd2 = norm_cdf(d2);
            (
                spot * div_factor * nd1 - strike * df * nd2,
                nd1 * div_factor,
                (decay - rate * strike * df * nd2 + div * spot * div_factor * nd1) / DAYS_PER_YEAR,
                strike * time * df * nd2 / 100.0,
            )
        }
        OptionType::Put => {
            let n_minus_d1 = norm_cdf(-d1);
            let n_minus_d2 = norm_cdf(-d2);
            (
                strike * df * n_minus_d2 - spot * div_factor * n_minus_d1,
                div_factor * (norm_cdf(d1) - 1.0),
                (decay + rate * strike * df * n_minus_d2 - div * spot * div_factor * n_minus_d1)
                    / DAYS_PER_YEAR,
                -strike * time * df * n_minus_d2 / 100.0,
            )
        }
    };

    let result = GreeksResult {
        option_type,
        price: value,
        delta,
        gamma,
        vega,
        theta,
        rho,
    };

    if !result.is_finite() {
        return Err(AnalysisError::numerical(format!(
            "non-finite {} result for S={} K={} T={} vol={}",
            option_type, spot, strike, time, vol
        )));
    }

    tracing::debug!(
        side = %option_type,
        spot,
        strike,
        time,
        vol,
        price = result.price,
        "priced option"
    );

    Ok(result)
}
