//! Model vs. market comparison

use serde::{Deserialize, Serialize};

use crate::core::{AnalysisError, AnalysisResult};

/// Mispricing above this magnitude (percent) is flagged for display
pub const SIGNIFICANT_MISPRICING_PCT: f64 = 5.0;

/// Relative mispricing in percent: positive when the market is rich
pub fn evaluate(model_price: f64, market_price: f64) -> AnalysisResult<f64> {
    if model_price == 0.0 {
        return Err(AnalysisError::division_undefined(
            "model price is zero, mispricing cannot be computed",
        ));
    }
    Ok((market_price - model_price) / model_price * 100.0)
}

/// Gate applied to the quoted implied volatility before pricing
pub fn check_implied_volatility(iv: Option<f64>) -> AnalysisResult<f64> {
    match iv {
        Some(v) if v > 0.0 => Ok(v),
        Some(v) => Err(AnalysisError::invalid_volatility(format!(
            "implied volatility must be positive, got {}",
            v
        ))),
        None => Err(AnalysisError::invalid_volatility(
            "no implied volatility quoted",
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MispricingReport {
    pub model_price: f64,
    pub market_price: f64,
    pub mispricing_percent: f64,
}

impl MispricingReport {
    pub fn new(model_price: f64, market_price: f64) -> AnalysisResult<Self> {
        let mispricing_percent = evaluate(model_price, market_price)?;
        Ok(Self {
            model_price,
            market_price,
            mispricing_percent,
        })
    }

    pub fn is_significant(&self) -> bool {
        self.mispricing_percent.abs() > SIGNIFICANT_MISPRICING_PCT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        assert!((evaluate(10.0, 11.0).unwrap() - 10.0).abs() < 1e-12);
        assert!((evaluate(4.0, 3.0).unwrap() + 25.0).abs() < 1e-12);
        // No clamping at this layer
        assert!((evaluate(0.01, 5.0).unwrap() - 49_900.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_model_price() {
        let err = evaluate(0.0, 5.0).unwrap_err();
        assert!(matches!(err, AnalysisError::DivisionUndefined(_)));
        assert!(MispricingReport::new(0.0, 5.0).is_err());
    }

    #[test]
    fn test_report() {
        let report = MispricingReport::new(10.0, 10.4).unwrap();
        assert!((report.mispricing_percent - 4.0).abs() < 1e-9);
        assert!(!report.is_significant());

        let report = MispricingReport::new(10.0, 9.0).unwrap();
        assert!(report.is_significant());
    }

    #[test]
    fn test_implied_volatility_gate() {
        assert_eq!(check_implied_volatility(Some(0.25)).unwrap(), 0.25);

        for iv in [Some(0.0), Some(-0.1), Some(f64::NAN), None] {
            let err = check_implied_volatility(iv).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidVolatility(_)));
        }
    }
}
