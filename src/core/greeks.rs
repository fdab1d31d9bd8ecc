//! Option Greeks
//!
//! Model price and first order sensitivities, tagged with the side they were
//! computed for.

use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// Black-Scholes-Merton price and Greeks for one side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// Side the result was computed for
    pub option_type: OptionType,
    /// Theoretical price
    pub price: f64,
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Vega: dV/dσ per 1% vol move
    pub vega: f64,
    /// Theta: dV/dt per calendar day
    pub theta: f64,
    /// Rho: dV/dr per 1% rate move
    pub rho: f64,
}

impl GreeksResult {
    /// Greeks as (name, value) pairs in display order
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("Delta", self.delta),
            ("Gamma", self.gamma),
            ("Vega", self.vega),
            ("Theta", self.theta),
            ("Rho", self.rho),
        ]
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.price.is_finite() && self.named().iter().all(|(_, v)| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_order() {
        let g = GreeksResult {
            option_type: OptionType::Call,
            price: 4.0,
            delta: 0.5,
            gamma: 0.04,
            vega: 0.2,
            theta: -0.03,
            rho: 0.1,
        };
        let names: Vec<&str> = g.named().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["Delta", "Gamma", "Vega", "Theta", "Rho"]);
        assert!(g.is_finite());

        let bad = GreeksResult { gamma: f64::NAN, ..g };
        assert!(!bad.is_finite());
    }
}
