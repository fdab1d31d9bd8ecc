//! At-the-money strike selection

use crate::core::{AnalysisError, AnalysisResult};

/// Strike closest to spot.
///
/// Equidistant strikes resolve to the one that comes first in `strikes`.
pub fn select_atm(strikes: &[f64], spot: f64) -> AnalysisResult<f64> {
    strikes
        .iter()
        .copied()
        .min_by(|a, b| (a - spot).abs().total_cmp(&(b - spot).abs()))
        .ok_or_else(|| AnalysisError::empty_input("no strikes available to select an ATM contract"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_strike() {
        assert_eq!(select_atm(&[100.0, 105.0, 95.0], 101.0).unwrap(), 100.0);
        assert_eq!(select_atm(&[90.0, 95.0, 100.0, 105.0], 104.0).unwrap(), 105.0);
        assert_eq!(select_atm(&[250.0], 1.0).unwrap(), 250.0);
    }

    #[test]
    fn test_tie_goes_to_first() {
        assert_eq!(select_atm(&[100.0, 102.0], 101.0).unwrap(), 100.0);
        assert_eq!(select_atm(&[102.0, 100.0], 101.0).unwrap(), 102.0);
    }

    #[test]
    fn test_idempotent() {
        let strikes = [95.0, 97.5, 100.0, 102.5];
        let first = select_atm(&strikes, 98.9).unwrap();
        assert_eq!(select_atm(&strikes, first).unwrap(), first);
    }

    #[test]
    fn test_empty() {
        let err = select_atm(&[], 100.0).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }
}
