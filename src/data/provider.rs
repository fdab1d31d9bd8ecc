//! Market-data collaborator interface

use chrono::{NaiveDate, Utc};

use crate::core::{AnalysisError, AnalysisResult, OptionChain, TickerSnapshot};

/// Source of spot prices and option chains.
///
/// Failures are surfaced, never retried.
pub trait MarketDataProvider {
    /// Latest close of the underlying
    fn spot_price(&self, ticker: &str) -> AnalysisResult<f64>;

    /// Listed expiries, nearest first
    fn expiries(&self, ticker: &str) -> AnalysisResult<Vec<NaiveDate>>;

    /// Calls and puts for one expiry
    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> AnalysisResult<OptionChain>;

    /// Everything needed to analyse `ticker`.
    ///
    /// Uses `expiry` if given (it must be listed), otherwise the nearest one.
    fn snapshot(&self, ticker: &str, expiry: Option<NaiveDate>) -> AnalysisResult<TickerSnapshot> {
        let spot = self.spot_price(ticker)?;

        let expiries = self.expiries(ticker)?;
        let selected = match expiry {
            Some(requested) if expiries.contains(&requested) => requested,
            Some(requested) => {
                return Err(AnalysisError::no_data(format!(
                    "{} has no options expiring {}",
                    ticker, requested
                )))
            }
            None => *expiries.first().ok_or_else(|| {
                AnalysisError::no_data(format!("no options data available for {}", ticker))
            })?,
        };

        let chain = self.option_chain(ticker, selected)?;
        tracing::info!(
            ticker,
            spot,
            expiry = %selected,
            calls = chain.calls.len(),
            puts = chain.puts.len(),
            "fetched snapshot"
        );

        Ok(TickerSnapshot {
            ticker: ticker.to_string(),
            spot,
            expiries,
            chain,
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OptionQuote, OptionType};

    struct FixedProvider {
        expiries: Vec<NaiveDate>,
    }

    impl MarketDataProvider for FixedProvider {
        fn spot_price(&self, _ticker: &str) -> AnalysisResult<f64> {
            Ok(101.0)
        }

        fn expiries(&self, _ticker: &str) -> AnalysisResult<Vec<NaiveDate>> {
            Ok(self.expiries.clone())
        }

        fn option_chain(&self, _ticker: &str, expiry: NaiveDate) -> AnalysisResult<OptionChain> {
            let mut chain = OptionChain::new(expiry);
            chain.calls.push(OptionQuote::new(100.0, OptionType::Call));
            chain.puts.push(OptionQuote::new(100.0, OptionType::Put));
            Ok(chain)
        }
    }

    fn dates() -> Vec<NaiveDate> {
        vec![
            NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 17).unwrap(),
        ]
    }

    #[test]
    fn test_nearest_expiry_by_default() {
        let provider = FixedProvider { expiries: dates() };
        let snap = provider.snapshot("TEST", None).unwrap();

        assert_eq!(snap.ticker, "TEST");
        assert_eq!(snap.spot, 101.0);
        assert_eq!(snap.expiry(), dates()[0]);
        assert_eq!(snap.expiries, dates());
    }

    #[test]
    fn test_requested_expiry() {
        let provider = FixedProvider { expiries: dates() };
        let snap = provider.snapshot("TEST", Some(dates()[1])).unwrap();
        assert_eq!(snap.expiry(), dates()[1]);

        let unlisted = NaiveDate::from_ymd_opt(2025, 5, 16).unwrap();
        let err = provider.snapshot("TEST", Some(unlisted)).unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataAvailable(_)));
    }

    #[test]
    fn test_no_expiries() {
        let provider = FixedProvider { expiries: vec![] };
        let err = provider.snapshot("TEST", None).unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataAvailable(_)));
    }
}
