//! Option quote data
//!
//! Market data as delivered by the market-data collaborator: one quote per
//! strike and side, grouped into a chain per expiry, plus the per-ticker
//! snapshot that feeds an analysis.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::option::OptionType;

/// Strikes closer than this are the same contract
const STRIKE_MATCH_TOLERANCE: f64 = 1e-9;

/// Option market quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price
    pub strike: f64,
    /// Implied volatility supplied by the data source (decimal, 0.25 = 25%)
    pub implied_volatility: Option<f64>,
    /// Last traded price
    pub last_price: f64,
    /// Bid price
    pub bid: f64,
    /// Ask price
    pub ask: f64,
    /// Trading volume
    pub volume: u64,
    /// Option side
    pub option_type: OptionType,
}

impl OptionQuote {
    pub fn new(strike: f64, option_type: OptionType) -> Self {
        Self {
            strike,
            implied_volatility: None,
            last_price: 0.0,
            bid: 0.0,
            ask: 0.0,
            volume: 0,
            option_type,
        }
    }

    /// Mid price, if both sides are quoted
    pub fn mid(&self) -> Option<f64> {
        if self.bid > 0.0 && self.ask > 0.0 {
            Some((self.bid + self.ask) / 2.0)
        } else {
            None
        }
    }

    /// Bid-ask spread
    pub fn spread(&self) -> Option<f64> {
        self.mid().map(|_| self.ask - self.bid)
    }
}

/// Calls and puts for a single expiry, in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub expiry: NaiveDate,
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
}

impl OptionChain {
    pub fn new(expiry: NaiveDate) -> Self {
        Self {
            expiry,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }

    /// Call strikes in source order; the ATM contract is picked from these
    pub fn strikes(&self) -> Vec<f64> {
        self.calls.iter().map(|q| q.strike).collect()
    }

    pub fn call_at(&self, strike: f64) -> Option<&OptionQuote> {
        self.calls
            .iter()
            .find(|q| (q.strike - strike).abs() < STRIKE_MATCH_TOLERANCE)
    }

    pub fn put_at(&self, strike: f64) -> Option<&OptionQuote> {
        self.puts
            .iter()
            .find(|q| (q.strike - strike).abs() < STRIKE_MATCH_TOLERANCE)
    }

    pub fn quote_at(&self, strike: f64, option_type: OptionType) -> Option<&OptionQuote> {
        match option_type {
            OptionType::Call => self.call_at(strike),
            OptionType::Put => self.put_at(strike),
        }
    }

    pub fn side(&self, option_type: OptionType) -> &[OptionQuote] {
        match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }
}

/// Everything one analysis needs about a ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    /// Underlying symbol
    pub ticker: String,
    /// Latest close of the underlying
    pub spot: f64,
    /// Listed expiries, nearest first
    pub expiries: Vec<NaiveDate>,
    /// Chain for the selected expiry
    pub chain: OptionChain,
    /// When the snapshot was taken
    pub fetched_at: DateTime<Utc>,
}

impl TickerSnapshot {
    pub fn new(ticker: impl Into<String>, spot: f64, chain: OptionChain) -> Self {
        Self {
            ticker: ticker.into(),
            spot,
            expiries: vec![chain.expiry],
            chain,
            fetched_at: Utc::now(),
        }
    }

    pub fn expiry(&self) -> NaiveDate {
        self.chain.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(strike: f64, option_type: OptionType, last: f64) -> OptionQuote {
        OptionQuote {
            last_price: last,
            ..OptionQuote::new(strike, option_type)
        }
    }

    #[test]
    fn test_mid_and_spread() {
        let mut q = OptionQuote::new(100.0, OptionType::Call);
        assert!(q.mid().is_none());
        assert!(q.spread().is_none());

        q.bid = 4.0;
        q.ask = 4.5;
        assert!((q.mid().unwrap() - 4.25).abs() < 1e-12);
        assert!((q.spread().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_chain_lookup() {
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let mut chain = OptionChain::new(expiry);
        assert!(chain.is_empty());

        chain.calls.push(quote(105.0, OptionType::Call, 2.0));
        chain.calls.push(quote(95.0, OptionType::Call, 8.0));
        chain.puts.push(quote(95.0, OptionType::Put, 1.5));

        // Source order is preserved
        assert_eq!(chain.strikes(), vec![105.0, 95.0]);

        assert_eq!(chain.call_at(95.0).unwrap().last_price, 8.0);
        assert_eq!(chain.quote_at(95.0, OptionType::Put).unwrap().last_price, 1.5);
        assert!(chain.put_at(105.0).is_none());
        assert_eq!(chain.side(OptionType::Call).len(), 2);
    }
}
