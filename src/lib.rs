//! # ATM Options - Black-Scholes-Merton ATM Analyzer
//!
//! Prices the at-the-money contract of a live option chain under
//! Black-Scholes-Merton and compares it with the market.
//!
//! ## Overview
//!
//! For a ticker and an expiry:
//! - **ATM Selector**: the listed strike closest to spot
//! - **Expiry Normalizer**: calendar expiry to a year fraction (one-day floor)
//! - **Pricing Engine**: price, delta, gamma, vega, theta, rho with dividend yield
//! - **Mispricing Evaluator**: market vs. model, in percent
//!
//! Rate and dividend yield are always passed in as [`MarketParams`]; nothing
//! is read from global state, so independent analyses can run in parallel.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use atm_options::prelude::*;
//!
//! let config = AppConfig::default();
//! let client = YahooClient::new(&config.data).unwrap();
//! let snapshot = client.snapshot("AAPL", None).unwrap();
//!
//! let now = chrono::Local::now().naive_local();
//! let analysis = analyze(&snapshot, OptionType::Call, &config.market, now).unwrap();
//!
//! if let Some(greeks) = analysis.greeks() {
//!     println!("model {:.2} delta {:.4}", greeks.price, greeks.delta);
//! }
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Handle American early exercise (European formulas only)
//! - Solve for implied volatility (it comes from the data source)
//! - Aggregate multi-leg positions
//! - Store past runs

pub mod analysis;
pub mod config;
pub mod core;
pub mod data;
pub mod logging;
pub mod models;
pub mod report;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        AnalysisError, AnalysisResult, GreeksResult, OptionChain, OptionQuote, OptionType,
        TickerSnapshot,
    };

    // Configuration
    pub use crate::config::{AppConfig, DataSettings, MarketParams};

    // Data fetching
    pub use crate::data::{MarketDataProvider, YahooClient};

    // Pricing
    pub use crate::models::{
        norm_cdf, norm_pdf, price as bs_price, PricingInputs, MIN_TIME_TO_EXPIRY, MIN_VOLATILITY,
    };

    // Analysis
    pub use crate::analysis::{
        analyze, analyze_both, check_implied_volatility, evaluate, normalize, select_atm,
        Analysis, ExpiryNormalization, MispricingReport, Valuation,
    };
}

// Re-export main types at crate root
pub use crate::config::MarketParams;
pub use crate::core::{AnalysisError, AnalysisResult};
