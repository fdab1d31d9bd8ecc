//! Core data types for ATM option analysis
//!
//! Defines fundamental types:
//! - OptionType: call/put side
//! - OptionQuote, OptionChain, TickerSnapshot: market data
//! - GreeksResult: model price and sensitivities
//! - AnalysisError: error taxonomy

pub mod option;
pub mod quote;
pub mod greeks;
pub mod error;

pub use option::*;
pub use quote::*;
pub use greeks::*;
pub use error::*;
