//! Data fetching
//!
//! Handles:
//! - The `MarketDataProvider` seam the analysis consumes
//! - Yahoo Finance API for spot prices and option chains (free)

pub mod provider;
pub mod yahoo;

pub use provider::*;
pub use yahoo::*;
