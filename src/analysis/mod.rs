//! ATM analysis
//!
//! - `atm`: strike closest to spot
//! - `expiry`: calendar expiry to year fraction
//! - `mispricing`: model vs. market
//! - `analyzer`: the shared flow combining them with the pricing engine

pub mod analyzer;
pub mod atm;
pub mod expiry;
pub mod mispricing;

pub use analyzer::*;
pub use atm::*;
pub use expiry::*;
pub use mispricing::*;
