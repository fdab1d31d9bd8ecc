//! Pricing Models
//!
//! Implements:
//! - Black-Scholes-Merton (European price and Greeks with dividend yield)

pub mod black_scholes;

pub use black_scholes::*;
