//! Error types for ATM option analysis

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid implied volatility: {0}")]
    InvalidVolatility(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("No data available: {0}")]
    NoDataAvailable(String),

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl AnalysisError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_volatility(msg: impl Into<String>) -> Self {
        Self::InvalidVolatility(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoDataAvailable(msg.into())
    }

    pub fn division_undefined(msg: impl Into<String>) -> Self {
        Self::DivisionUndefined(msg.into())
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short stable label for the error kind, used by the report and dashboard
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidVolatility(_) => "invalid_volatility",
            Self::EmptyInput(_) => "empty_input",
            Self::NoDataAvailable(_) => "no_data_available",
            Self::DivisionUndefined(_) => "division_undefined",
            Self::Numerical(_) => "numerical",
            Self::Network(_) => "network",
            Self::Data(_) => "data",
            Self::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_kind() {
        let err = AnalysisError::no_data("no option chain for XYZ");
        assert_eq!(err.to_string(), "No data available: no option chain for XYZ");
        assert_eq!(err.kind(), "no_data_available");

        let err = AnalysisError::invalid_volatility("iv = 0");
        assert_eq!(err.kind(), "invalid_volatility");
    }
}
