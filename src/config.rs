//! Configuration
//!
//! Market parameters and data-source settings, loadable from a TOML file.
//! Every field has a default, so an empty file (or no file) is valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{AnalysisError, AnalysisResult};

/// Rate and carry assumptions passed explicitly into every analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Continuously compounded risk-free rate (0.04 = 4%)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Continuous dividend yield (0.01 = 1%)
    #[serde(default = "default_dividend_yield")]
    pub dividend_yield: f64,
}

fn default_risk_free_rate() -> f64 {
    0.04
}
fn default_dividend_yield() -> f64 {
    0.01
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            dividend_yield: default_dividend_yield(),
        }
    }
}

impl MarketParams {
    pub fn new(risk_free_rate: f64, dividend_yield: f64) -> Self {
        Self {
            risk_free_rate,
            dividend_yield,
        }
    }
}

/// Market-data source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    /// Price history endpoint (spot = latest close)
    #[serde(default = "default_chart_url")]
    pub chart_url: String,
    /// Option chain endpoint
    #[serde(default = "default_options_url")]
    pub options_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chart_url() -> String {
    "https://query1.finance.yahoo.com/v8/finance/chart".to_string()
}
fn default_options_url() -> String {
    "https://query1.finance.yahoo.com/v7/finance/options".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            chart_url: default_chart_url(),
            options_url: default_options_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub market: MarketParams,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> AnalysisResult<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| AnalysisError::config(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> AnalysisResult<String> {
        toml::to_string_pretty(self).map_err(|e| AnalysisError::config(e.to_string()))
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.market.risk_free_rate.is_finite() {
            return Err(AnalysisError::config("risk_free_rate must be finite"));
        }
        if !self.market.dividend_yield.is_finite() {
            return Err(AnalysisError::config("dividend_yield must be finite"));
        }
        if self.data.chart_url.trim().is_empty() || self.data.options_url.trim().is_empty() {
            return Err(AnalysisError::config("data source URLs must not be empty"));
        }
        if self.data.timeout_secs == 0 {
            return Err(AnalysisError::config("timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, rate: Option<f64>, dividend: Option<f64>) -> AnalysisResult<Self> {
        if let Some(r) = rate {
            self.market.risk_free_rate = r;
        }
        if let Some(q) = dividend {
            self.market.dividend_yield = q;
        }
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.market.risk_free_rate, 0.04);
        assert_eq!(config.market.dividend_yield, 0.01);
        assert_eq!(config.data.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml("[market]\nrisk_free_rate = 0.05\n").unwrap();
        assert_eq!(config.market.risk_free_rate, 0.05);
        assert_eq!(config.market.dividend_yield, 0.01);
        assert_eq!(config.data, DataSettings::default());

        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml("[market]\nrisk_free_rate = \"high\"\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));

        let err = AppConfig::from_toml("[data]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_roundtrip_file() {
        let mut config = AppConfig::default();
        config.market.dividend_yield = 0.013;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_toml().unwrap().as_bytes()).unwrap();

        let loaded = AppConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/atm.toml").unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(Some(0.03), None).unwrap();
        assert_eq!(config.market, MarketParams::new(0.03, 0.01));

        assert!(AppConfig::default().with_overrides(Some(f64::NAN), None).is_err());
    }
}
