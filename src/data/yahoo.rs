//! Yahoo Finance data fetcher
//!
//! Spot price from the daily chart endpoint, expiries and option chains from
//! the options endpoint. Uses Yahoo Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;

use super::provider::MarketDataProvider;
use crate::config::DataSettings;
use crate::core::{
    AnalysisError, AnalysisResult, OptionChain, OptionQuote, OptionType,
};

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    chart_url: String,
    options_url: String,
}

impl YahooClient {
    pub fn new(settings: &DataSettings) -> AnalysisResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            chart_url: settings.chart_url.trim_end_matches('/').to_string(),
            options_url: settings.options_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_text(&self, url: &str) -> AnalysisResult<String> {
        tracing::debug!(url, "GET");
        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AnalysisError::Network(e.to_string()))?
            .text()
            .map_err(|e| AnalysisError::Network(e.to_string()))
    }
}

impl MarketDataProvider for YahooClient {
    fn spot_price(&self, ticker: &str) -> AnalysisResult<f64> {
        let url = format!("{}/{}?range=1d&interval=1d", self.chart_url, ticker);
        parse_spot(&self.get_text(&url)?, ticker)
    }

    fn expiries(&self, ticker: &str) -> AnalysisResult<Vec<NaiveDate>> {
        let url = format!("{}/{}", self.options_url, ticker);
        parse_expiries(&self.get_text(&url)?, ticker)
    }

    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> AnalysisResult<OptionChain> {
        let url = format!(
            "{}/{}?date={}",
            self.options_url,
            ticker,
            expiry_timestamp(expiry)
        );
        parse_chain(&self.get_text(&url)?, ticker, expiry)
    }
}

/// Yahoo lists expiries as midnight UTC
fn expiry_timestamp(expiry: NaiveDate) -> i64 {
    expiry.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Latest non-null close, falling back to the regular market price
pub fn parse_spot(body: &str, ticker: &str) -> AnalysisResult<f64> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::Data(format!("Failed to parse chart: {}", e)))?;

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AnalysisError::no_data(format!("no price data available for {}", ticker)))?;

    let last_close = result
        .indicators
        .quote
        .first()
        .and_then(|q| q.close.iter().rev().find_map(|c| *c));

    last_close
        .or(result.meta.regular_market_price)
        .filter(|p| p.is_finite())
        .ok_or_else(|| AnalysisError::no_data(format!("no price data available for {}", ticker)))
}

pub fn parse_expiries(body: &str, ticker: &str) -> AnalysisResult<Vec<NaiveDate>> {
    let chain = first_chain_result(body, ticker)?;

    let mut expiries: Vec<NaiveDate> = chain
        .expiration_dates
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect();
    expiries.sort();
    expiries.dedup();

    Ok(expiries)
}

pub fn parse_chain(body: &str, ticker: &str, expiry: NaiveDate) -> AnalysisResult<OptionChain> {
    let data = first_chain_result(body, ticker)?;
    let mut chain = OptionChain::new(expiry);

    if let Some(options) = data.options.into_iter().next() {
        chain.calls = options
            .calls
            .iter()
            .filter_map(|o| convert_option_quote(o, OptionType::Call))
            .collect();
        chain.puts = options
            .puts
            .iter()
            .filter_map(|o| convert_option_quote(o, OptionType::Put))
            .collect();
    }

    if chain.is_empty() {
        tracing::warn!(ticker, %expiry, "empty option chain");
    }

    Ok(chain)
}

fn first_chain_result(body: &str, ticker: &str) -> AnalysisResult<YahooOptionChainData> {
    let response: YahooOptionsResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::Data(format!("Failed to parse options: {}", e)))?;

    response
        .option_chain
        .result
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::no_data(format!("no options data available for {}", ticker)))
}

/// Convert Yahoo option data to our quote format
fn convert_option_quote(data: &YahooOptionData, option_type: OptionType) -> Option<OptionQuote> {
    let strike = data.strike?;

    Some(OptionQuote {
        strike,
        implied_volatility: data.implied_volatility,
        last_price: data.last_price.unwrap_or(0.0),
        bid: data.bid.unwrap_or(0.0),
        ask: data.ask.unwrap_or(0.0),
        volume: data.volume.map(|v| v.max(0) as u64).unwrap_or(0),
        option_type,
    })
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
    #[serde(default)]
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooIndicatorQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicatorQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    #[serde(default)]
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    strike: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":189.5},
        "indicators":{"quote":[{"close":[188.1,189.25,null]}]}}],"error":null}}"#;

    const OPTIONS: &str = r#"{"optionChain":{"result":[{
        "expirationDates":[1742515200,1741910400],
        "quote":{"regularMarketPrice":189.5},
        "options":[{"expirationDate":1741910400,
            "calls":[
                {"contractSymbol":"X","strike":185.0,"lastPrice":6.1,"bid":6.0,"ask":6.2,"volume":1500,"impliedVolatility":0.24},
                {"strike":190.0,"lastPrice":3.4,"bid":3.3,"ask":3.5,"impliedVolatility":0.22},
                {"lastPrice":1.0}
            ],
            "puts":[
                {"strike":190.0,"lastPrice":3.9,"bid":3.8,"ask":4.0,"volume":-1}
            ]}]}],"error":null}}"#;

    #[test]
    fn test_parse_spot_uses_last_close() {
        assert_eq!(parse_spot(CHART, "AAPL").unwrap(), 189.25);
    }

    #[test]
    fn test_parse_spot_fallback_and_missing() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":42.0},"indicators":{"quote":[{"close":[]}]}}]}}"#;
        assert_eq!(parse_spot(body, "X").unwrap(), 42.0);

        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#;
        let err = parse_spot(body, "NOPE").unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataAvailable(_)));

        let err = parse_spot("not json", "X").unwrap_err();
        assert!(matches!(err, AnalysisError::Data(_)));
    }

    #[test]
    fn test_parse_expiries_sorted() {
        let expiries = parse_expiries(OPTIONS, "AAPL").unwrap();
        assert_eq!(
            expiries,
            vec![
                NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            ]
        );
    }

    #[test]
    fn test_parse_chain() {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let chain = parse_chain(OPTIONS, "AAPL", expiry).unwrap();

        // Row without strike is dropped
        assert_eq!(chain.calls.len(), 2);
        assert_eq!(chain.puts.len(), 1);

        let call = chain.call_at(185.0).unwrap();
        assert_eq!(call.implied_volatility, Some(0.24));
        assert_eq!(call.volume, 1500);
        assert_eq!(chain.call_at(190.0).unwrap().volume, 0);

        let put = chain.put_at(190.0).unwrap();
        assert_eq!(put.implied_volatility, None);
        assert_eq!(put.volume, 0);
        assert_eq!(put.option_type, OptionType::Put);
    }

    #[test]
    fn test_empty_result() {
        let body = r#"{"optionChain":{"result":[],"error":null}}"#;
        let err = parse_expiries(body, "NOPE").unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataAvailable(_)));
    }

    #[test]
    fn test_expiry_timestamp() {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(expiry_timestamp(expiry), 1741910400);
    }

    #[test]
    #[ignore] // Requires network
    fn test_live_snapshot() {
        let client = YahooClient::new(&DataSettings::default()).unwrap();
        let snap = client.snapshot("SPY", None).unwrap();

        assert!(snap.spot > 0.0);
        assert!(!snap.chain.calls.is_empty());
        println!("SPY spot {} expiry {}", snap.spot, snap.expiry());
    }
}
