use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyRateProvider;
use crate::core::price::{HistoryProvider, PricePoint, PriceSeries};

const USER_AGENT: &str = "sipcast/1.0";

fn extract_price_points(item: &HistoryChartItem) -> Vec<PricePoint> {
    let Some(timestamps) = item.timestamp.as_ref() else {
        return Vec::new();
    };

    // Adjusted closes when Yahoo has them, raw closes otherwise
    let closes = item.indicators.as_ref().and_then(|inds| {
        inds.adjclose
            .as_ref()
            .and_then(|adj| adj.first())
            .and_then(|a| a.adjclose.as_ref())
            .or_else(|| inds.quote.first().and_then(|q| q.close.as_ref()))
    });
    let Some(closes) = closes else {
        return Vec::new();
    };

    timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let price = (*close)?;
            let date = Utc.timestamp_opt(*ts, 0).single()?.date_naive();
            Some(PricePoint { date, price })
        })
        .collect()
}

// YahooFinanceProvider implementation for HistoryProvider
pub struct YahooFinanceProvider {
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFinanceProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooHistoryResponse {
    chart: HistoryChartResult,
}

#[derive(Deserialize, Debug)]
struct HistoryChartResult {
    result: Option<Vec<HistoryChartItem>>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct HistoryChartItem {
    meta: HistoryChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct HistoryChartMeta {
    currency: Option<String>,
}

#[async_trait]
impl HistoryProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_monthly_history(&self, symbol: &str, years: u32) -> Result<PriceSeries> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1mo&range={}y",
            self.base_url, symbol, years
        );
        debug!("Requesting price history from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        debug!(response = ?response, "Received Yahoo response");

        // Unknown symbols come back as 404 with a null result
        if response.status() == StatusCode::NOT_FOUND {
            debug!("No chart for symbol: {}", symbol);
            return Ok(PriceSeries::empty(symbol));
        }
        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooHistoryResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let Some(item) = data.chart.result.as_ref().and_then(|r| r.first()) else {
            debug!("Empty chart result for symbol: {}", symbol);
            return Ok(PriceSeries::empty(symbol));
        };

        let currency = item.meta.currency.as_deref().unwrap_or("USD");
        let points = extract_price_points(item);
        debug!(points = points.len(), currency, "Parsed monthly closes");

        Ok(PriceSeries::new(symbol, currency, points))
    }
}

// YahooCurrencyProvider implementation for CurrencyRateProvider
pub struct YahooCurrencyProvider {
    base_url: String,
}

impl YahooCurrencyProvider {
    pub fn new(base_url: &str) -> Self {
        YahooCurrencyProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct YahooCurrencyResponse {
    chart: CurrencyChartResult,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartResult {
    result: Vec<CurrencyChartItem>,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartItem {
    meta: CurrencyChartMeta,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: f64,
}

#[async_trait]
impl CurrencyRateProvider for YahooCurrencyProvider {
    #[instrument(name = "YahooRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let symbol = format!("{from}{to}=X");
        let endpoint = format!("/v8/finance/chart/{symbol}");
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Requesting currency rate from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;

        let data: YahooCurrencyResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {}", symbol))?;

        Ok(item.meta.regular_market_price)
    }
}
