//! Runs one projection request end to end: fetch, compute, convert.

use crate::core::currency::CurrencyRateProvider;
use crate::core::error::ProjectionError;
use crate::core::price::{HistoryProvider, PriceSeries};
use crate::core::projection::{self, BASE_CURRENCY, ProjectionRequest, ProjectionResult};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct Forecast {
    pub series: PriceSeries,
    pub result: ProjectionResult,
}

#[instrument(name = "Forecast", skip_all, fields(ticker = %request.ticker()))]
pub async fn run(
    request: &ProjectionRequest,
    history_provider: &(dyn HistoryProvider + Send + Sync),
    currency_provider: &(dyn CurrencyRateProvider + Send + Sync),
) -> Result<Forecast, ProjectionError> {
    let ticker = request.ticker();
    info!("Fetching {} years of monthly prices", request.duration_years());

    let series = history_provider
        .fetch_monthly_history(ticker, request.duration_years())
        .await
        .map_err(|e| ProjectionError::Provider {
            ticker: ticker.to_string(),
            reason: format!("{e:#}"),
        })?;

    if series.is_empty() {
        return Err(ProjectionError::NoData {
            ticker: ticker.to_string(),
        });
    }
    if series.currency() != BASE_CURRENCY.code() {
        warn!(
            "{ticker} is quoted in {}, values are treated as {BASE_CURRENCY}",
            series.currency()
        );
    }
    info!(points = series.len(), "Fetched price history");

    let result = projection::project(&series, request, currency_provider).await?;
    Ok(Forecast { series, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::price::PricePoint;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockHistoryProvider {
        prices: Option<Vec<f64>>,
    }

    #[async_trait]
    impl HistoryProvider for MockHistoryProvider {
        async fn fetch_monthly_history(&self, symbol: &str, _years: u32) -> Result<PriceSeries> {
            let prices = self
                .prices
                .as_ref()
                .ok_or_else(|| anyhow!("connection refused"))?;
            let points = prices
                .iter()
                .enumerate()
                .map(|(i, price)| PricePoint {
                    date: NaiveDate::from_ymd_opt(2023, i as u32 + 1, 1).unwrap(),
                    price: *price,
                })
                .collect();
            Ok(PriceSeries::new(symbol, "USD", points))
        }
    }

    #[derive(Default)]
    struct CountingCurrencyProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CurrencyRateProvider for CountingCurrencyProvider {
        async fn get_rate(&self, _from: &str, _to: &str) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(83.0)
        }
    }

    fn request(currency: Currency) -> ProjectionRequest {
        ProjectionRequest::new("AAPL", 1000.0, 0.0, 1, currency).unwrap()
    }

    #[tokio::test]
    async fn empty_history_halts_with_no_data() {
        let history = MockHistoryProvider {
            prices: Some(vec![]),
        };
        let rates = CountingCurrencyProvider::default();

        let err = run(&request(Currency::Inr), &history, &rates)
            .await
            .unwrap_err();

        assert!(matches!(err, ProjectionError::NoData { ref ticker } if ticker == "AAPL"));
        assert!(err.to_string().contains("couldn't fetch data"));
        assert_eq!(rates.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_fault_is_reported_not_raised() {
        let history = MockHistoryProvider { prices: None };
        let rates = CountingCurrencyProvider::default();

        let err = run(&request(Currency::Usd), &history, &rates)
            .await
            .unwrap_err();

        assert!(matches!(err, ProjectionError::Provider { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn single_point_history_is_insufficient() {
        let history = MockHistoryProvider {
            prices: Some(vec![42.0]),
        };
        let rates = CountingCurrencyProvider::default();

        let err = run(&request(Currency::Eur), &history, &rates)
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InsufficientData { points: 1 }));
        assert_eq!(rates.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn full_run_converts_once() {
        let history = MockHistoryProvider {
            prices: Some(vec![100.0, 110.0, 121.0, 133.1]),
        };
        let rates = CountingCurrencyProvider::default();

        let forecast = run(&request(Currency::Inr), &history, &rates)
            .await
            .unwrap();

        assert_eq!(forecast.series.len(), 4);
        assert!(forecast.result.currency_conversion_applied);
        assert_eq!(forecast.result.currency, Currency::Inr);
        assert_eq!(forecast.result.monthly_contribution, 83000.0);
        assert_eq!(rates.calls.load(Ordering::SeqCst), 1);
    }
}
