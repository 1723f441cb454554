//! Price history abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Monthly adjusted closing prices for a single ticker, oldest first.
///
/// Holds at most one sample per calendar month and only positive prices. An
/// empty series means the provider had no data for the ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    currency: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: &str, currency: &str, mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.price.is_finite() && p.price > 0.0);
        points.sort_by_key(|p| p.date);

        // Later samples in the same month replace earlier ones
        let mut monthly: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match monthly.last_mut() {
                Some(last)
                    if last.date.year() == point.date.year()
                        && last.date.month() == point.date.month() =>
                {
                    *last = point;
                }
                _ => monthly.push(point),
            }
        }

        PriceSeries {
            ticker: ticker.to_string(),
            currency: currency.to_string(),
            points: monthly,
        }
    }

    pub fn empty(ticker: &str) -> Self {
        Self::new(ticker, "USD", Vec::new())
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetches monthly prices covering the last `years` years. Returns an empty
    /// series when the provider knows nothing about `symbol`.
    async fn fetch_monthly_history(&self, symbol: &str, years: u32) -> Result<PriceSeries>;
}
