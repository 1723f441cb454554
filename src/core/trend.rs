//! Straight-line price trend over month index.
//!
//! The fit is ordinary least squares of price against `0, 1, 2, ...` and the
//! projection is linear in price level. It is independent of the compounding
//! model in [`crate::core::growth`].

use crate::core::error::ProjectionError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    pub fn fit(prices: &[f64]) -> Result<Self, ProjectionError> {
        if prices.len() < 2 {
            return Err(ProjectionError::InsufficientData {
                points: prices.len(),
            });
        }

        let n = prices.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = prices.iter().sum::<f64>() / n;
        let mut num = 0.0;
        let mut den = 0.0;
        for (i, price) in prices.iter().enumerate() {
            let x = i as f64;
            num += (x - mean_x) * (price - mean_y);
            den += (x - mean_x).powi(2);
        }
        let slope = num / den;

        Ok(TrendLine {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn value_at(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }
}

/// Fitted price at index `len + years * 12`.
pub fn project_price(prices: &[f64], duration_years: u32) -> Result<f64, ProjectionError> {
    let line = TrendLine::fit(prices)?;
    let target = prices.len() + duration_years as usize * 12;
    let predicted = line.value_at(target as f64);
    debug!(
        slope = line.slope,
        intercept = line.intercept,
        target,
        predicted,
        "Extrapolated price trend"
    );
    Ok(predicted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point_cannot_be_fitted() {
        assert!(matches!(
            project_price(&[100.0], 1),
            Err(ProjectionError::InsufficientData { points: 1 })
        ));
        assert!(TrendLine::fit(&[]).is_err());
    }

    #[test]
    fn exact_line_is_recovered() {
        let prices = [10.0, 12.0, 14.0, 16.0, 18.0];
        let line = TrendLine::fit(&prices).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-12);
        assert!((line.intercept - 10.0).abs() < 1e-12);

        // len 5 + 12 months
        let predicted = project_price(&prices, 1).unwrap();
        assert!((predicted - (10.0 + 2.0 * 17.0)).abs() < 1e-9);
    }

    #[test]
    fn extrapolates_geometric_series_along_fitted_line() {
        let prices = [100.0, 110.0, 121.0, 133.1];
        let line = TrendLine::fit(&prices).unwrap();
        assert!((line.slope - 11.03).abs() < 1e-9);
        assert!((line.intercept - 99.48).abs() < 1e-9);

        let predicted = project_price(&prices, 1).unwrap();
        assert!((predicted - line.value_at(16.0)).abs() < 1e-9);
        assert!((predicted - 275.96).abs() < 1e-9);
        assert!(predicted > prices[3]);
    }

    #[test]
    fn declining_trend_can_go_negative() {
        let predicted = project_price(&[100.0, 80.0, 60.0], 1).unwrap();
        assert!(predicted < 0.0);
    }
}
