//! Annualized return and volatility from monthly prices.

use crate::core::error::ProjectionError;
use tracing::debug;

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStatistics {
    pub mean_annual_return: f64,
    pub annual_volatility: f64,
}

/// Month-over-month fractional changes, `p[i] / p[i-1] - 1`.
pub fn monthly_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

pub fn return_statistics(prices: &[f64]) -> Result<ReturnStatistics, ProjectionError> {
    if prices.len() < 2 {
        return Err(ProjectionError::InsufficientData {
            points: prices.len(),
        });
    }

    let returns = monthly_returns(prices);
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;

    // Sample deviation needs two returns; a single one carries no spread
    let stddev = if returns.len() < 2 {
        0.0
    } else {
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        var.max(0.0).sqrt()
    };

    let stats = ReturnStatistics {
        mean_annual_return: mean * MONTHS_PER_YEAR,
        annual_volatility: stddev * MONTHS_PER_YEAR.sqrt(),
    };
    debug!(
        returns = returns.len(),
        mean_annual_return = stats.mean_annual_return,
        annual_volatility = stats.annual_volatility,
        "Computed return statistics"
    );
    Ok(stats)
}
