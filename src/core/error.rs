//! Failure modes of a single projection request

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Sorry, couldn't fetch data for {ticker}. Please check the symbol.")]
    NoData { ticker: String },

    #[error("Not enough price history to project: need at least 2 points, got {points}")]
    InsufficientData { points: usize },

    #[error("Annualized return of {:.2}% makes compounding undefined", .rate * 100.0)]
    InvalidReturnRate { rate: f64 },

    #[error("Currency conversion rate USD->{currency} unavailable: {reason}")]
    RateUnavailable { currency: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to fetch price history for {ticker}: {reason}")]
    Provider { ticker: String, reason: String },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_message_mentions_fetch_failure() {
        let err = ProjectionError::NoData {
            ticker: "ZZZZ".to_string(),
        };
        assert!(err.to_string().contains("couldn't fetch data"));
        assert!(err.to_string().contains("ZZZZ"));
    }

    #[test]
    fn invalid_rate_is_shown_as_percentage() {
        let err = ProjectionError::InvalidReturnRate { rate: -1.5 };
        assert_eq!(
            err.to_string(),
            "Annualized return of -150.00% makes compounding undefined"
        );
    }
}
