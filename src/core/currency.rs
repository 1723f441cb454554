//! Currency conversion abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Currencies results can be displayed in. Prices are fetched in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Inr,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Inr,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unsupported currency: {} (expected one of USD, INR, EUR, GBP, JPY)",
                    s
                )
            })
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::Inr);
        assert_eq!(" JPY ".parse::<Currency>().unwrap(), Currency::Jpy);
        assert!("CAD".parse::<Currency>().is_err());
    }

    #[test]
    fn serializes_as_upper_case_code() {
        let yaml = serde_yaml::to_string(&Currency::Gbp).unwrap();
        assert_eq!(yaml.trim(), "GBP");
        let parsed: Currency = serde_yaml::from_str("EUR").unwrap();
        assert_eq!(parsed, Currency::Eur);
    }
}
