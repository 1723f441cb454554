//! Projection of a contribution plan against a ticker's price history.
//!
//! [`project_native`] is pure and works in USD. [`apply_conversion`] turns a
//! rate lookup outcome into the final result, converting every monetary field
//! or none of them. [`project`] glues both together around a single
//! [`CurrencyRateProvider`] call.

use crate::core::currency::{Currency, CurrencyRateProvider};
use crate::core::error::ProjectionError;
use crate::core::growth::{self, ContributionBasis};
use crate::core::price::PriceSeries;
use crate::core::stats;
use crate::core::trend;
use tracing::{debug, info, warn};

pub const BASE_CURRENCY: Currency = Currency::Usd;
pub const MAX_DURATION_YEARS: u32 = 30;
pub const MIN_MONTHLY_CONTRIBUTION: f64 = 100.0;
pub const AMOUNT_STEP: f64 = 100.0;

/// Checks a plan amount is finite, at least `min` and a whole multiple of
/// [`AMOUNT_STEP`].
pub fn check_stepped_amount(name: &str, amount: f64, min: f64) -> Result<f64, ProjectionError> {
    if !amount.is_finite() || amount < min {
        return Err(ProjectionError::InvalidRequest(format!(
            "{name} must be at least {min}, got {amount}"
        )));
    }
    if amount % AMOUNT_STEP != 0.0 {
        return Err(ProjectionError::InvalidRequest(format!(
            "{name} must be a multiple of {AMOUNT_STEP}, got {amount}"
        )));
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRequest {
    ticker: String,
    monthly_contribution: f64,
    lump_sum: f64,
    duration_years: u32,
    display_currency: Currency,
    contribution_basis: ContributionBasis,
}

impl ProjectionRequest {
    pub fn new(
        ticker: &str,
        monthly_contribution: f64,
        lump_sum: f64,
        duration_years: u32,
        display_currency: Currency,
    ) -> Result<Self, ProjectionError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(ProjectionError::InvalidRequest(
                "ticker must not be blank".to_string(),
            ));
        }
        for (name, amount) in [
            ("monthly contribution", monthly_contribution),
            ("lump sum", lump_sum),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ProjectionError::InvalidRequest(format!(
                    "{name} must be a non-negative amount, got {amount}"
                )));
            }
        }
        if !(1..=MAX_DURATION_YEARS).contains(&duration_years) {
            return Err(ProjectionError::InvalidRequest(format!(
                "duration must be between 1 and {MAX_DURATION_YEARS} years, got {duration_years}"
            )));
        }

        Ok(ProjectionRequest {
            ticker: ticker.to_uppercase(),
            monthly_contribution,
            lump_sum,
            duration_years,
            display_currency,
            contribution_basis: ContributionBasis::default(),
        })
    }

    pub fn with_contribution_basis(mut self, basis: ContributionBasis) -> Self {
        self.contribution_basis = basis;
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn lump_sum(&self) -> f64 {
        self.lump_sum
    }

    pub fn duration_years(&self) -> u32 {
        self.duration_years
    }

    pub fn display_currency(&self) -> Currency {
        self.display_currency
    }

    pub fn contribution_basis(&self) -> ContributionBasis {
        self.contribution_basis
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    pub predicted_price: f64,
    pub contribution_future_value: f64,
    pub lump_sum_future_value: f64,
    pub total_future_value: f64,
    pub monthly_contribution: f64,
    pub lump_sum: f64,
    /// Currency every monetary field above is expressed in.
    pub currency: Currency,
    pub mean_annual_return: f64,
    pub annual_volatility: f64,
    /// Annual rate implied by moving from the last price to `predicted_price`.
    pub trend_growth_rate: Option<f64>,
    pub currency_conversion_applied: bool,
    pub warning: Option<String>,
}

impl ProjectionResult {
    fn scaled(&self, rate: f64, currency: Currency) -> Self {
        let contribution_future_value = self.contribution_future_value * rate;
        let lump_sum_future_value = self.lump_sum_future_value * rate;
        ProjectionResult {
            predicted_price: self.predicted_price * rate,
            contribution_future_value,
            lump_sum_future_value,
            total_future_value: contribution_future_value + lump_sum_future_value,
            monthly_contribution: self.monthly_contribution * rate,
            lump_sum: self.lump_sum * rate,
            currency,
            currency_conversion_applied: true,
            warning: None,
            ..self.clone()
        }
    }
}

/// Statistics, trend and future value in the base currency. No conversion.
pub fn project_native(
    series: &PriceSeries,
    request: &ProjectionRequest,
) -> Result<ProjectionResult, ProjectionError> {
    let prices = series.prices();
    let years = request.duration_years;

    let stats = stats::return_statistics(&prices)?;
    let predicted_price = trend::project_price(&prices, years)?;
    let payment = request
        .contribution_basis
        .periodic_payment(request.monthly_contribution);
    let fv = growth::future_value(payment, request.lump_sum, stats.mean_annual_return, years)?;

    for (name, value) in [
        ("predicted price", predicted_price),
        ("contribution future value", fv.contribution),
        ("lump sum future value", fv.lump_sum),
    ] {
        if !value.is_finite() {
            return Err(anyhow::anyhow!("{name} is not a finite number ({value})").into());
        }
    }

    let trend_growth_rate = series
        .last_price()
        .and_then(|last| growth::implied_growth_rate(last, predicted_price, years));

    Ok(ProjectionResult {
        predicted_price,
        contribution_future_value: fv.contribution,
        lump_sum_future_value: fv.lump_sum,
        total_future_value: fv.total,
        monthly_contribution: request.monthly_contribution,
        lump_sum: request.lump_sum,
        currency: BASE_CURRENCY,
        mean_annual_return: stats.mean_annual_return,
        annual_volatility: stats.annual_volatility,
        trend_growth_rate,
        currency_conversion_applied: false,
        warning: None,
    })
}

/// Applies the outcome of a rate lookup to a base-currency result.
///
/// A failed lookup is recovered: values stay in the base currency and the
/// result carries a warning.
pub fn apply_conversion(
    native: ProjectionResult,
    target: Currency,
    rate: Result<f64, ProjectionError>,
) -> ProjectionResult {
    if target == native.currency {
        return native;
    }

    let rate = rate.and_then(|r| {
        if r.is_finite() && r > 0.0 {
            Ok(r)
        } else {
            Err(ProjectionError::RateUnavailable {
                currency: target.to_string(),
                reason: format!("provider returned invalid rate {r}"),
            })
        }
    });

    match rate {
        Ok(rate) => {
            debug!("Converting results {} -> {target} at rate {rate}", native.currency);
            native.scaled(rate, target)
        }
        Err(e) => {
            warn!(error = %e, "Currency conversion failed, keeping base currency");
            ProjectionResult {
                warning: Some(format!(
                    "Currency conversion rate not available now. Showing values in {}.",
                    native.currency
                )),
                ..native
            }
        }
    }
}

pub async fn project(
    series: &PriceSeries,
    request: &ProjectionRequest,
    currency_provider: &(dyn CurrencyRateProvider + Send + Sync),
) -> Result<ProjectionResult, ProjectionError> {
    let native = project_native(series, request)?;
    let target = request.display_currency;
    if target == BASE_CURRENCY {
        return Ok(native);
    }

    info!("Fetching {BASE_CURRENCY}->{target} conversion rate");
    let rate = currency_provider
        .get_rate(BASE_CURRENCY.code(), target.code())
        .await
        .map_err(|e| ProjectionError::RateUnavailable {
            currency: target.to_string(),
            reason: e.to_string(),
        });

    Ok(apply_conversion(native, target, rate))
}
