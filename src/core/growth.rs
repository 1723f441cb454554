//! Future value of a contribution plan and a lump sum under annual compounding.

use crate::core::error::ProjectionError;
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the monthly contribution enters the annually compounded annuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionBasis {
    /// The monthly amount is used as the payment of each yearly period.
    #[default]
    PerPeriod,
    /// The monthly amount is scaled to a yearly payment (x12) first.
    Annualized,
}

impl ContributionBasis {
    pub fn periodic_payment(&self, monthly_contribution: f64) -> f64 {
        match self {
            ContributionBasis::PerPeriod => monthly_contribution,
            ContributionBasis::Annualized => monthly_contribution * 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FutureValue {
    pub contribution: f64,
    pub lump_sum: f64,
    pub total: f64,
}

/// Future value of an annuity due paying `payment` at the start of each of
/// `years` periods, compounding at `rate`.
pub fn annuity_due_future_value(
    payment: f64,
    rate: f64,
    years: u32,
) -> Result<f64, ProjectionError> {
    check_rate(rate)?;
    if rate == 0.0 {
        return Ok(payment * years as f64);
    }
    let growth = (1.0 + rate).powi(years as i32);
    Ok(payment * ((growth - 1.0) / rate) * (1.0 + rate))
}

pub fn lump_sum_future_value(amount: f64, rate: f64, years: u32) -> Result<f64, ProjectionError> {
    check_rate(rate)?;
    Ok(amount * (1.0 + rate).powi(years as i32))
}

pub fn future_value(
    payment: f64,
    lump_sum: f64,
    rate: f64,
    years: u32,
) -> Result<FutureValue, ProjectionError> {
    let contribution = annuity_due_future_value(payment, rate, years)?;
    let lump_sum = lump_sum_future_value(lump_sum, rate, years)?;
    let fv = FutureValue {
        contribution,
        lump_sum,
        total: contribution + lump_sum,
    };
    debug!(?fv, rate, years, "Computed future value");
    Ok(fv)
}

/// Compound annual rate that takes `start` to `end` over `years`. `None` when
/// either price is not positive.
pub fn implied_growth_rate(start: f64, end: f64, years: u32) -> Option<f64> {
    if start <= 0.0 || end <= 0.0 || years == 0 {
        return None;
    }
    let begin_bal = Decimal::from_f64(start)?;
    let end_bal = Decimal::from_f64(end)?;
    let rate = cagr(begin_bal, end_bal, Decimal::from(years));
    debug!("cagr: {begin_bal}, {end_bal}, {years} = {rate}");
    rate.to_f64()
}

fn check_rate(rate: f64) -> Result<(), ProjectionError> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(ProjectionError::InvalidReturnRate { rate });
    }
    Ok(())
}
