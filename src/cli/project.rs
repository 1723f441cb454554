use super::{suggest, ui};
use crate::core::config::AppConfig;
use crate::core::growth::ContributionBasis;
use crate::core::pipeline::{self, Forecast};
use crate::core::projection::{MIN_MONTHLY_CONTRIBUTION, check_stepped_amount};
use crate::core::trend::TrendLine;
use crate::core::{
    Currency, CurrencyRateProvider, HistoryProvider, PriceSeries, ProjectionError,
    ProjectionRequest, ProjectionResult,
};
use anyhow::Result;
use comfy_table::{Attribute, Cell, CellAlignment, Table};
use tracing::{debug, error};

const CHART_WIDTH: usize = 30;

/// Plan inputs as given on the command line. Missing values come from config.
#[derive(Debug, Clone, Default)]
pub struct PlanArgs {
    pub ticker: Option<String>,
    pub monthly_contribution: Option<f64>,
    pub lump_sum: Option<f64>,
    pub duration_years: Option<u32>,
    pub currency: Option<Currency>,
    pub annualize_contributions: bool,
}

impl PlanArgs {
    /// Ticker to project, `None` when blank.
    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn to_request(
        &self,
        ticker: &str,
        config: &AppConfig,
    ) -> Result<ProjectionRequest, ProjectionError> {
        let basis = if self.annualize_contributions {
            ContributionBasis::Annualized
        } else {
            config.contribution_basis
        };
        let monthly_contribution = check_stepped_amount(
            "monthly contribution",
            self.monthly_contribution
                .unwrap_or(config.defaults.monthly_contribution),
            MIN_MONTHLY_CONTRIBUTION,
        )?;
        let lump_sum = check_stepped_amount(
            "lump sum",
            self.lump_sum.unwrap_or(config.defaults.lump_sum),
            0.0,
        )?;
        let request = ProjectionRequest::new(
            ticker,
            monthly_contribution,
            lump_sum,
            self.duration_years
                .unwrap_or(config.defaults.duration_years),
            self.currency.unwrap_or(config.currency),
        )?;
        Ok(request.with_contribution_basis(basis))
    }
}

/// Handles one projection request. Every request failure is reported to the
/// user here; only terminal output errors escape.
pub async fn run(
    args: &PlanArgs,
    config: &AppConfig,
    history_provider: &(dyn HistoryProvider + Send + Sync),
    currency_provider: &(dyn CurrencyRateProvider + Send + Sync),
) -> Result<()> {
    let Some(ticker) = args.ticker() else {
        suggest::run();
        return Ok(());
    };

    let request = match args.to_request(ticker, config) {
        Ok(request) => request,
        Err(e) => {
            report_error(&e);
            return Ok(());
        }
    };
    debug!(?request, "Built projection request");

    let spinner = ui::new_spinner(&format!("Fetching price history for {}", request.ticker()));
    let outcome = pipeline::run(&request, history_provider, currency_provider).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(forecast) => display_forecast(&request, &forecast),
        Err(e) => report_error(&e),
    }
    Ok(())
}

pub fn error_message(err: &ProjectionError) -> String {
    match err {
        ProjectionError::Unexpected(e) => format!("An error occurred: {e}"),
        other => other.to_string(),
    }
}

fn report_error(err: &ProjectionError) {
    error!(error = ?err, "Projection failed");
    println!("{}", ui::style_text(&error_message(err), ui::StyleType::Error));
}

pub fn history_table(series: &PriceSeries) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell(&format!("Adj Close ({})", series.currency())),
        ui::header_cell("Trend"),
        ui::header_cell(""),
    ]);

    let trend = TrendLine::fit(&series.prices()).ok();
    let max = series
        .points()
        .iter()
        .map(|p| p.price)
        .fold(0.0_f64, f64::max);

    for (i, point) in series.points().iter().enumerate() {
        let trend_cell = match &trend {
            Some(line) => Cell::new(format!("{:.2}", line.value_at(i as f64)))
                .set_alignment(CellAlignment::Right),
            None => ui::na_cell(),
        };
        table.add_row(vec![
            Cell::new(point.date.format("%Y-%m")),
            Cell::new(format!("{:.2}", point.price)).set_alignment(CellAlignment::Right),
            trend_cell,
            Cell::new(ui::bar(point.price, max, CHART_WIDTH)),
        ]);
    }
    table
}

pub fn results_table(result: &ProjectionResult) -> Table {
    let currency = result.currency.code();
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Estimate"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("Predicted Stock Price"),
        ui::amount_cell(result.predicted_price, currency),
    ]);
    table.add_row(vec![
        Cell::new("Monthly SIP Amount"),
        ui::amount_cell(result.monthly_contribution, currency),
    ]);
    table.add_row(vec![
        Cell::new("SIP Future Value"),
        ui::amount_cell(result.contribution_future_value, currency),
    ]);
    table.add_row(vec![
        Cell::new("Lump Sum Future Value"),
        ui::amount_cell(result.lump_sum_future_value, currency),
    ]);
    table.add_row(vec![
        Cell::new("Estimated SIP Investment Value").add_attribute(Attribute::Bold),
        ui::total_cell(result.total_future_value, currency),
    ]);
    table.add_row(vec![
        Cell::new("Mean Annual Return"),
        ui::change_cell(result.mean_annual_return),
    ]);
    table.add_row(vec![
        Cell::new("Trend-implied Annual Growth"),
        result.trend_growth_rate.map_or_else(ui::na_cell, ui::change_cell),
    ]);
    table.add_row(vec![
        Cell::new("Estimated Risk (Annual Volatility)"),
        Cell::new(ui::format_percentage(result.annual_volatility))
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

fn display_forecast(request: &ProjectionRequest, forecast: &Forecast) {
    let title = format!(
        "Historical Adjusted Close Prices of {}",
        forecast.series.ticker()
    );
    println!("\n{}", ui::style_text(&title, ui::StyleType::Title));
    println!("{}", history_table(&forecast.series));

    if let Some(warning) = &forecast.result.warning {
        println!("{}", ui::style_text(warning, ui::StyleType::Warning));
    }

    let title = format!(
        "Predicted Results for {} Years",
        request.duration_years()
    );
    println!("\n{}", ui::style_text(&title, ui::StyleType::Title));
    println!("{}", results_table(&forecast.result));

    ui::print_separator();
    println!(
        "{}",
        ui::style_text(
            "Illustrative estimate from historical prices: a straight-line price trend and \
             compounding at the historical mean return. Not investment advice.",
            ui::StyleType::Subtle
        )
    );
}
