use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use sipcast::core::Currency;
use sipcast::core::log::init_logging;
use sipcast::core::projection::{
    MAX_DURATION_YEARS, MIN_MONTHLY_CONTRIBUTION, check_stepped_amount,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List suggested tickers
    Suggest,
    /// Project price trend and SIP value for a ticker
    Project(ProjectArgs),
}

#[derive(Args)]
struct ProjectArgs {
    /// Stock ticker, e.g. AAPL or INFY.NS. Suggestions are shown when omitted
    ticker: Option<String>,

    /// Monthly SIP amount (minimum 100, in steps of 100)
    #[arg(short, long = "monthly", value_parser = parse_contribution)]
    monthly_contribution: Option<f64>,

    /// Lump sum investment amount (in steps of 100)
    #[arg(short, long, value_parser = parse_lump_sum)]
    lump_sum: Option<f64>,

    /// Investment duration in years
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_DURATION_YEARS as i64))]
    years: Option<u32>,

    /// Display currency: USD, INR, EUR, GBP or JPY
    #[arg(long, value_parser = parse_currency)]
    currency: Option<Currency>,

    /// Multiply the monthly amount by 12 before compounding annually
    #[arg(long)]
    annualize_contributions: bool,
}

impl From<ProjectArgs> for sipcast::PlanArgs {
    fn from(args: ProjectArgs) -> sipcast::PlanArgs {
        sipcast::PlanArgs {
            ticker: args.ticker,
            monthly_contribution: args.monthly_contribution,
            lump_sum: args.lump_sum,
            duration_years: args.years,
            currency: args.currency,
            annualize_contributions: args.annualize_contributions,
        }
    }
}

fn parse_stepped_amount(s: &str, name: &str, min: f64) -> Result<f64, String> {
    let amount: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` is not a number"))?;
    check_stepped_amount(name, amount, min).map_err(|e| e.to_string())
}

fn parse_contribution(s: &str) -> Result<f64, String> {
    parse_stepped_amount(s, "monthly contribution", MIN_MONTHLY_CONTRIBUTION)
}

fn parse_lump_sum(s: &str) -> Result<f64, String> {
    parse_stepped_amount(s, "lump sum", 0.0)
}

fn parse_currency(s: &str) -> Result<Currency, String> {
    s.parse::<Currency>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => sipcast::cli::setup::setup(),
        Some(Commands::Suggest) => {
            sipcast::run_command(sipcast::AppCommand::Suggest, config_path).await
        }
        Some(Commands::Project(args)) => {
            sipcast::run_command(sipcast::AppCommand::Project(args.into()), config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
