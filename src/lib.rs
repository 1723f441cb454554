pub mod cli;
pub mod core;
pub mod providers;

pub use cli::project::PlanArgs;

use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Project(PlanArgs),
    Suggest,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("sipcast starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Suggest => {
            cli::suggest::run();
            Ok(())
        }
        AppCommand::Project(args) => {
            let base_url = config.yahoo_base_url();
            let history_provider = providers::YahooFinanceProvider::new(base_url);
            let currency_provider = providers::YahooCurrencyProvider::new(base_url);
            cli::project::run(&args, &config, &history_provider, &currency_provider).await
        }
    }
}
