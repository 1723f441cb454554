use crate::core::currency::Currency;
use crate::core::growth::ContributionBasis;
use crate::core::projection::{
    MAX_DURATION_YEARS, MIN_MONTHLY_CONTRIBUTION, check_stepped_amount,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

/// Plan values used when the command line leaves them out.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlanDefaults {
    pub monthly_contribution: f64,
    pub lump_sum: f64,
    pub duration_years: u32,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        PlanDefaults {
            monthly_contribution: 1000.0,
            lump_sum: 0.0,
            duration_years: 5,
        }
    }
}

impl PlanDefaults {
    /// Applies the same amount and duration rules as the command line.
    pub fn validate(&self) -> Result<()> {
        check_stepped_amount(
            "defaults.monthly_contribution",
            self.monthly_contribution,
            MIN_MONTHLY_CONTRIBUTION,
        )?;
        check_stepped_amount("defaults.lump_sum", self.lump_sum, 0.0)?;
        if !(1..=MAX_DURATION_YEARS).contains(&self.duration_years) {
            anyhow::bail!(
                "defaults.duration_years must be between 1 and {MAX_DURATION_YEARS}, got {}",
                self.duration_years
            );
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub defaults: PlanDefaults,
    #[serde(default)]
    pub contribution_basis: ContributionBasis,
}

impl AppConfig {
    /// Loads the config at the default location, falling back to built-in
    /// defaults when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "sipcast")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .defaults
            .validate()
            .with_context(|| format!("Invalid plan defaults in {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn yahoo_base_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
currency: "INR"
defaults:
  monthly_contribution: 2500
  lump_sum: 10000
  duration_years: 10
contribution_basis: annualized
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.yahoo_base_url(), "http://example.com/yahoo");
        assert_eq!(config.currency, Currency::Inr);
        assert_eq!(config.defaults.monthly_contribution, 2500.0);
        assert_eq!(config.defaults.lump_sum, 10000.0);
        assert_eq!(config.defaults.duration_years, 10);
        assert_eq!(config.contribution_basis, ContributionBasis::Annualized);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let yaml_str = r#"
currency: "EUR"
defaults:
  duration_years: 3
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, Currency::Eur);
        assert_eq!(config.yahoo_base_url(), DEFAULT_YAHOO_BASE_URL);
        assert_eq!(config.defaults.duration_years, 3);
        assert_eq!(config.defaults.monthly_contribution, 1000.0);
        assert_eq!(config.contribution_basis, ContributionBasis::PerPeriod);
    }

    #[test]
    fn test_unsupported_currency_is_rejected() {
        let result = serde_yaml::from_str::<AppConfig>("currency: \"CAD\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_defaults_follow_input_rules() {
        assert!(PlanDefaults::default().validate().is_ok());

        for defaults in [
            PlanDefaults {
                monthly_contribution: 50.0,
                ..Default::default()
            },
            PlanDefaults {
                monthly_contribution: 1050.0,
                ..Default::default()
            },
            PlanDefaults {
                lump_sum: 150.0,
                ..Default::default()
            },
            PlanDefaults {
                duration_years: 0,
                ..Default::default()
            },
            PlanDefaults {
                duration_years: 31,
                ..Default::default()
            },
        ] {
            assert!(defaults.validate().is_err(), "accepted {defaults:?}");
        }
    }

    #[test]
    fn test_load_rejects_off_step_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "defaults:\n  monthly_contribution: 50\n  lump_sum: 150\n").unwrap();

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid plan defaults"));
        assert!(
            format!("{err:#}").contains("defaults.monthly_contribution must be at least 100")
        );

        fs::write(&path, "defaults:\n  monthly_contribution: 200\n  lump_sum: 300\n").unwrap();
        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.defaults.monthly_contribution, 200.0);
        assert_eq!(config.defaults.lump_sum, 300.0);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("nope.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
