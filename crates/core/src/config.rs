//! Layered configuration: defaults, then an optional TOML file, then
//! `QUOTECRAFT_*` environment variables, then explicit overrides.
//!
//! Only the scalar pricing knobs are configurable; the lookup tables stay in
//! `PricingPolicy::default()`.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::PricingPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "quotecraft.toml";

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub pricing: PricingPolicy,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

/// Programmatic overrides, applied last. Used by the CLI flags and by tests.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub tax_rate: Option<f64>,
    pub profit_tax_rate: Option<f64>,
    pub processing_percentage_fee: Option<f64>,
    pub processing_fixed_fee: Option<f64>,
    pub min_amount_for_waiver: Option<f64>,
    pub annual_commitment_waiver: Option<bool>,
    pub discount_cap: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid override for `{key}`: `{value}`")]
    InvalidOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    pricing: FilePricing,
    #[serde(default)]
    logging: FileLogging,
}

#[derive(Debug, Default, Deserialize)]
struct FilePricing {
    tax_rate: Option<f64>,
    profit_tax_rate: Option<f64>,
    processing_percentage_fee: Option<f64>,
    processing_fixed_fee: Option<f64>,
    min_amount_for_waiver: Option<f64>,
    annual_commitment_waiver: Option<bool>,
    discount_cap: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogging {
    level: Option<String>,
    format: Option<String>,
}

impl AppConfig {
    /// Loads configuration with process environment lookups.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        Self::load_from(options, |key| std::env::var(key).ok())
    }

    /// Loads configuration with an injectable environment, so tests never
    /// touch process-global state.
    pub fn load_from(
        options: LoadOptions,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = options.config_path.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        });
        match path {
            Some(path) if path.exists() => {
                let raw = fs::read_to_string(&path)
                    .map_err(|source| ConfigError::ReadFile { path: path.clone(), source })?;
                let file: FileConfig = toml::from_str(&raw)
                    .map_err(|source| ConfigError::ParseFile { path: path.clone(), source })?;
                config.apply_file(file)?;
            }
            // An explicitly named file must exist; the implicit default may
            // be absent unless the caller requires one.
            Some(path) => return Err(ConfigError::MissingConfigFile(path)),
            None => {
                if options.require_file {
                    return Err(ConfigError::MissingConfigFile(PathBuf::from(
                        DEFAULT_CONFIG_FILE,
                    )));
                }
            }
        }

        config.apply_env(&env)?;
        config.apply_overrides(&options.overrides)?;

        config
            .pricing
            .validate()
            .map_err(|error| ConfigError::Validation(error.to_string()))?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        let pricing = file.pricing;
        self.set_pricing_scalars(
            pricing.tax_rate,
            pricing.profit_tax_rate,
            pricing.processing_percentage_fee,
            pricing.processing_fixed_fee,
            pricing.min_amount_for_waiver,
            pricing.annual_commitment_waiver,
            pricing.discount_cap,
        )?;
        if let Some(level) = file.logging.level {
            self.logging.level = level;
        }
        if let Some(format) = file.logging.format {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(level) = env("QUOTECRAFT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env("QUOTECRAFT_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        self.set_pricing_scalars(
            parse_env_f64(env, "QUOTECRAFT_TAX_RATE")?,
            parse_env_f64(env, "QUOTECRAFT_PROFIT_TAX_RATE")?,
            parse_env_f64(env, "QUOTECRAFT_PROCESSING_PERCENTAGE_FEE")?,
            parse_env_f64(env, "QUOTECRAFT_PROCESSING_FIXED_FEE")?,
            parse_env_f64(env, "QUOTECRAFT_MIN_AMOUNT_FOR_WAIVER")?,
            parse_env_bool(env, "QUOTECRAFT_ANNUAL_COMMITMENT_WAIVER")?,
            parse_env_f64(env, "QUOTECRAFT_DISCOUNT_CAP")?,
        )
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if let Some(format) = &overrides.log_format {
            self.logging.format = format.parse()?;
        }
        self.set_pricing_scalars(
            overrides.tax_rate,
            overrides.profit_tax_rate,
            overrides.processing_percentage_fee,
            overrides.processing_fixed_fee,
            overrides.min_amount_for_waiver,
            overrides.annual_commitment_waiver,
            overrides.discount_cap,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn set_pricing_scalars(
        &mut self,
        tax_rate: Option<f64>,
        profit_tax_rate: Option<f64>,
        processing_percentage_fee: Option<f64>,
        processing_fixed_fee: Option<f64>,
        min_amount_for_waiver: Option<f64>,
        annual_commitment_waiver: Option<bool>,
        discount_cap: Option<f64>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = tax_rate {
            self.pricing.tax_rate = decimal_value("tax_rate", value)?;
        }
        if let Some(value) = profit_tax_rate {
            self.pricing.profit_tax_rate = decimal_value("profit_tax_rate", value)?;
        }
        if let Some(value) = processing_percentage_fee {
            // The base (tier 0) schedule is the configurable one; higher
            // volume tiers keep their relative discounts.
            self.pricing.processing.tiers[0].percentage_fee =
                decimal_value("processing_percentage_fee", value)?;
        }
        if let Some(value) = processing_fixed_fee {
            self.pricing.processing.tiers[0].fixed_fee =
                decimal_value("processing_fixed_fee", value)?;
        }
        if let Some(value) = min_amount_for_waiver {
            self.pricing.processing.min_amount_for_waiver =
                decimal_value("min_amount_for_waiver", value)?;
        }
        if let Some(value) = annual_commitment_waiver {
            self.pricing.processing.annual_commitment_waiver = value;
        }
        if let Some(value) = discount_cap {
            self.pricing.discount_cap = decimal_value("discount_cap", value)?;
        }
        Ok(())
    }
}

fn decimal_value(key: &str, value: f64) -> Result<Decimal, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidOverride { key: key.to_string(), value: value.to_string() });
    }
    Decimal::try_from(value).map_err(|_| ConfigError::InvalidOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_env_f64(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<f64>, ConfigError> {
    match env(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<f64>().map(Some).map_err(|_| {
            ConfigError::InvalidOverride { key: key.to_string(), value: raw }
        }),
    }
}

fn parse_env_bool(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<bool>, ConfigError> {
    match env(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidOverride { key: key.to_string(), value: raw }),
        },
    }
}
