use std::env;
use std::fs;
use std::path::Path;

use quotecraft_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};

use super::CommandResult;

/// Prints effective configuration values with their source
/// (env > file > default).
pub fn run(config_path: Option<&Path>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.map(|path| path.to_path_buf()),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(error.to_string()),
    };

    let file_doc = load_file_doc(config_path);

    let pricing = &config.pricing;
    let entries = [
        ("pricing.tax_rate", pricing.tax_rate.to_string(), "QUOTECRAFT_TAX_RATE"),
        (
            "pricing.profit_tax_rate",
            pricing.profit_tax_rate.to_string(),
            "QUOTECRAFT_PROFIT_TAX_RATE",
        ),
        (
            "pricing.processing_percentage_fee",
            pricing.processing.tiers[0].percentage_fee.to_string(),
            "QUOTECRAFT_PROCESSING_PERCENTAGE_FEE",
        ),
        (
            "pricing.processing_fixed_fee",
            pricing.processing.tiers[0].fixed_fee.to_string(),
            "QUOTECRAFT_PROCESSING_FIXED_FEE",
        ),
        (
            "pricing.min_amount_for_waiver",
            pricing.processing.min_amount_for_waiver.to_string(),
            "QUOTECRAFT_MIN_AMOUNT_FOR_WAIVER",
        ),
        (
            "pricing.annual_commitment_waiver",
            pricing.processing.annual_commitment_waiver.to_string(),
            "QUOTECRAFT_ANNUAL_COMMITMENT_WAIVER",
        ),
        ("pricing.discount_cap", pricing.discount_cap.to_string(), "QUOTECRAFT_DISCOUNT_CAP"),
        ("logging.level", config.logging.level.clone(), "QUOTECRAFT_LOG_LEVEL"),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_lowercase(),
            "QUOTECRAFT_LOG_FORMAT",
        ),
    ];

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_key) in entries {
        lines.push(format!("{key} = {value} ({})", source_of(key, env_key, file_doc.as_ref())));
    }

    CommandResult::success(lines.join("\n"))
}

fn load_file_doc(config_path: Option<&Path>) -> Option<toml::Value> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = std::path::PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return None;
            }
            default
        }
    };
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<toml::Value>().ok()
}

fn source_of(key: &str, env_key: &str, file_doc: Option<&toml::Value>) -> &'static str {
    if env::var(env_key).is_ok() {
        return "env";
    }
    if let Some(doc) = file_doc {
        let mut cursor = Some(doc);
        for part in key.split('.') {
            cursor = cursor.and_then(|value| value.get(part));
        }
        if cursor.is_some() {
            return "file";
        }
    }
    "default"
}
