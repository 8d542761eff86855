use agrod_core::CropType;
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/detect";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "agrod.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: String,
    pub crop: CropType,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub seed: Option<u64>,
    pub debug: bool,
}

/// Loads `.env`, then reads the process environment.
pub fn init_app_config() -> Result<AppConfig> {
    dotenv().ok();
    config_from(|key| env::var(key).ok())
}

/// Builds the configuration from any key lookup.
pub fn config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig> {
    let endpoint = lookup("AGROD_ENDPOINT")
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let crop = match lookup("AGROD_CROP") {
        Some(value) => {
            CropType::parse(&value).ok_or_else(|| eyre!("Unknown crop type in AGROD_CROP: {value}"))?
        }
        None => CropType::default(),
    };

    let timeout_secs = match lookup("AGROD_TIMEOUT_SECS") {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|e| eyre!("Invalid AGROD_TIMEOUT_SECS {value:?}: {e}"))?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    let seed = lookup("AGROD_SEED")
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|e| eyre!("Invalid AGROD_SEED {value:?}: {e}"))
        })
        .transpose()?;

    let log_file = lookup("AGROD_LOG").map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);
    let debug = lookup("DEBUG").is_some_and(|value| value != "0" && !value.is_empty());

    Ok(AppConfig {
        endpoint,
        crop,
        timeout: Duration::from_secs(timeout_secs),
        log_file,
        seed,
        debug,
    })
}
