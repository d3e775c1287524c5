//! Environment-driven settings for the storefront session.

use std::path::PathBuf;

use anyhow::Context;

use stroymarket_cart::{CART_STORAGE_KEY, default_data_dir};
use stroymarket_observability::LogFormat;

pub const DATA_DIR_VAR: &str = "STROYMARKET_DATA_DIR";
pub const CART_KEY_VAR: &str = "STROYMARKET_CART_KEY";
pub const LOG_FORMAT_VAR: &str = "STROYMARKET_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory of the file-backed key-value store.
    pub data_dir: PathBuf,
    pub cart_key: String,
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or blank variables take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = match var(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().context("no STROYMARKET_DATA_DIR set and no default data dir")?,
        };

        let cart_key = var(CART_KEY_VAR).unwrap_or_else(|| CART_STORAGE_KEY.to_string());

        let log_format = match var(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .with_context(|| format!("invalid {LOG_FORMAT_VAR}"))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            data_dir,
            cart_key,
            log_format,
        })
    }
}
