use ioc::Bean;
use std::{env, num::ParseIntError, time::Duration};

/// Settings shared by the catalog services
#[derive(Debug, Bean)]
#[bean(opaque)]
pub(crate) struct AppConfig {
    pub(crate) debug: bool,
    pub(crate) database_url: String,
    pub(crate) quota_reset: Duration,
    pub(crate) max_quota: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: true,
            database_url: "memory://localhost/products".into(),
            quota_reset: Duration::from_secs(60 * 60),
            max_quota: 5,
        }
    }
}

impl AppConfig {
    /// Reads the settings from `CATALOG_*` environment variables,
    /// falling back to the defaults for the missing ones
    pub(crate) fn from_env() -> Result<Self, ParseIntError> {
        let mut config = Self::default();
        if let Ok(url) = env::var("CATALOG_DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(max_quota) = env::var("CATALOG_MAX_QUOTA") {
            config.max_quota = max_quota.parse()?;
        }
        if let Ok(secs) = env::var("CATALOG_QUOTA_RESET_SECS") {
            config.quota_reset = Duration::from_secs(secs.parse()?);
        }
        if let Ok(level) = env::var("CATALOG_LOG_LEVEL") {
            config.debug = level.eq_ignore_ascii_case("debug");
        }
        Ok(config)
    }
}
