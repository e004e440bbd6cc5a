// ⚙️ Configuration - environment-resolved endpoint and view settings

use crate::entities::company::DEFAULT_HOME_BUILDER;
use crate::error::{PlanBoardError, Result};
use crate::pipeline::DEFAULT_PAGE_SIZE;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

pub const ENV_API_URL: &str = "PLAN_BOARD_API_URL";
pub const ENV_POLL_SECS: &str = "PLAN_BOARD_POLL_SECS";
pub const ENV_TIMEOUT_SECS: &str = "PLAN_BOARD_TIMEOUT_SECS";
pub const ENV_HOME_BUILDER: &str = "PLAN_BOARD_HOME_BUILDER";
pub const ENV_PAGE_SIZE: &str = "PLAN_BOARD_PAGE_SIZE";

/// Development default (debug builds)
pub const DEV_API_URL: &str = "http://localhost:8080/api";

/// Production default (release builds): same-origin /api behind the local proxy
pub const PROD_API_URL: &str = "http://127.0.0.1/api";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Base URL; plans are fetched from `{api_base}/plans`
    pub api_base: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// Listed first in company views
    pub home_builder: String,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: default_api_url().to_string(),
            poll_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(10),
            home_builder: DEFAULT_HOME_BUILDER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Resolve from an explicit variable map (empty values count as unset)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        if let Some(url) = get(ENV_API_URL) {
            config.api_base = url.to_string();
        }
        if let Some(secs) = get(ENV_POLL_SECS) {
            config.poll_interval = Duration::from_secs(parse_positive(ENV_POLL_SECS, secs)?);
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_positive(ENV_TIMEOUT_SECS, secs)?);
        }
        if let Some(builder) = get(ENV_HOME_BUILDER) {
            config.home_builder = builder.to_string();
        }
        if let Some(size) = get(ENV_PAGE_SIZE) {
            config.page_size = parse_positive(ENV_PAGE_SIZE, size)? as usize;
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

fn default_api_url() -> &'static str {
    if cfg!(debug_assertions) {
        DEV_API_URL
    } else {
        PROD_API_URL
    }
}

fn parse_positive(name: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(PlanBoardError::Config(format!(
            "{} must be a positive integer, got '{}'",
            name, value
        ))),
    }
}
