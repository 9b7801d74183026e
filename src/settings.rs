use anyhow::{Context, bail};
use stats_data::StatsConfig;
use std::net::SocketAddr;

pub const REQUEST_URI_VAR: &str = "STATS_REQUEST_URI";
pub const SAS_TOKEN_VAR: &str = "STATS_SAS_TOKEN";
pub const BIND_VAR: &str = "STATS_BIND";
pub const LOG_VAR: &str = "STATS_LOG";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_LOG: &str = "info";

/// Process-wide settings, read once at startup and never changed afterwards.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub stats: StatsConfig,
    pub bind: SocketAddr,
    pub log_filter: String,
}

impl AppSettings {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(request_uri) = non_empty(REQUEST_URI_VAR) else {
            bail!("{REQUEST_URI_VAR} must be set to the blob container URI");
        };
        let access_token = lookup(SAS_TOKEN_VAR).unwrap_or_default();

        let bind = non_empty(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind: SocketAddr = bind
            .parse()
            .with_context(|| format!("{BIND_VAR}={bind} is not a socket address"))?;

        let log_filter = non_empty(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG.to_owned());

        Ok(Self {
            stats: StatsConfig::new(request_uri.trim(), access_token),
            bind,
            log_filter,
        })
    }
}
