use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::application::dashboard_service::PollIntervals;

pub const DEFAULT_DEVICE_URL: &str = "http://barepid.local";
const DEFAULT_CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "BAREPID";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DashboardConfig {
    pub device_url: String,
    pub status_interval_ms: u64,
    pub log_interval_ms: u64,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    pub chart_height: usize,
    pub chart_width: usize,
}

impl DashboardConfig {
    pub fn poll_intervals(&self) -> PollIntervals {
        PollIntervals {
            status: Duration::from_millis(self.status_interval_ms),
            log: Duration::from_millis(self.log_interval_ms),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Load settings: defaults, then `config/dashboard.*` (or `file`), then
/// `BAREPID_*` environment variables, then the `--device` flag.
pub fn load_dashboard_config(
    file: Option<&Path>,
    device_override: Option<String>,
) -> anyhow::Result<DashboardConfig> {
    build_config(
        file,
        config::Environment::with_prefix(ENV_PREFIX),
        device_override,
    )
}

fn build_config(
    file: Option<&Path>,
    environment: config::Environment,
    device_override: Option<String>,
) -> anyhow::Result<DashboardConfig> {
    let file_source = match file {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .set_default("device_url", DEFAULT_DEVICE_URL)?
        .set_default("status_interval_ms", 5000_i64)?
        .set_default("log_interval_ms", 5000_i64)?
        .set_default("chart_height", 10_i64)?
        .set_default("chart_width", 60_i64)?
        .add_source(file_source)
        .add_source(environment)
        .set_override_option("device_url", device_override)?
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    if config.status_interval_ms == 0 || config.log_interval_ms == 0 {
        anyhow::bail!(
            "Poll intervals must be positive (status_interval_ms = {}, log_interval_ms = {})",
            config.status_interval_ms,
            config.log_interval_ms
        );
    }
    Ok(config)
}
