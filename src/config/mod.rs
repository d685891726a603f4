use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000"). Unused by the terminal driver.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// API key sent as `X-Api-Key` on every upstream call
    pub heygen_api_key: String,

    /// Base URL of the remote video service
    #[serde(default = "default_api_base")]
    pub heygen_api_base: String,

    /// Seconds between status queries for a tracked job
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Consecutive failed status queries tolerated before a job is declared failed.
    /// 1 means the first failure is terminal.
    #[serde(default = "default_max_status_failures")]
    pub max_status_failures: u32,

    /// Timeout applied to each upstream HTTP request
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Items per page for avatar and voice listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Output video width in pixels
    #[serde(default = "default_video_width")]
    pub video_width: u32,

    /// Output video height in pixels
    #[serde(default = "default_video_height")]
    pub video_height: u32,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_api_base() -> String {
    "https://api.heygen.com".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_max_status_failures() -> u32 {
    1
}

fn default_upstream_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    9
}

fn default_video_width() -> u32 {
    1280
}

fn default_video_height() -> u32 {
    720
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build a config with defaults for everything but the upstream location.
    pub fn new(heygen_api_key: impl Into<String>, heygen_api_base: impl Into<String>) -> Self {
        Self {
            bind_addr: default_bind_addr(),
            heygen_api_key: heygen_api_key.into(),
            heygen_api_base: heygen_api_base.into(),
            poll_interval_secs: default_poll_interval_secs(),
            max_status_failures: default_max_status_failures(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            page_size: default_page_size(),
            video_width: default_video_width(),
            video_height: default_video_height(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
