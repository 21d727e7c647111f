//! Application configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Address language asked of the geocoder when none is configured
pub const DEFAULT_GEOCODER_LANGUAGE: &str = "en";

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port
    pub server_port: u16,

    /// Reverse geocoder base URL (Nominatim-compatible)
    pub geocoder_base_url: String,
    /// User-Agent sent to the geocoder; Nominatim's usage policy requires one
    pub geocoder_user_agent: String,
    /// Preferred language for returned addresses
    pub geocoder_language: String,
    pub geocode_timeout: Duration,

    /// Deadline for the device to produce a fix
    pub location_fix_timeout: Duration,

    /// Endpoint submissions are posted to. Kept in memory when unset.
    pub case_sink_url: Option<String>,
    /// Deadline for the case sink to acknowledge a submission
    pub case_sink_timeout: Duration,

    /// Sessions untouched for this long are discarded
    pub session_idle_timeout: Duration,
}

fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .with_context(|| format!("{} must be a valid number", name))
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| {
                format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }),
            geocoder_language: env::var("GEOCODER_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_LANGUAGE.to_string()),
            geocode_timeout: Duration::from_secs(parse_var("GEOCODE_TIMEOUT_SECS", "8")?),

            location_fix_timeout: Duration::from_millis(parse_var(
                "LOCATION_FIX_TIMEOUT_MS",
                "10000",
            )?),

            case_sink_url: env::var("CASE_SINK_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            case_sink_timeout: Duration::from_secs(parse_var("CASE_SINK_TIMEOUT_SECS", "15")?),

            session_idle_timeout: Duration::from_secs(
                parse_var::<u64>("SESSION_IDLE_MINUTES", "30")? * 60,
            ),
        })
    }
}
