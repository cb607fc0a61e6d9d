use anyhow::{Context, Result, anyhow};
use std::{convert::TryFrom, env, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_GEO_BASE_URL: &str = "https://ipinfo.io";
const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Which body shape the handler emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `{"client_ip", "location", "greeting"}` with `application/json`.
    #[default]
    Json,
    /// Multi-line greeting plus location fields, plain text.
    Text,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Text => "text",
        }
    }
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResponseFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "json" => Ok(ResponseFormat::Json),
            "text" => Ok(ResponseFormat::Text),
            _ => Err(anyhow!(
                "Unknown response format '{value}'. Supported formats: json, text."
            )),
        }
    }
}

/// Runtime configuration, read once at startup.
///
/// Upstream credentials are never compiled into the binary; a missing key
/// fails startup with a hint naming the variable to set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the server binds on.
    pub port: u16,
    /// Geolocation API base URL, without a trailing slash.
    pub geo_base_url: String,
    /// Geolocation API access token.
    pub geo_token: String,
    /// Weather API base URL.
    pub weather_base_url: String,
    /// Weather API access key.
    pub weather_api_key: String,
    /// Body shape for successful and failed responses alike.
    pub response_format: ResponseFormat,
    /// Per-request deadline for each outbound call.
    pub upstream_timeout: Duration,
}

impl Config {
    /// Load configuration from `GREETER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Tests pass a closure over a
    /// map instead of mutating the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match get("GREETER_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("GREETER_PORT is not a valid port number: '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        let geo_base_url = get("GREETER_GEO_URL")
            .unwrap_or_else(|| DEFAULT_GEO_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let geo_token = get("GREETER_GEO_TOKEN").ok_or_else(|| {
            anyhow!(
                "GREETER_GEO_TOKEN is not set.\n\
                 Hint: supply an ipinfo.io access token via the environment."
            )
        })?;

        let weather_base_url = get("GREETER_WEATHER_URL")
            .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let weather_api_key = get("GREETER_WEATHER_KEY").ok_or_else(|| {
            anyhow!(
                "GREETER_WEATHER_KEY is not set.\n\
                 Hint: supply an OpenWeatherMap API key via the environment."
            )
        })?;

        let response_format = match get("GREETER_RESPONSE_FORMAT") {
            Some(raw) => ResponseFormat::try_from(raw.as_str())?,
            None => ResponseFormat::default(),
        };

        let upstream_timeout = match get("GREETER_UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().with_context(|| {
                    format!("GREETER_UPSTREAM_TIMEOUT_SECS is not a valid number: '{raw}'")
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            port,
            geo_base_url,
            geo_token,
            weather_base_url,
            weather_api_key,
            response_format,
            upstream_timeout,
        })
    }
}
