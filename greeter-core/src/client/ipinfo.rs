use async_trait::async_trait;
use reqwest::Client;

use crate::{Location, UpstreamError, client::truncate_body};

use super::GeoProvider;

const SERVICE: &str = "geolocation";

/// Client for the ipinfo.io IP lookup API.
///
/// `GET {base}/{ip}?token={token}` returning `{ip, city, region, country, loc}`.
#[derive(Debug, Clone)]
pub struct IpInfoClient {
    http: Client,
    base_url: String,
    token: String,
}

impl IpInfoClient {
    pub fn new(http: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl GeoProvider for IpInfoClient {
    async fn resolve(&self, ip: &str) -> Result<Location, UpstreamError> {
        let url = format!("{}/{ip}", self.base_url);
        tracing::debug!(%ip, "looking up geolocation");

        let res = self
            .http
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { service: SERVICE, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| UpstreamError::Transport { service: SERVICE, source })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                service: SERVICE,
                status,
                body: truncate_body(&body),
            });
        }

        let location: Location = serde_json::from_str(&body)
            .map_err(|source| UpstreamError::Decode { service: SERVICE, source })?;

        // The HTTP call can succeed while the lookup itself finds nothing.
        if location.city.is_empty() {
            return Err(UpstreamError::CityNotFound { ip: ip.to_string() });
        }

        Ok(location)
    }
}
