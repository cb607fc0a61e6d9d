use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{UpstreamError, Weather, client::truncate_body};

use super::WeatherProvider;

const SERVICE: &str = "weather";

/// Client for the OpenWeatherMap current-weather API.
///
/// `GET {base}?q={city}&appid={key}&units=metric`; the city name is
/// URL-escaped by the query encoder, so spaces and punctuation survive
/// the round trip to the upstream.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwCondition>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn resolve(&self, city: &str) -> Result<Weather, UpstreamError> {
        tracing::debug!(%city, "looking up current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
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

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|source| UpstreamError::Decode { service: SERVICE, source })?;

        Ok(Weather {
            temperature_c: parsed.main.temp,
            descriptions: parsed.weather.into_iter().map(|w| w.description).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new(Client::new(), server.uri(), "test-key")
    }

    #[tokio::test]
    async fn resolves_temperature_and_descriptions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 18.5},
                "weather": [{"description": "light rain"}],
            })))
            .mount(&server)
            .await;

        let weather = client(&server)
            .resolve("Paris")
            .await
            .expect("lookup should succeed");

        assert_eq!(weather.temperature_c, 18.5);
        assert_eq!(weather.descriptions, vec!["light rain".to_string()]);
    }

    // The matcher compares the decoded query value, so the request must have
    // escaped the city name on the wire for this to match.
    #[tokio::test]
    async fn city_names_are_url_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "San José, C.R."))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"main": {"temp": 27.0}})),
            )
            .mount(&server)
            .await;

        let weather = client(&server)
            .resolve("San José, C.R.")
            .await
            .expect("escaped city lookup should succeed");

        assert_eq!(weather.temperature_c, 27.0);
    }

    #[tokio::test]
    async fn missing_description_list_yields_empty_descriptions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"main": {"temp": -3.25}})),
            )
            .mount(&server)
            .await;

        let weather = client(&server)
            .resolve("Oslo")
            .await
            .expect("lookup without conditions should succeed");

        assert_eq!(weather.temperature_c, -3.25);
        assert!(weather.descriptions.is_empty());
    }

    #[tokio::test]
    async fn upstream_503_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let err = client(&server).resolve("Paris").await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("down for maintenance"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"main\":"))
            .mount(&server)
            .await;

        let err = client(&server).resolve("Paris").await.unwrap_err();

        assert!(matches!(err, UpstreamError::Decode { .. }));
    }
}
