//! Binary crate for the weather greeting HTTP service.
//!
//! This crate focuses on:
//! - Deriving the client IP from proxy headers or the socket address
//! - Driving the geolocation and weather lookups from `greeter-core`
//! - Formatting the greeting response (JSON or plain text)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use greeter_core::Config;
use greeter_core::client::{ipinfo::IpInfoClient, openweather::OpenWeatherClient};
use tracing_subscriber::EnvFilter;

mod handler;
mod ip;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // One pooled client, shared by both upstreams.
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let state = handler::AppState {
        geo: Arc::new(IpInfoClient::new(
            http.clone(),
            config.geo_base_url.as_str(),
            config.geo_token.as_str(),
        )),
        weather: Arc::new(OpenWeatherClient::new(
            http,
            config.weather_base_url.as_str(),
            config.weather_api_key.as_str(),
        )),
        format: config.response_format,
    };

    let app = handler::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, format = %config.response_format, "listening");

    // ConnectInfo supplies the remote address used when no proxy header is set.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
