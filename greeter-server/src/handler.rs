//! The request pipeline: client IP, geolocation, weather, greeting.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use greeter_core::{GeoProvider, Location, ResponseFormat, UpstreamError, WeatherProvider};
use serde::{Deserialize, Serialize};

use crate::ip::client_ip;

const DEFAULT_VISITOR: &str = "Guest";

/// Shared per-process state. The providers are trait objects so tests can
/// substitute stubs without a live network.
#[derive(Clone)]
pub struct AppState {
    pub geo: Arc<dyn GeoProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub format: ResponseFormat,
}

/// Both deployment variants of the route are served by the same handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/api/hello", get(hello))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct HelloParams {
    visitor: Option<String>,
}

#[derive(Debug, Serialize)]
struct HelloResponse {
    client_ip: String,
    location: String,
    greeting: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

async fn hello(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Query(params): Query<HelloParams>,
    headers: HeaderMap,
) -> Response {
    let ip = client_ip(&headers, remote);

    let location = match state.geo.resolve(&ip).await {
        Ok(location) => location,
        Err(err) => return failure(state.format, &err),
    };

    // resolve() guarantees a non-empty city, so the weather call is safe.
    let weather = match state.weather.resolve(&location.city).await {
        Ok(weather) => weather,
        Err(err) => return failure(state.format, &err),
    };

    let visitor = params
        .visitor
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_VISITOR);

    let greeting = format!(
        "Hello, {visitor}!, the temperature is {:.2} degrees Celsius in {}",
        weather.temperature_c, location.city
    );

    match state.format {
        ResponseFormat::Json => {
            let body = HelloResponse {
                client_ip: ip,
                location: location.city,
                greeting,
            };
            tracing::info!(client_ip = %body.client_ip, response = ?body, "served greeting");
            Json(body).into_response()
        }
        ResponseFormat::Text => {
            let body = text_body(&ip, &location, &greeting);
            tracing::info!(client_ip = %ip, response = %body, "served greeting");
            body.into_response()
        }
    }
}

fn text_body(ip: &str, location: &Location, greeting: &str) -> String {
    let (latitude, longitude) = location.coordinates();
    format!(
        "{greeting}\n\
         IP: {ip}\n\
         City: {}\n\
         Region: {}\n\
         Country: {}\n\
         Latitude: {latitude}\n\
         Longitude: {longitude}\n",
        location.city, location.region, location.country
    )
}

/// Every failure category maps to HTTP 500; the body distinguishes them.
fn failure(format: ResponseFormat, err: &UpstreamError) -> Response {
    tracing::warn!(code = err.code(), "request failed: {err}");

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    match format {
        ResponseFormat::Json => {
            let body = ErrorBody {
                code: err.code(),
                message: err.to_string(),
            };
            (status, Json(body)).into_response()
        }
        ResponseFormat::Text => (status, format!("Error: {err}")).into_response(),
    }
}
