use crate::{Location, UpstreamError, Weather};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod ipinfo;
pub mod openweather;

/// Maps a client IP address to an approximate location.
///
/// Implementations must return [`UpstreamError::CityNotFound`] when the
/// lookup succeeds but yields no city, so callers never proceed to the
/// weather step with an empty city.
#[async_trait]
pub trait GeoProvider: Send + Sync + Debug {
    async fn resolve(&self, ip: &str) -> Result<Location, UpstreamError>;
}

/// Fetches current conditions for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Weather, UpstreamError>;
}

/// Upstream error bodies are diagnostics, not payloads; keep them short.
/// The cut must land on a char boundary: error bodies are
/// upstream-controlled and may hold multi-byte text.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
