use thiserror::Error;

/// Failure modes for a single outbound upstream call.
///
/// Every variant surfaces to the client as HTTP 500; the `code` string
/// distinguishes the categories in the structured error body.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network-level failure before any HTTP response arrived.
    #[error("transport error reaching {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-2xx status.
    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Upstream answered 2xx but the body was not the expected JSON shape.
    #[error("failed to decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Geolocation answered 2xx but returned no city for the address.
    #[error("city not found for ip {ip}")]
    CityNotFound { ip: String },
}

impl UpstreamError {
    /// Short machine-readable category for structured error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport_error",
            UpstreamError::Status { .. } => "upstream_status",
            UpstreamError::Decode { .. } => "decode_error",
            UpstreamError::CityNotFound { .. } => "city_not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_carries_status_and_body() {
        let err = UpstreamError::Status {
            service: "weather",
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            body: "upstream overloaded".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("upstream overloaded"));
        assert_eq!(err.code(), "upstream_status");
    }

    #[test]
    fn city_not_found_mentions_the_ip() {
        let err = UpstreamError::CityNotFound { ip: "1.2.3.4".to_string() };

        let msg = err.to_string();
        assert!(msg.contains("city not found"));
        assert!(msg.contains("1.2.3.4"));
        assert_eq!(err.code(), "city_not_found");
    }
}
