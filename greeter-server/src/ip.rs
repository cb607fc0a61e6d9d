//! Client IP derivation from proxy headers and the socket address.

use axum::http::HeaderMap;
use std::net::SocketAddr;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Derive the client IP for a request.
///
/// Prefers the first hop of `X-Forwarded-For` (proxies append later hops),
/// falling back to the transport-level remote address. Any `:port` suffix is
/// stripped. The result is not validated; a malformed value simply fails the
/// geolocation lookup downstream.
pub fn client_ip(headers: &HeaderMap, remote: SocketAddr) -> String {
    let raw = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| remote.to_string());

    strip_port(&raw).to_string()
}

fn strip_port(addr: &str) -> &str {
    match addr.split_once(':') {
        Some((host, _)) => host,
        None => addr,
    }
}
