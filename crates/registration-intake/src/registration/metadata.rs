//! Client metadata captured alongside each registration.

use axum::http::{header, HeaderMap};
use std::net::SocketAddr;

/// Placeholder for metadata the request does not carry.
pub const UNKNOWN: &str = "unknown";

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Where a registration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMetadata {
    pub ip: String,
    pub user_agent: String,
}

impl ClientMetadata {
    /// Derive metadata from request headers and the peer address.
    ///
    /// The IP is the first `X-Forwarded-For` hop, then `X-Real-IP`, then the
    /// connection's peer address, then [`UNKNOWN`].
    pub fn from_request(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = header_text(headers, X_FORWARDED_FOR)
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        let ip = forwarded
            .or_else(|| header_text(headers, X_REAL_IP))
            .map(String::from)
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let user_agent = header_text(headers, header::USER_AGENT.as_str())
            .unwrap_or(UNKNOWN)
            .to_string();

        Self { ip, user_agent }
    }
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
