use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";
const UNKNOWN_CLIENT: &str = "unknown";

/// Add this as a parameter to a handler function to learn who is calling.
///
/// Taken from `X-Forwarded-For`, then `X-Real-IP`, as set by the proxy in front
/// of the service. Callers behind no proxy all share the `unknown` identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let identity = header_value(headers, FORWARDED_FOR)
            .or_else(|| header_value(headers, REAL_IP))
            .unwrap_or(UNKNOWN_CLIENT);

        Self(identity.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
