//! Extract the request's Host header for building absolute links.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::HOST, request::Parts},
};

/// Host the client addressed, if any.
#[derive(Clone, Debug, Default)]
pub struct RequestOrigin(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| parts.uri.authority().map(|a| a.to_string()));
        Ok(RequestOrigin(host))
    }
}
