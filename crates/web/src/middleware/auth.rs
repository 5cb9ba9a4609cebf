use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::WebError;

/// Session id taken from an `Authorization: Bearer <sessionId>` header.
///
/// Only the header shape is checked here; resolving the session is up to the
/// handler so that path validation still runs before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        match parse_bearer(header) {
            Some(token) => Ok(Self(token.to_string())),
            None => {
                tracing::warn!("Missing or malformed Authorization header");
                Err(WebError::Unauthorized)
            }
        }
    }
}
