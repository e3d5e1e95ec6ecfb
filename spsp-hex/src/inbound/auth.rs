//! Caller identification from the Authorization header.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;

use spsp_types::{AppError, DecodedToken};

use super::handlers::ApiError;
use crate::token::{bearer_token, inspect_bearer_token};

/// Who is calling, as far as the bearer token tells.
///
/// JWTs are only decoded and expiry-checked here; the connector verifies
/// signatures when the token is forwarded to it.
#[derive(Debug, Clone)]
pub enum Caller {
    /// No Authorization header.
    Anonymous,
    /// An unexpired JWT.
    Jwt(DecodedToken),
    /// An opaque token, used verbatim as a SIMPLE secret.
    Simple(String),
}

impl Caller {
    /// Resolves a caller from an optional `Authorization` header value.
    pub fn from_header(header: Option<&str>) -> Result<Self, AppError> {
        let header = match header {
            Some(h) if !h.trim().is_empty() => h,
            _ => return Ok(Caller::Anonymous),
        };

        match inspect_bearer_token(header, Utc::now())? {
            Some(jwt) => Ok(Caller::Jwt(jwt)),
            None => Ok(Caller::Simple(bearer_token(header).to_string())),
        }
    }

    /// The opaque token to use as an account credential, if any.
    pub fn simple_token(&self) -> Option<String> {
        match self {
            Caller::Simple(token) => Some(token.clone()),
            _ => None,
        }
    }

    /// The raw bearer token, for forwarding to the connector.
    pub fn bearer(&self) -> Option<&str> {
        match self {
            Caller::Anonymous => None,
            Caller::Jwt(jwt) => Some(&jwt.raw),
            Caller::Simple(token) => Some(token),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                AppError::Unauthorized("Invalid Authorization header".into())
            })?),
            None => None,
        };
        Caller::from_header(header).map_err(ApiError)
    }
}
