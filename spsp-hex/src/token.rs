//! Bearer token inspection.
//!
//! Bearer tokens are either JWTs or opaque SIMPLE secrets. A JWT is decoded
//! (never verified here; the connector checks signatures) and its expiry
//! enforced. Anything that does not decode is handed back as opaque.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use spsp_types::{AppError, DecodedToken, TokenClaims, TokenError};

/// Returns the token part of an `Authorization` header value: everything
/// after the first space, or the whole value when there is no space.
pub fn bearer_token(header: &str) -> &str {
    header
        .split_once(' ')
        .map(|(_, token)| token)
        .unwrap_or(header)
}

fn decode_segment(segment: &str) -> Result<Map<String, Value>, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| TokenError::Undecodable(format!("invalid base64: {}", e)))?;
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TokenError::Undecodable("segment is not a JSON object".into())),
        Err(e) => Err(TokenError::Undecodable(format!("invalid JSON: {}", e))),
    }
}

/// Decodes `token` as a JWT and checks its expiry against `now`.
pub fn decode_token(token: &str, now: DateTime<Utc>) -> Result<DecodedToken, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header, payload, _signature] = parts.as_slice() else {
        return Err(TokenError::Undecodable(format!(
            "expected 3 parts, found {}",
            parts.len()
        )));
    };

    let header = decode_segment(header)?;
    let claims: TokenClaims = serde_json::from_value(Value::Object(decode_segment(payload)?))
        .map_err(|e| TokenError::Undecodable(format!("invalid claims: {}", e)))?;

    let exp = claims
        .exp
        .ok_or_else(|| TokenError::Undecodable("missing exp claim".into()))?;
    let expires_at = DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| TokenError::Undecodable(format!("exp out of range: {}", exp)))?;

    if expires_at < now {
        return Err(TokenError::Expired {
            expired_at: expires_at,
        });
    }

    let header_str = |name: &str| header.get(name).and_then(Value::as_str).map(String::from);
    Ok(DecodedToken {
        algorithm: header_str("alg"),
        key_id: header_str("kid"),
        claims,
        expires_at,
        raw: token.to_string(),
    })
}

/// Inspects an `Authorization` header value.
///
/// - `Ok(Some(_))`: an unexpired JWT.
/// - `Ok(None)`: not a JWT; treat the token as an opaque SIMPLE secret.
/// - `Err(AppError::Unauthorized)`: a JWT that has expired.
pub fn inspect_bearer_token(
    header: &str,
    now: DateTime<Utc>,
) -> Result<Option<DecodedToken>, AppError> {
    match decode_token(bearer_token(header), now) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(TokenError::Expired { expired_at }) => {
            tracing::debug!(%expired_at, "Rejecting expired JWT");
            Err(AppError::Unauthorized("JWT is expired".into()))
        }
        Err(TokenError::Undecodable(reason)) => {
            tracing::info!(
                reason = %reason,
                "Could not decode bearer token as JWT, assuming it is SIMPLE token"
            );
            Ok(None)
        }
    }
}
