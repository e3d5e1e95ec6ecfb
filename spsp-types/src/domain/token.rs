//! Decoded bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `aud` may be a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(a) => a == audience,
            Self::Many(all) => all.iter().any(|a| a == audience),
        }
    }
}

/// Registered JWT claims plus anything else the issuer included.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A structurally valid JWT whose signature has NOT been verified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedToken {
    pub algorithm: Option<String>,
    pub key_id: Option<String>,
    pub claims: TokenClaims,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub raw: String,
}

impl DecodedToken {
    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
