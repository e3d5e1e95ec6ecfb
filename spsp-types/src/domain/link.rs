//! ILP-over-HTTP link configuration carried in an account's custom settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Well-known custom-settings keys understood by the connector.
pub mod keys {
    pub const INCOMING_AUTH_TYPE: &str = "ilpOverHttp.incoming.auth_type";
    pub const INCOMING_SIMPLE_AUTH_TOKEN: &str = "ilpOverHttp.incoming.simple.auth_token";
    pub const INCOMING_SHARED_SECRET: &str = "ilpOverHttp.incoming.shared_secret";
    pub const INCOMING_TOKEN_SUBJECT: &str = "ilpOverHttp.incoming.token_subject";

    pub const OUTGOING_AUTH_TYPE: &str = "ilpOverHttp.outgoing.auth_type";
    pub const OUTGOING_SIMPLE_AUTH_TOKEN: &str = "ilpOverHttp.outgoing.simple.auth_token";
    pub const OUTGOING_SHARED_SECRET: &str = "ilpOverHttp.outgoing.shared_secret";
    pub const OUTGOING_TOKEN_SUBJECT: &str = "ilpOverHttp.outgoing.token_subject";
    pub const OUTGOING_TOKEN_ISSUER: &str = "ilpOverHttp.outgoing.token_issuer";
    pub const OUTGOING_TOKEN_AUDIENCE: &str = "ilpOverHttp.outgoing.token_audience";
    pub const OUTGOING_TOKEN_EXPIRY: &str = "ilpOverHttp.outgoing.token_expiry";
    pub const OUTGOING_URL: &str = "ilpOverHttp.outgoing.url";
}

/// Authentication scheme of an ILP-over-HTTP link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum AuthType {
    /// Opaque shared secret compared verbatim.
    #[default]
    #[serde(rename = "SIMPLE")]
    Simple,
    #[serde(rename = "JWT_HS_256")]
    JwtHs256,
    #[serde(rename = "JWT_RS_256")]
    JwtRs256,
}

impl AsRef<str> for AuthType {
    fn as_ref(&self) -> &str {
        match self {
            Self::Simple => "SIMPLE",
            Self::JwtHs256 => "JWT_HS_256",
            Self::JwtRs256 => "JWT_RS_256",
        }
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for AuthType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SIMPLE" => Ok(Self::Simple),
            "JWT_HS_256" => Ok(Self::JwtHs256),
            "JWT_RS_256" => Ok(Self::JwtRs256),
            _ => Err(DomainError::ValidationError(format!(
                "Unknown auth type: {}",
                s
            ))),
        }
    }
}

/// String-keyed account settings, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomSettings(BTreeMap<String, Value>);

impl CustomSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under `key` when it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Adds every entry of `other`, overwriting keys already present.
    pub fn extend(&mut self, other: CustomSettings) {
        self.0.extend(other.0);
    }

    /// Copy of these settings with the value of an existing `key` replaced.
    ///
    /// Fails when `key` is absent: the substitution never introduces keys.
    pub fn with_replaced(&self, key: &str, value: impl Into<Value>) -> Result<Self, DomainError> {
        if !self.0.contains_key(key) {
            return Err(DomainError::MissingSetting(key.to_string()));
        }
        let value = value.into();
        Ok(Self(
            self.0
                .iter()
                .map(|(k, v)| {
                    if k == key {
                        (k.clone(), value.clone())
                    } else {
                        (k.clone(), v.clone())
                    }
                })
                .collect(),
        ))
    }
}

impl FromIterator<(String, Value)> for CustomSettings {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outgoing link defaults applied to every account the service creates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutgoingLinkSettings {
    pub auth_type: AuthType,
    pub url: String,
    pub simple_auth_token: Option<String>,
    pub shared_secret: Option<String>,
    pub token_subject: Option<String>,
    pub token_issuer: Option<String>,
    pub token_audience: Option<String>,
    /// ISO-8601 duration, e.g. `PT2H`
    pub token_expiry: Option<String>,
}

impl OutgoingLinkSettings {
    /// Renders these settings under the `ilpOverHttp.outgoing.*` keys.
    pub fn to_custom_settings(&self) -> CustomSettings {
        let mut settings = CustomSettings::new();
        settings.insert(keys::OUTGOING_AUTH_TYPE, self.auth_type.to_string());
        settings.insert(keys::OUTGOING_URL, self.url.clone());

        let optional = [
            (keys::OUTGOING_SIMPLE_AUTH_TOKEN, &self.simple_auth_token),
            (keys::OUTGOING_SHARED_SECRET, &self.shared_secret),
            (keys::OUTGOING_TOKEN_SUBJECT, &self.token_subject),
            (keys::OUTGOING_TOKEN_ISSUER, &self.token_issuer),
            (keys::OUTGOING_TOKEN_AUDIENCE, &self.token_audience),
            (keys::OUTGOING_TOKEN_EXPIRY, &self.token_expiry),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                settings.insert(key, value.clone());
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CustomSettings {
        let mut s = CustomSettings::new();
        s.insert(keys::INCOMING_AUTH_TYPE, "SIMPLE");
        s.insert(keys::INCOMING_SIMPLE_AUTH_TOKEN, "enc:gcm:abc");
        s.insert(keys::OUTGOING_URL, "https://example.com/ilp");
        s.insert("custom.number", 42);
        s
    }

    #[test]
    fn test_auth_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&AuthType::JwtHs256).unwrap(),
            "\"JWT_HS_256\""
        );
        assert_eq!("simple".parse::<AuthType>().unwrap(), AuthType::Simple);
        assert!("BASIC".parse::<AuthType>().is_err());
    }

    #[test]
    fn test_with_replaced_changes_only_target_key() {
        let original = sample();
        let replaced = original
            .with_replaced(keys::INCOMING_SIMPLE_AUTH_TOKEN, "plain")
            .unwrap();

        assert_eq!(replaced.len(), original.len());
        assert_eq!(
            replaced.get_str(keys::INCOMING_SIMPLE_AUTH_TOKEN),
            Some("plain")
        );
        for (k, v) in original.iter() {
            if k != keys::INCOMING_SIMPLE_AUTH_TOKEN {
                assert_eq!(replaced.get(k), Some(v));
            }
        }
        let original_keys: Vec<_> = original.iter().map(|(k, _)| k.clone()).collect();
        let replaced_keys: Vec<_> = replaced.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(original_keys, replaced_keys);
    }

    #[test]
    fn test_with_replaced_never_adds_keys() {
        let mut s = CustomSettings::new();
        s.insert(keys::INCOMING_AUTH_TYPE, "SIMPLE");
        let result = s.with_replaced(keys::INCOMING_SIMPLE_AUTH_TOKEN, "plain");
        assert!(matches!(result, Err(DomainError::MissingSetting(_))));
    }

    #[test]
    fn test_outgoing_settings_skip_unset_values() {
        let link = OutgoingLinkSettings {
            auth_type: AuthType::Simple,
            url: "https://connector.example/ilp".into(),
            simple_auth_token: Some("outgoing-secret".into()),
            ..Default::default()
        };
        let rendered = link.to_custom_settings();

        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered.get_str(keys::OUTGOING_AUTH_TYPE), Some("SIMPLE"));
        assert_eq!(
            rendered.get_str(keys::OUTGOING_SIMPLE_AUTH_TOKEN),
            Some("outgoing-secret")
        );
        assert!(!rendered.contains_key(keys::OUTGOING_TOKEN_EXPIRY));
    }
}
