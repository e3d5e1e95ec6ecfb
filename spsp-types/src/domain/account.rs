//! Account domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::asset::AssetDescriptor;
use super::link::{AuthType, CustomSettings, keys};
use crate::error::DomainError;

/// Maximum length of an account identifier.
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Link type of every account this service provisions.
pub const ILP_OVER_HTTP: &str = "ILP_OVER_HTTP";

/// Returns true when `c` may appear in an ILP address segment.
pub(crate) fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '~' | '-')
}

/// Unique identifier for an account on the connector.
///
/// Not an ILP address: the account's address is derived by appending this
/// identifier to an address prefix, so it must be a valid address segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "user_k3Jd9aQ1zXb0P")]
pub struct AccountId(String);

impl AccountId {
    /// Creates an AccountId, validating length and character set.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.is_empty() || value.len() > MAX_ACCOUNT_ID_LEN {
            return Err(DomainError::ValidationError(format!(
                "Account id must be between 1 and {} characters",
                MAX_ACCOUNT_ID_LEN
            )));
        }
        if !value.chars().all(is_segment_char) {
            return Err(DomainError::ValidationError(format!(
                "Account id contains invalid characters: {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Relationship between the connector operator and the account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRelationship {
    Peer,
    #[default]
    Child,
    Parent,
}

impl std::fmt::Display for AccountRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Peer => "PEER",
            Self::Child => "CHILD",
            Self::Parent => "PARENT",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AccountRelationship {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PEER" => Ok(Self::Peer),
            "CHILD" => Ok(Self::Child),
            "PARENT" => Ok(Self::Parent),
            _ => Err(DomainError::ValidationError(format!(
                "Unknown account relationship: {}",
                s
            ))),
        }
    }
}

/// Full configuration of an account as understood by the connector admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    pub account_id: AccountId,
    #[serde(default)]
    pub description: String,
    pub account_relationship: AccountRelationship,
    #[schema(example = "XRP")]
    pub asset_code: String,
    #[schema(example = 9)]
    pub asset_scale: u8,
    #[schema(example = "ILP_OVER_HTTP")]
    pub link_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_packet_amount: Option<u64>,
    /// Link and authentication configuration, keyed by well-known setting names
    #[serde(default)]
    #[schema(value_type = Object)]
    pub custom_settings: CustomSettings,
}

impl AccountSettings {
    /// Returns the denomination of this account.
    pub fn asset(&self) -> AssetDescriptor {
        AssetDescriptor {
            code: self.asset_code.clone(),
            scale: self.asset_scale,
        }
    }

    /// Incoming auth type declared in the custom settings, if any.
    pub fn incoming_auth_type(&self) -> Option<AuthType> {
        self.custom_settings
            .get_str(keys::INCOMING_AUTH_TYPE)
            .and_then(|s| s.parse().ok())
    }

    /// Plaintext (or upstream-stored) incoming SIMPLE token, if any.
    pub fn incoming_simple_auth_token(&self) -> Option<&str> {
        self.custom_settings
            .get_str(keys::INCOMING_SIMPLE_AUTH_TOKEN)
    }

    /// Copy of these settings with the custom settings replaced.
    pub fn with_custom_settings(self, custom_settings: CustomSettings) -> Self {
        Self {
            custom_settings,
            ..self
        }
    }
}
