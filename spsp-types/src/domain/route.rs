//! Address prefixes and static routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::{AccountId, is_segment_char};
use crate::error::DomainError;

const ALLOCATION_SCHEMES: &[&str] = &[
    "g", "private", "example", "peer", "self", "test", "test1", "test2", "test3", "local",
];

/// An ILP address prefix such as `test.spsp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "test.spsp.alice")]
pub struct AddressPrefix(String);

impl AddressPrefix {
    /// Parses a prefix, checking the allocation scheme and every segment.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let mut segments = value.split('.');
        let scheme = segments.next().unwrap_or_default();
        if !ALLOCATION_SCHEMES.contains(&scheme) {
            return Err(DomainError::InvalidAddressPrefix(value));
        }
        let segments_ok = segments.all(|s| !s.is_empty() && s.chars().all(is_segment_char));
        if !segments_ok {
            return Err(DomainError::InvalidAddressPrefix(value));
        }
        Ok(Self(value))
    }

    /// Extends this prefix by one segment.
    ///
    /// Account ids are valid segments, so this cannot fail for them.
    pub fn with(&self, account_id: &AccountId) -> Self {
        Self(format!("{}.{}", self.0, account_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AddressPrefix {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AddressPrefix> for String {
    fn from(prefix: AddressPrefix) -> Self {
        prefix.0
    }
}

impl std::fmt::Display for AddressPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AddressPrefix {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Forwards traffic under `route_prefix` to `next_hop_account_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaticRoute {
    pub route_prefix: AddressPrefix,
    pub next_hop_account_id: AccountId,
}

impl StaticRoute {
    /// Route sending everything under `base.<account>` to that account.
    pub fn to_account(base: &AddressPrefix, account_id: &AccountId) -> Self {
        Self {
            route_prefix: base.with(account_id),
            next_hop_account_id: account_id.clone(),
        }
    }
}
