//! Balance snapshot reported by the connector.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::AccountId;
use super::asset::AssetDescriptor;
use crate::error::DomainError;

/// Balance of an account as reported by the connector.
///
/// All amounts are in the smallest unit for the account's asset scale.
/// `net_balance` is always `clearing_balance + prepaid_amount`; values that
/// violate this are rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "RawAccountBalance")]
pub struct ConnectorAccountBalance {
    account_id: AccountId,
    #[schema(example = "XRP")]
    asset_code: String,
    #[schema(example = 9)]
    asset_scale: u8,
    /// Positive when the operator owes the account holder
    #[serde(with = "decimal")]
    #[schema(value_type = String, example = "1500")]
    net_balance: BigInt,
    #[schema(example = 500)]
    prepaid_amount: u64,
    #[serde(with = "decimal")]
    #[schema(value_type = String, example = "1000")]
    clearing_balance: BigInt,
}

impl ConnectorAccountBalance {
    /// Builds a snapshot, deriving the net balance.
    pub fn new(
        account_id: AccountId,
        asset: AssetDescriptor,
        clearing_balance: BigInt,
        prepaid_amount: u64,
    ) -> Self {
        let net_balance = &clearing_balance + BigInt::from(prepaid_amount);
        Self {
            account_id,
            asset_code: asset.code,
            asset_scale: asset.scale,
            net_balance,
            prepaid_amount,
            clearing_balance,
        }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn asset(&self) -> AssetDescriptor {
        AssetDescriptor {
            code: self.asset_code.clone(),
            scale: self.asset_scale,
        }
    }

    pub fn net_balance(&self) -> &BigInt {
        &self.net_balance
    }

    pub fn prepaid_amount(&self) -> u64 {
        self.prepaid_amount
    }

    pub fn clearing_balance(&self) -> &BigInt {
        &self.clearing_balance
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccountBalance {
    account_id: AccountId,
    asset_code: String,
    asset_scale: u8,
    #[serde(with = "decimal")]
    net_balance: BigInt,
    prepaid_amount: u64,
    #[serde(with = "decimal")]
    clearing_balance: BigInt,
}

impl TryFrom<RawAccountBalance> for ConnectorAccountBalance {
    type Error = DomainError;

    fn try_from(raw: RawAccountBalance) -> Result<Self, Self::Error> {
        let expected = &raw.clearing_balance + BigInt::from(raw.prepaid_amount);
        if raw.net_balance != expected {
            return Err(DomainError::InvalidBalance {
                net: raw.net_balance.to_string(),
                clearing: raw.clearing_balance.to_string(),
                prepaid: raw.prepaid_amount,
            });
        }
        Ok(Self {
            account_id: raw.account_id,
            asset_code: raw.asset_code,
            asset_scale: raw.asset_scale,
            net_balance: raw.net_balance,
            prepaid_amount: raw.prepaid_amount,
            clearing_balance: raw.clearing_balance,
        })
    }
}

/// Big integers as decimal strings. On input both JSON strings and JSON
/// numbers of any magnitude are accepted; numbers are read from their raw
/// text so nothing is lost to 64-bit or float conversion.
mod decimal {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use serde_json::value::RawValue;

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get().trim();
        let digits = match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            Some(quoted) => quoted.trim(),
            None => text,
        };
        digits
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid integer: {}", text)))
    }
}
