//! Asset denomination of an account.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// Fixed-point denomination of the amounts on an account.
///
/// Amounts are integers in units of `10^-scale` of the asset, so an XRP
/// account with scale 9 counts in nano-XRP.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct AssetDescriptor {
    #[serde(rename = "assetCode")]
    #[schema(example = "XRP")]
    pub code: String,
    #[serde(rename = "assetScale")]
    #[schema(example = 9)]
    pub scale: u8,
}

impl AssetDescriptor {
    /// Creates a descriptor, rejecting blank asset codes.
    pub fn new(code: impl Into<String>, scale: u8) -> Result<Self, DomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Asset code cannot be empty".into(),
            ));
        }
        Ok(Self { code, scale })
    }

    /// XRP counted in drops of a billionth.
    pub fn xrp() -> Self {
        Self {
            code: "XRP".into(),
            scale: 9,
        }
    }
}

impl Default for AssetDescriptor {
    fn default() -> Self {
        Self::xrp()
    }
}

impl fmt::Display for AssetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (scale {})", self.code, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_code_fails() {
        let result = AssetDescriptor::new("  ", 2);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_default_is_xrp_scale_nine() {
        let asset = AssetDescriptor::default();
        assert_eq!(asset.code, "XRP");
        assert_eq!(asset.scale, 9);
    }

    #[test]
    fn test_display() {
        let asset = AssetDescriptor::new("USD", 2).unwrap();
        assert_eq!(asset.to_string(), "USD (scale 2)");
    }
}
