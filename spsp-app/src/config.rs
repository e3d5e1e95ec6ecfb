//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use anyhow::Context;
use spsp_hex::ProvisioningConfig;
use spsp_types::{AddressPrefix, AssetDescriptor, AuthType, OutgoingLinkSettings};

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub connector_url: String,
    pub connector_username: String,
    pub connector_password: String,
    pub connector_timeout: Duration,
    pub rate_limit_per_minute: u32,
    pub provisioning: ProvisioningConfig,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let port = var("PORT", "3000").parse().context("PORT must be a port number")?;
        let connector_timeout = Duration::from_secs(
            var("CONNECTOR_TIMEOUT_SECS", "30")
                .parse()
                .context("CONNECTOR_TIMEOUT_SECS must be a number of seconds")?,
        );
        let rate_limit_per_minute = var("ACCOUNT_RATE_LIMIT_PER_MINUTE", "100")
            .parse()
            .context("ACCOUNT_RATE_LIMIT_PER_MINUTE must be a number")?;

        let link_settings = OutgoingLinkSettings {
            auth_type: var("SPSP_OUTGOING_AUTH_TYPE", "SIMPLE").parse::<AuthType>()?,
            url: required("SPSP_OUTGOING_URL")?,
            simple_auth_token: lookup("SPSP_OUTGOING_SIMPLE_AUTH_TOKEN"),
            shared_secret: lookup("SPSP_OUTGOING_SHARED_SECRET"),
            token_subject: lookup("SPSP_OUTGOING_TOKEN_SUBJECT"),
            token_issuer: lookup("SPSP_OUTGOING_TOKEN_ISSUER"),
            token_audience: lookup("SPSP_OUTGOING_TOKEN_AUDIENCE"),
            token_expiry: lookup("SPSP_OUTGOING_TOKEN_EXPIRY"),
        };

        let provisioning = ProvisioningConfig {
            link_settings,
            address_prefix: AddressPrefix::new(var("SPSP_ADDRESS_PREFIX", "test.spsp"))?,
            default_asset: AssetDescriptor::new(
                var("DEFAULT_ASSET_CODE", "XRP"),
                var("DEFAULT_ASSET_SCALE", "9")
                    .parse()
                    .context("DEFAULT_ASSET_SCALE must be between 0 and 255")?,
            )?,
        };

        Ok(Self {
            port,
            connector_url: required("CONNECTOR_URL")?,
            connector_username: var("CONNECTOR_ADMIN_USERNAME", "admin"),
            connector_password: required("CONNECTOR_ADMIN_PASSWORD")?,
            connector_timeout,
            rate_limit_per_minute,
            provisioning,
        })
    }
}
