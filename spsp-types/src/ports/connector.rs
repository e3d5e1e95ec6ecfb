//! Connector admin ports.
//!
//! The connector owns account persistence and the routing table; this
//! service only calls into it through these traits.

use crate::domain::{AccountId, AccountSettings, AddressPrefix, ConnectorAccountBalance, StaticRoute};
use crate::error::UpstreamError;

/// Creates accounts on the connector.
#[async_trait::async_trait]
pub trait AccountAdminClient: Send + Sync + 'static {
    /// Creates an account and returns the settings the connector stored.
    ///
    /// Not idempotent: callers must not retry blindly. Secret values in the
    /// returned custom settings may differ from the submitted plaintext.
    async fn create_account(&self, settings: &AccountSettings)
    -> Result<AccountSettings, UpstreamError>;
}

/// Manages the connector's static routing table.
#[async_trait::async_trait]
pub trait RouteAdminClient: Send + Sync + 'static {
    /// Registers (or replaces) the static route for `prefix`.
    async fn create_static_route(
        &self,
        prefix: &AddressPrefix,
        route: &StaticRoute,
    ) -> Result<(), UpstreamError>;
}

/// Reads account balances from the connector.
#[async_trait::async_trait]
pub trait BalanceClient: Send + Sync + 'static {
    /// Fetches the balance of `account_id`, authenticating as the caller.
    async fn get_balance(
        &self,
        account_id: &AccountId,
        bearer_token: &str,
    ) -> Result<ConnectorAccountBalance, UpstreamError>;
}
